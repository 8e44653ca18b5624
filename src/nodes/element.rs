//! Element nodes: containers with children, direction, format and indent.
//!
//! Every element serializes as
//! `{children, direction, format, indent, type, version, ...extras}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ContentError, ContentResult};
use crate::import::SourceElement;
use crate::options::RenderOptions;
use crate::url::{self, UrlRule, UrlTransformMap};

use super::registry::{DomConversion, NodeRegistry};
use super::text::{check_version, u32_field};
use super::DocNode;

// =============================================================================
// Shared element state
// =============================================================================

/// Text direction, computed from the first strong character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

/// Block alignment, serialized as the element `format` string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ElementFormat {
    #[default]
    Unset,
    Left,
    Start,
    Center,
    Right,
    End,
    Justify,
}

impl ElementFormat {
    /// Lenient parse of a format string or CSS `text-align` value.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "start" => Self::Start,
            "center" => Self::Center,
            "right" => Self::Right,
            "end" => Self::End,
            "justify" => Self::Justify,
            _ => Self::Unset,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Left => "left",
            Self::Start => "start",
            Self::Center => "center",
            Self::Right => "right",
            Self::End => "end",
            Self::Justify => "justify",
        }
    }
}

/// State shared by every element node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementBase {
    pub children: Vec<DocNode>,
    pub direction: Option<Direction>,
    pub format: ElementFormat,
    pub indent: u32,
}

impl ElementBase {
    pub fn with_children(children: Vec<DocNode>) -> Self {
        Self {
            children,
            ..Default::default()
        }
    }

    /// Same direction, format and indent, no children.
    pub fn shell(&self) -> Self {
        Self {
            children: Vec::new(),
            direction: self.direction,
            format: self.format,
            indent: self.indent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn to_json(&self, node_type: &str, version: u32) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert(
            "children".into(),
            Value::Array(self.children.iter().map(DocNode::to_json).collect()),
        );
        out.insert(
            "direction".into(),
            self.direction
                .map_or(Value::Null, |d| Value::String(d.as_str().into())),
        );
        out.insert("format".into(), Value::String(self.format.as_str().into()));
        out.insert("indent".into(), Value::from(self.indent));
        out.insert("type".into(), Value::String(node_type.into()));
        out.insert("version".into(), Value::from(version));
        out
    }

    pub(crate) fn from_json(
        serialized: &Map<String, Value>,
        node_type: &str,
        registry: &NodeRegistry,
    ) -> ContentResult<Self> {
        let children = match serialized.get("children") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(children)) => children
                .iter()
                .map(|child| registry.import_json(child))
                .collect::<ContentResult<_>>()?,
            Some(_) => return Err(ContentError::invalid(node_type, "`children` must be an array")),
        };
        let direction = match serialized.get("direction") {
            Some(Value::String(d)) if d == "ltr" => Some(Direction::Ltr),
            Some(Value::String(d)) if d == "rtl" => Some(Direction::Rtl),
            _ => None,
        };
        let format = match serialized.get("format") {
            Some(Value::String(format)) => ElementFormat::parse(format),
            // Older documents stored alignment as a number
            Some(Value::Number(n)) => match n.as_u64() {
                Some(1) => ElementFormat::Left,
                Some(2) => ElementFormat::Center,
                Some(3) => ElementFormat::Right,
                Some(4) => ElementFormat::Justify,
                Some(5) => ElementFormat::Start,
                Some(6) => ElementFormat::End,
                _ => ElementFormat::Unset,
            },
            _ => ElementFormat::Unset,
        };
        Ok(Self {
            children,
            direction,
            format,
            indent: u32_field(serialized, "indent"),
        })
    }
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// `url::absolute_to_relative` or `url::relative_to_absolute`.
pub(crate) type PayloadRewrite =
    fn(&Map<String, Value>, UrlTransformMap, &RenderOptions) -> Map<String, Value>;

fn str_field(serialized: &Map<String, Value>, name: &str) -> Option<String> {
    serialized.get(name).and_then(Value::as_str).map(str::to_owned)
}

// =============================================================================
// Paragraph / Quote
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphNode {
    pub base: ElementBase,
}

impl ParagraphNode {
    pub const TYPE: &'static str = "paragraph";
    pub const VERSION: u32 = 1;

    pub fn new(children: Vec<DocNode>) -> Self {
        Self {
            base: ElementBase::with_children(children),
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.base.to_json(Self::TYPE, Self::VERSION))
    }

    pub fn from_json(serialized: &Map<String, Value>, registry: &NodeRegistry) -> ContentResult<Self> {
        check_version(serialized, Self::TYPE, Self::VERSION)?;
        Ok(Self {
            base: ElementBase::from_json(serialized, Self::TYPE, registry)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteNode {
    pub base: ElementBase,
}

impl QuoteNode {
    pub const TYPE: &'static str = "quote";
    pub const VERSION: u32 = 1;

    pub fn new(children: Vec<DocNode>) -> Self {
        Self {
            base: ElementBase::with_children(children),
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.base.to_json(Self::TYPE, Self::VERSION))
    }

    pub fn from_json(serialized: &Map<String, Value>, registry: &NodeRegistry) -> ContentResult<Self> {
        check_version(serialized, Self::TYPE, Self::VERSION)?;
        Ok(Self {
            base: ElementBase::from_json(serialized, Self::TYPE, registry)?,
        })
    }
}

// =============================================================================
// Heading
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HeadingTag {
    #[default]
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingTag {
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = match tag {
            "h1" => Self::H1,
            "h2" => Self::H2,
            "h3" => Self::H3,
            "h4" => Self::H4,
            "h5" => Self::H5,
            "h6" => Self::H6,
            _ => return None,
        };
        Some(tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingNode {
    pub base: ElementBase,
    pub tag: HeadingTag,
}

impl HeadingNode {
    pub const TYPE: &'static str = "heading";
    pub const VERSION: u32 = 1;

    pub fn new(tag: HeadingTag, children: Vec<DocNode>) -> Self {
        Self {
            base: ElementBase::with_children(children),
            tag,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut out = self.base.to_json(Self::TYPE, Self::VERSION);
        out.insert("tag".into(), Value::String(self.tag.as_str().into()));
        Value::Object(out)
    }

    pub fn from_json(serialized: &Map<String, Value>, registry: &NodeRegistry) -> ContentResult<Self> {
        check_version(serialized, Self::TYPE, Self::VERSION)?;
        let tag = match serialized.get("tag").and_then(Value::as_str) {
            None => HeadingTag::default(),
            Some(tag) => HeadingTag::parse(tag)
                .ok_or_else(|| ContentError::invalid(Self::TYPE, format!("unknown heading tag {tag:?}")))?,
        };
        Ok(Self {
            base: ElementBase::from_json(serialized, Self::TYPE, registry)?,
            tag,
        })
    }
}

// =============================================================================
// List / ListItem
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ListType {
    #[default]
    Bullet,
    Number,
    Check,
}

impl ListType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bullet" => Some(Self::Bullet),
            "number" => Some(Self::Number),
            "check" => Some(Self::Check),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullet => "bullet",
            Self::Number => "number",
            Self::Check => "check",
        }
    }

    /// HTML tag of the list element.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Number => "ol",
            Self::Bullet | Self::Check => "ul",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNode {
    pub base: ElementBase,
    pub list_type: ListType,
    pub start: u32,
}

impl Default for ListNode {
    fn default() -> Self {
        Self {
            base: ElementBase::default(),
            list_type: ListType::Bullet,
            start: 1,
        }
    }
}

impl ListNode {
    pub const TYPE: &'static str = "list";
    pub const VERSION: u32 = 1;

    pub fn new(list_type: ListType, children: Vec<DocNode>) -> Self {
        Self {
            base: ElementBase::with_children(children),
            list_type,
            start: 1,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.list_type.tag()
    }

    /// Number list items from `start`, in order.
    pub fn renumber(&mut self) {
        let mut value = self.start;
        for child in &mut self.base.children {
            if let DocNode::ListItem(item) = child {
                item.value = value;
                value = value.saturating_add(1);
            }
        }
    }

    pub fn to_json(&self) -> Value {
        let mut out = self.base.to_json(Self::TYPE, Self::VERSION);
        out.insert("listType".into(), Value::String(self.list_type.as_str().into()));
        out.insert("start".into(), Value::from(self.start));
        out.insert("tag".into(), Value::String(self.tag().into()));
        Value::Object(out)
    }

    pub fn from_json(serialized: &Map<String, Value>, registry: &NodeRegistry) -> ContentResult<Self> {
        check_version(serialized, Self::TYPE, Self::VERSION)?;
        let list_type = match serialized.get("listType").and_then(Value::as_str) {
            Some(value) => ListType::parse(value)
                .ok_or_else(|| ContentError::invalid(Self::TYPE, format!("unknown list type {value:?}")))?,
            // Fall back to the tag when the list type is missing
            None if serialized.get("tag").and_then(Value::as_str) == Some("ol") => ListType::Number,
            None => ListType::Bullet,
        };
        let start = serialized
            .get("start")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(1);
        Ok(Self {
            base: ElementBase::from_json(serialized, Self::TYPE, registry)?,
            list_type,
            start,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemNode {
    pub base: ElementBase,
    pub value: u32,
}

impl Default for ListItemNode {
    fn default() -> Self {
        Self {
            base: ElementBase::default(),
            value: 1,
        }
    }
}

impl ListItemNode {
    pub const TYPE: &'static str = "listitem";
    pub const VERSION: u32 = 1;

    pub fn new(children: Vec<DocNode>) -> Self {
        Self {
            base: ElementBase::with_children(children),
            value: 1,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut out = self.base.to_json(Self::TYPE, Self::VERSION);
        out.insert("value".into(), Value::from(self.value));
        Value::Object(out)
    }

    pub fn from_json(serialized: &Map<String, Value>, registry: &NodeRegistry) -> ContentResult<Self> {
        check_version(serialized, Self::TYPE, Self::VERSION)?;
        let value = serialized
            .get("value")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(1);
        Ok(Self {
            base: ElementBase::from_json(serialized, Self::TYPE, registry)?,
            value,
        })
    }
}

// =============================================================================
// Link
// =============================================================================

/// Link attributes; `rel`, `target` and `title` serialize as `null` when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPayload {
    pub rel: Option<String>,
    pub target: Option<String>,
    pub title: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkNode {
    pub base: ElementBase,
    payload: LinkPayload,
}

crate::impl_payload_accessors!(LinkNode, payload;
    str { url },
    ref { rel: Option<String>, target: Option<String>, title: Option<String> },
);

impl LinkNode {
    pub const TYPE: &'static str = "link";
    pub const VERSION: u32 = 1;
    pub const URL_TRANSFORM_MAP: UrlTransformMap = &[("url", UrlRule::Url)];

    pub fn new(url: impl Into<String>, children: Vec<DocNode>) -> Self {
        Self {
            base: ElementBase::with_children(children),
            payload: LinkPayload {
                url: url.into(),
                ..Default::default()
            },
        }
    }

    pub fn payload(&self) -> &LinkPayload {
        &self.payload
    }

    /// Same attributes, no children.
    pub fn shell(&self) -> Self {
        Self {
            base: self.base.shell(),
            payload: self.payload.clone(),
        }
    }

    /// Copy with `url` rewritten to root-relative form. Children are untouched.
    pub fn absolute_to_relative(&self, options: &RenderOptions) -> Self {
        self.rewrite_urls(url::absolute_to_relative, options)
    }

    /// Copy with a root-relative `url` made absolute. Children are untouched.
    pub fn relative_to_absolute(&self, options: &RenderOptions) -> Self {
        self.rewrite_urls(url::relative_to_absolute, options)
    }

    fn rewrite_urls(&self, rewrite: PayloadRewrite, options: &RenderOptions) -> Self {
        let mut out = self.clone();
        let Ok(Value::Object(dataset)) = serde_json::to_value(&self.payload) else {
            return out;
        };
        let rewritten = rewrite(&dataset, Self::URL_TRANSFORM_MAP, options);
        if let Ok(payload) = serde_json::from_value(Value::Object(rewritten)) {
            out.payload = payload;
        }
        out
    }

    pub fn to_json(&self) -> Value {
        let mut out = self.base.to_json(Self::TYPE, Self::VERSION);
        let optional = |value: &Option<String>| value.clone().map_or(Value::Null, Value::String);
        out.insert("rel".into(), optional(&self.payload.rel));
        out.insert("target".into(), optional(&self.payload.target));
        out.insert("title".into(), optional(&self.payload.title));
        out.insert("url".into(), Value::String(self.payload.url.clone()));
        Value::Object(out)
    }

    pub fn from_json(serialized: &Map<String, Value>, registry: &NodeRegistry) -> ContentResult<Self> {
        check_version(serialized, Self::TYPE, Self::VERSION)?;
        Ok(Self {
            base: ElementBase::from_json(serialized, Self::TYPE, registry)?,
            payload: LinkPayload {
                rel: str_field(serialized, "rel"),
                target: str_field(serialized, "target"),
                title: str_field(serialized, "title"),
                url: str_field(serialized, "url").unwrap_or_default(),
            },
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DOM import
// ─────────────────────────────────────────────────────────────────────────────

/// Alignment from `style="text-align: …"`, falling back to the `align` attribute.
fn base_from(element: &SourceElement) -> ElementBase {
    let format = element
        .style("text-align")
        .or_else(|| element.attr("align"))
        .map(|value| ElementFormat::parse(&value))
        .unwrap_or_default();
    ElementBase {
        format,
        ..Default::default()
    }
}

pub(crate) fn import_paragraph(element: &SourceElement) -> Option<DomConversion> {
    Some(DomConversion::Container(DocNode::Paragraph(ParagraphNode {
        base: base_from(element),
    })))
}

pub(crate) fn import_heading(element: &SourceElement) -> Option<DomConversion> {
    let tag = HeadingTag::parse(element.tag())?;
    Some(DomConversion::Container(DocNode::Heading(HeadingNode {
        base: base_from(element),
        tag,
    })))
}

pub(crate) fn import_quote(element: &SourceElement) -> Option<DomConversion> {
    Some(DomConversion::Container(DocNode::Quote(QuoteNode {
        base: base_from(element),
    })))
}

pub(crate) fn import_list(element: &SourceElement) -> Option<DomConversion> {
    let list_type = if element.tag() == "ol" {
        ListType::Number
    } else {
        ListType::Bullet
    };
    Some(DomConversion::Container(DocNode::List(ListNode {
        base: base_from(element),
        list_type,
        start: element.attr_u32("start").unwrap_or(1),
    })))
}

pub(crate) fn import_list_item(element: &SourceElement) -> Option<DomConversion> {
    Some(DomConversion::Container(DocNode::ListItem(ListItemNode {
        base: base_from(element),
        value: 1,
    })))
}

/// `<a href>`; anchors without an href are plain text containers.
pub(crate) fn import_link(element: &SourceElement) -> Option<DomConversion> {
    let url = element.attr("href")?;
    let non_empty = |name: &str| element.attr(name).filter(|value| !value.is_empty());
    Some(DomConversion::Container(DocNode::Link(LinkNode {
        base: ElementBase::default(),
        payload: LinkPayload {
            rel: non_empty("rel"),
            target: non_empty("target"),
            title: non_empty("title"),
            url,
        },
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::TextNode;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_paragraph_json() {
        let paragraph = ParagraphNode::new(vec![DocNode::Text(TextNode::new("Hi"))]);
        let json = paragraph.to_json();
        assert_eq!(
            json,
            json!({
                "children": [{"detail": 0, "format": 0, "mode": "normal", "style": "", "text": "Hi", "type": "text", "version": 1}],
                "direction": null,
                "format": "",
                "indent": 0,
                "type": "paragraph",
                "version": 1
            })
        );
        let registry = NodeRegistry::with_defaults();
        assert_eq!(ParagraphNode::from_json(json.as_object().unwrap(), &registry).unwrap(), paragraph);
    }

    #[test]
    fn test_heading_and_list_json() {
        let registry = NodeRegistry::with_defaults();

        let heading = HeadingNode::from_json(&object(json!({"tag": "h2", "format": "center"})), &registry).unwrap();
        assert_eq!(heading.tag, HeadingTag::H2);
        assert_eq!(heading.base.format, ElementFormat::Center);
        assert_eq!(heading.to_json()["tag"], "h2");

        let list = ListNode::from_json(&object(json!({"tag": "ol", "start": 3})), &registry).unwrap();
        assert_eq!(list.list_type, ListType::Number);
        assert_eq!(list.start, 3);
        let json = list.to_json();
        assert_eq!(json["listType"], "number");
        assert_eq!(json["tag"], "ol");

        let err = HeadingNode::from_json(&object(json!({"tag": "h9"})), &registry).unwrap_err();
        assert!(matches!(err, ContentError::InvalidNode { .. }));
    }

    #[test]
    fn test_list_renumber() {
        let mut list = ListNode::new(
            ListType::Number,
            vec![
                DocNode::ListItem(ListItemNode::default()),
                DocNode::ListItem(ListItemNode::default()),
            ],
        );
        list.start = 4;
        list.renumber();
        let values: Vec<_> = list
            .base
            .children
            .iter()
            .filter_map(DocNode::as_list_item)
            .map(|item| item.value)
            .collect();
        assert_eq!(values, vec![4, 5]);
    }

    #[test]
    fn test_link_json() {
        let link = LinkNode::new("/post", vec![DocNode::Text(TextNode::new("link"))]).with_target(Some("_blank".into()));
        let json = link.to_json();
        assert_eq!(json["rel"], Value::Null);
        assert_eq!(json["target"], "_blank");
        assert_eq!(json["url"], "/post");

        let registry = NodeRegistry::with_defaults();
        let restored = LinkNode::from_json(json.as_object().unwrap(), &registry).unwrap();
        assert_eq!(restored, link);
        assert_eq!(restored.url(), "/post");
    }

    #[test]
    fn test_element_format_parse() {
        assert_eq!(ElementFormat::parse(" Center "), ElementFormat::Center);
        assert_eq!(ElementFormat::parse("inherit"), ElementFormat::Unset);
        assert_eq!(ElementFormat::Justify.as_str(), "justify");
    }
}
