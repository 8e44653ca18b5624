//! Inline leaf nodes: formatted text and line breaks.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use smallvec::SmallVec;

use crate::error::{ContentError, ContentResult};
use crate::import::SourceElement;

use super::registry::DomConversion;
use super::DocNode;

bitflags! {
    /// Inline text formats, serialized as the `format` integer of a text node.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct TextFormat: u32 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const STRIKETHROUGH = 1 << 2;
        const UNDERLINE = 1 << 3;
        const CODE = 1 << 4;
        const SUBSCRIPT = 1 << 5;
        const SUPERSCRIPT = 1 << 6;
        const HIGHLIGHT = 1 << 7;
    }
}

impl TextFormat {
    /// Export tag for each format, outermost first.
    pub const TAGS: &'static [(TextFormat, &'static str)] = &[
        (TextFormat::BOLD, "strong"),
        (TextFormat::ITALIC, "em"),
        (TextFormat::STRIKETHROUGH, "s"),
        (TextFormat::UNDERLINE, "u"),
        (TextFormat::CODE, "code"),
        (TextFormat::SUBSCRIPT, "sub"),
        (TextFormat::SUPERSCRIPT, "sup"),
        (TextFormat::HIGHLIGHT, "mark"),
    ];

    /// Export tags of the set formats, outermost first.
    pub fn tags(self) -> SmallVec<[&'static str; 4]> {
        Self::TAGS
            .iter()
            .filter(|(format, _)| self.contains(*format))
            .map(|(_, tag)| *tag)
            .collect()
    }

    /// Format applied by an inline formatting tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let format = match tag {
            "b" | "strong" => Self::BOLD,
            "i" | "em" => Self::ITALIC,
            "s" | "del" | "strike" => Self::STRIKETHROUGH,
            "u" | "ins" => Self::UNDERLINE,
            "code" | "kbd" | "samp" => Self::CODE,
            "sub" => Self::SUBSCRIPT,
            "sup" => Self::SUPERSCRIPT,
            "mark" => Self::HIGHLIGHT,
            _ => return None,
        };
        Some(format)
    }
}

/// Text node editing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Normal,
    Token,
    Segmented,
}

// =============================================================================
// TextNode
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextNode {
    pub detail: u32,
    pub format: TextFormat,
    pub mode: TextMode,
    pub style: String,
    pub text: String,
}

impl TextNode {
    pub const TYPE: &'static str = "text";
    pub const VERSION: u32 = 1;

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    pub fn has_format(&self, format: TextFormat) -> bool {
        self.format.contains(format)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Texts with identical formatting can be merged into one node.
    pub fn can_merge_with(&self, other: &TextNode) -> bool {
        self.format == other.format
            && self.mode == other.mode
            && self.detail == other.detail
            && self.style == other.style
    }

    pub fn to_json(&self) -> Value {
        json!({
            "detail": self.detail,
            "format": self.format.bits(),
            "mode": self.mode,
            "style": self.style,
            "text": self.text,
            "type": Self::TYPE,
            "version": Self::VERSION,
        })
    }

    pub fn from_json(serialized: &Map<String, Value>) -> ContentResult<Self> {
        check_version(serialized, Self::TYPE, Self::VERSION)?;
        let text = match serialized.get("text") {
            Some(Value::String(text)) => text.clone(),
            None | Some(Value::Null) => String::new(),
            Some(_) => return Err(ContentError::invalid(Self::TYPE, "`text` must be a string")),
        };
        let mode = match serialized.get("mode") {
            Some(mode) => serde_json::from_value(mode.clone())?,
            None => TextMode::Normal,
        };
        Ok(Self {
            detail: u32_field(serialized, "detail"),
            format: TextFormat::from_bits_truncate(u32_field(serialized, "format")),
            mode,
            style: serialized
                .get("style")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            text,
        })
    }
}

// =============================================================================
// LineBreakNode
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineBreakNode;

impl LineBreakNode {
    pub const TYPE: &'static str = "linebreak";
    pub const VERSION: u32 = 1;

    pub fn to_json(&self) -> Value {
        json!({"type": Self::TYPE, "version": Self::VERSION})
    }

    pub fn from_json(serialized: &Map<String, Value>) -> ContentResult<Self> {
        check_version(serialized, Self::TYPE, Self::VERSION)?;
        Ok(Self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DOM import
// ─────────────────────────────────────────────────────────────────────────────

/// Formatting tags, plus `<span>` formats expressed as inline styles.
pub(crate) fn import_text_format(element: &SourceElement) -> Option<DomConversion> {
    let tag = element.tag();
    // Google Docs wraps whole documents in <b style="font-weight:normal">
    if tag == "b" && element.style("font-weight").as_deref() == Some("normal") {
        return None;
    }
    let format = match TextFormat::from_tag(tag) {
        Some(format) => format,
        None => style_format(element),
    };
    (!format.is_empty()).then_some(DomConversion::Format(format))
}

fn style_format(element: &SourceElement) -> TextFormat {
    let mut format = TextFormat::empty();
    if let Some(weight) = element.style("font-weight") {
        let heavy = weight == "bold"
            || weight == "bolder"
            || weight.parse::<u32>().is_ok_and(|w| w >= 600);
        format.set(TextFormat::BOLD, heavy);
    }
    if element.style("font-style").as_deref() == Some("italic") {
        format |= TextFormat::ITALIC;
    }
    if let Some(decoration) = element.style("text-decoration") {
        format.set(TextFormat::UNDERLINE, decoration.contains("underline"));
        format.set(TextFormat::STRIKETHROUGH, decoration.contains("line-through"));
    }
    match element.style("vertical-align").as_deref() {
        Some("sub") => format |= TextFormat::SUBSCRIPT,
        Some("super") => format |= TextFormat::SUPERSCRIPT,
        _ => {}
    }
    format
}

pub(crate) fn import_line_break(_element: &SourceElement) -> Option<DomConversion> {
    Some(DomConversion::Leaf(DocNode::LineBreak(LineBreakNode)))
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON helpers shared by the built-in node types
// ─────────────────────────────────────────────────────────────────────────────

/// Serialized version, defaulting to `supported` when absent.
pub(crate) fn check_version(
    serialized: &Map<String, Value>,
    node_type: &str,
    supported: u32,
) -> ContentResult<u32> {
    let found = match serialized.get("version") {
        None | Some(Value::Null) => return Ok(supported),
        Some(value) => value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| ContentError::invalid(node_type, "`version` must be a positive integer"))?,
    };
    if found > supported {
        return Err(ContentError::SchemaVersion {
            node_type: node_type.to_owned(),
            found,
            supported,
        });
    }
    Ok(found)
}

pub(crate) fn u32_field(serialized: &Map<String, Value>, name: &str) -> u32 {
    serialized
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_format_bits() {
        let format = TextFormat::BOLD | TextFormat::ITALIC | TextFormat::HIGHLIGHT;
        assert_eq!(format.bits(), 131);
        assert_eq!(TextFormat::from_tag("strong"), Some(TextFormat::BOLD));
        assert_eq!(TextFormat::from_tag("del"), Some(TextFormat::STRIKETHROUGH));
        assert_eq!(TextFormat::from_tag("span"), None);
        assert_eq!(format.tags().as_slice(), &["strong", "em", "mark"]);
    }

    #[test]
    fn test_text_json() {
        let text = TextNode::new("Hello").with_format(TextFormat::BOLD | TextFormat::CODE);
        let json = text.to_json();
        assert_eq!(
            json,
            json!({"detail": 0, "format": 17, "mode": "normal", "style": "", "text": "Hello", "type": "text", "version": 1})
        );
        assert_eq!(TextNode::from_json(json.as_object().unwrap()).unwrap(), text);
    }

    #[test]
    fn test_text_json_defaults() {
        let text = TextNode::from_json(&object(json!({"type": "text", "text": "a"}))).unwrap();
        assert_eq!(text, TextNode::new("a"));

        let err = TextNode::from_json(&object(json!({"text": 3}))).unwrap_err();
        assert!(matches!(err, ContentError::InvalidNode { .. }));
    }

    #[test]
    fn test_check_version() {
        assert_eq!(check_version(&object(json!({})), "text", 1).unwrap(), 1);
        let err = check_version(&object(json!({"version": 2})), "text", 1).unwrap_err();
        assert!(matches!(err, ContentError::SchemaVersion { found: 2, supported: 1, .. }));
    }

    #[test]
    fn test_merge_rules() {
        let a = TextNode::new("a").with_format(TextFormat::BOLD);
        let b = TextNode::new("b").with_format(TextFormat::BOLD);
        let c = TextNode::new("c");
        assert!(a.can_merge_with(&b));
        assert!(!a.can_merge_with(&c));
    }
}
