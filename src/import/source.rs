//! Read-only view over parsed source HTML.
//!
//! Import rules only ever look at elements, so [`SourceElement`] wraps an
//! element handle of the `RcDom` tree and exposes the queries the built-in
//! rules need: attributes, classes, inline styles, descendant search and
//! markup serialization.

use std::fmt;
use std::rc::Rc;

use html5ever::parse_document;
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::attr::has_class;

/// Element of a parsed source document.
#[derive(Clone)]
pub struct SourceElement {
    handle: Handle,
}

impl SourceElement {
    /// Wrap `handle` if it is an element.
    pub(crate) fn new(handle: Handle) -> Option<Self> {
        matches!(handle.data, NodeData::Element { .. }).then_some(Self { handle })
    }

    pub(crate) fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Lowercase local tag name.
    pub fn tag(&self) -> &str {
        match self.handle.data {
            NodeData::Element { ref name, .. } => name.local.as_ref(),
            _ => "",
        }
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        let NodeData::Element { ref attrs, .. } = self.handle.data else {
            return None;
        };
        attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == name)
            .map(|attr| attr.value.to_string())
    }

    /// Attribute parsed as a non-negative integer; `"600px"` style values fail.
    pub fn attr_u32(&self, name: &str) -> Option<u32> {
        self.attr(name)?.trim().parse().ok()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class").is_some_and(|value| has_class(&value, class))
    }

    /// Lowercased value of one inline `style` declaration.
    pub fn style(&self, property: &str) -> Option<String> {
        let style = self.attr("style")?;
        style.split(';').find_map(|declaration| {
            let (key, value) = declaration.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(property)
                .then(|| value.trim().to_ascii_lowercase())
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tree queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn child_elements(&self) -> Vec<SourceElement> {
        self.handle
            .children
            .borrow()
            .iter()
            .filter_map(|child| Self::new(child.clone()))
            .collect()
    }

    pub fn same_node(&self, other: &SourceElement) -> bool {
        Rc::ptr_eq(&self.handle, &other.handle)
    }

    /// First descendant (document order, excluding `self`) matching `pred`.
    pub fn find(&self, pred: impl Fn(&SourceElement) -> bool) -> Option<SourceElement> {
        let mut found = None;
        walk_descendants(&self.handle, &mut |el| {
            if pred(&el) {
                found = Some(el);
                false
            } else {
                true
            }
        });
        found
    }

    /// Every descendant matching `pred`, in document order.
    pub fn find_all(&self, pred: impl Fn(&SourceElement) -> bool) -> Vec<SourceElement> {
        let mut found = Vec::new();
        walk_descendants(&self.handle, &mut |el| {
            if pred(&el) {
                found.push(el);
            }
            true
        });
        found
    }

    /// Concatenated descendant text.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.handle, &mut out);
        out
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Markup
    // ─────────────────────────────────────────────────────────────────────────

    pub fn inner_html(&self) -> String {
        serialize_handle(&self.handle, TraversalScope::ChildrenOnly(None))
    }

    pub fn outer_html(&self) -> String {
        serialize_handle(&self.handle, TraversalScope::IncludeNode)
    }

    /// Inner markup with child elements of the given tags left out.
    pub fn inner_html_without(&self, tags: &[&str]) -> String {
        let mut out = String::new();
        for child in self.handle.children.borrow().iter() {
            if let Some(el) = Self::new(child.clone()) {
                if tags.contains(&el.tag()) {
                    continue;
                }
            }
            out.push_str(&serialize_handle(child, TraversalScope::IncludeNode));
        }
        out
    }
}

impl fmt::Debug for SourceElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceElement")
            .field("tag", &self.tag())
            .field("class", &self.attr("class"))
            .finish()
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// A parsed document together with its `<body>` element.
///
/// Dropping an `RcDom` detaches the children of every node in the tree, so
/// handles into it are only usable while this value is alive.
pub(crate) struct ParsedBody {
    _dom: RcDom,
    body: SourceElement,
}

impl ParsedBody {
    pub(crate) fn body(&self) -> &SourceElement {
        &self.body
    }
}

/// Parse an HTML fragment as the body of a fresh document.
pub(crate) fn parse_body(html: &str) -> Option<ParsedBody> {
    let wrapped = format!("<body>{}</body>", html.trim());
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes());
    let body = find_body(&dom.document)?;
    Some(ParsedBody { _dom: dom, body })
}

fn find_body(handle: &Handle) -> Option<SourceElement> {
    if let Some(el) = SourceElement::new(handle.clone()) {
        if el.tag() == "body" {
            return Some(el);
        }
    }
    handle.children.borrow().iter().find_map(find_body)
}

/// Depth-first over element descendants; `visit` returns `false` to stop.
fn walk_descendants(handle: &Handle, visit: &mut dyn FnMut(SourceElement) -> bool) -> bool {
    for child in handle.children.borrow().iter() {
        if let Some(el) = SourceElement::new(child.clone()) {
            if !visit(el) {
                return false;
            }
        }
        if !walk_descendants(child, visit) {
            return false;
        }
    }
    true
}

fn collect_text(handle: &Handle, out: &mut String) {
    match handle.data {
        NodeData::Text { ref contents } => out.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child in handle.children.borrow().iter() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

fn serialize_handle(handle: &Handle, traversal_scope: TraversalScope) -> String {
    let mut bytes = Vec::new();
    let serializable: SerializableHandle = handle.clone().into();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    if let Err(err) = serialize(&mut bytes, &serializable, opts) {
        tracing::debug!(%err, "failed to serialize source markup");
        return String::new();
    }
    String::from_utf8(bytes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> ParsedBody {
        parse_body(html).unwrap()
    }

    #[test]
    fn test_parse_body() {
        let parsed = parse("  <p class=\"a b\">Hi</p>  ");
        let body = parsed.body();
        assert_eq!(body.tag(), "body");
        let children = body.child_elements();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].tag(), "p");
        assert!(children[0].has_class("b"));
        assert!(!children[0].has_class("c"));
    }

    #[test]
    fn test_attrs_and_styles() {
        let parsed = parse(r#"<img src="/a.png" width="600" height="auto" style="Font-Weight: 700; color:RED">"#);
        let body = parsed.body();
        let img = body.find(|el| el.tag() == "img").unwrap();
        assert_eq!(img.attr("src").as_deref(), Some("/a.png"));
        assert_eq!(img.attr_u32("width"), Some(600));
        assert_eq!(img.attr_u32("height"), None);
        assert_eq!(img.style("font-weight").as_deref(), Some("700"));
        assert_eq!(img.style("color").as_deref(), Some("red"));
        assert_eq!(img.style("margin"), None);
    }

    #[test]
    fn test_find_and_text() {
        let parsed = parse("<div><a href=\"/x\"><img src=\"1\"></a><p>one <b>two</b></p><img src=\"2\"></div>");
        let body = parsed.body();
        let imgs = body.find_all(|el| el.tag() == "img");
        assert_eq!(imgs.len(), 2);
        let link = body.find(|el| el.tag() == "a").unwrap();
        assert!(link.find(|el| el.same_node(&imgs[0])).is_some());
        assert!(link.find(|el| el.same_node(&imgs[1])).is_none());
        assert_eq!(body.find(|el| el.tag() == "p").unwrap().text_content(), "one two");
    }

    #[test]
    fn test_markup() {
        let parsed = parse("<figure><iframe src=\"https://x\"></iframe><figcaption>Cap &amp; more</figcaption></figure>");
        let body = parsed.body();
        let figure = body.find(|el| el.tag() == "figure").unwrap();
        assert_eq!(figure.inner_html_without(&["figcaption"]), "<iframe src=\"https://x\"></iframe>");
        let caption = figure.find(|el| el.tag() == "figcaption").unwrap();
        assert_eq!(caption.inner_html(), "Cap &amp; more");
        assert!(figure.outer_html().starts_with("<figure><iframe"));
    }

    #[test]
    fn test_body_children_outlive_parse() {
        let parsed = parse("<p>a</p>");
        let children = parsed.body().child_elements();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].text_content(), "a");
    }
}
