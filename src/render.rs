//! HTML serialization for the render tree
//!
//! Produces the exact fragment format card consumers compare against:
//! void elements have no closing tag and no self-closing slash, attributes
//! are written in insertion order, raw text sections are written verbatim.

use crate::attr::Attrs;
use crate::dom::{Element, Node};

// =============================================================================
// Rendering
// =============================================================================

/// Render an element (and its subtree) to an HTML string.
pub fn element_to_html(elem: &Element) -> String {
    let mut output = String::new();
    render_element(elem, &mut output);
    output
}

/// Render an optional element; `None` renders as the empty string.
pub fn fragment_to_html(elem: Option<&Element>) -> String {
    elem.map(element_to_html).unwrap_or_default()
}

/// Render a sequence of sibling nodes.
pub fn nodes_to_html(nodes: &[Node]) -> String {
    let mut output = String::new();
    for node in nodes {
        render_node(node, &mut output);
    }
    output
}

fn render_element(elem: &Element, output: &mut String) {
    output.push('<');
    output.push_str(&elem.tag);
    render_attrs(&elem.attrs, output);
    output.push('>');

    if is_void_element(&elem.tag) {
        return;
    }

    for child in &elem.children {
        render_node(child, output);
    }

    output.push_str("</");
    output.push_str(&elem.tag);
    output.push('>');
}

fn render_node(node: &Node, output: &mut String) {
    match node {
        Node::Element(elem) => render_element(elem, output),
        Node::Text(text) => {
            if text.is_raw() {
                output.push_str(&text.content);
            } else {
                output.push_str(&escape_html(&text.content));
            }
        }
    }
}

fn render_attrs(attrs: &Attrs, output: &mut String) {
    for (name, value) in attrs.iter() {
        output.push(' ');
        output.push_str(name);
        output.push_str("=\"");
        output.push_str(&escape_attr(value));
        output.push('"');
    }
}

/// Escape text content.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape an attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    result
}

/// Check if element is a void element (no closing tag).
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_void_element() {
        let elem = Element::new("figure")
            .with_class("kg-card")
            .child(Element::new("img").attr("src", "/a.png"));
        assert_eq!(
            element_to_html(&elem),
            r#"<figure class="kg-card"><img src="/a.png"></figure>"#
        );
    }

    #[test]
    fn test_render_raw_and_escaped_text() {
        let mut elem = Element::new("figcaption");
        elem.push_raw("<b>bold</b>");
        elem.push_text(" & <i>");
        assert_eq!(
            element_to_html(&elem),
            "<figcaption><b>bold</b> &amp; &lt;i&gt;</figcaption>"
        );
    }

    #[test]
    fn test_attr_ampersand_escaped() {
        let elem = Element::new("img").attr("src", "https://x.com/a?b=1&c=\"2\"");
        assert_eq!(
            element_to_html(&elem),
            r#"<img src="https://x.com/a?b=1&amp;c=&quot;2&quot;">"#
        );
    }

    #[test]
    fn test_empty_fragment() {
        assert_eq!(fragment_to_html(None), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
    }
}
