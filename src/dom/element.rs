//! Element type - the building block of rendered card markup.

use compact_str::CompactString;

use crate::attr::{Attrs, AttrsExt};

use super::{Children, Node, Text};

// =============================================================================
// Element
// =============================================================================

/// HTML element with ordered attributes and children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// HTML tag name
    pub tag: CompactString,
    /// Element attributes, in insertion order
    pub attrs: Attrs,
    /// Child nodes
    pub children: Children,
}

impl Element {
    pub fn new(tag: impl Into<CompactString>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Children::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder API
    // ─────────────────────────────────────────────────────────────────────────

    /// Add an attribute (builder style)
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set the `class` attribute (builder style)
    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Append a child element (builder style)
    pub fn child(mut self, child: Element) -> Self {
        self.push_elem(child);
        self
    }

    /// Append a text node (builder style)
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.push_text(content);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Children
    // ─────────────────────────────────────────────────────────────────────────

    pub fn push_elem(&mut self, child: Element) {
        self.children.push(Node::Element(Box::new(child)));
    }

    pub fn push_text(&mut self, content: impl Into<String>) {
        self.children.push(Node::Text(Text::new(content)));
    }

    pub fn push_raw(&mut self, html: impl Into<String>) {
        self.children.push(Node::Text(Text::raw(html)));
    }

    /// Check if element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Iterate over child element references
    pub fn children_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| n.as_element())
    }

    pub fn first_child(&self) -> Option<&Element> {
        self.children_elements().next()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attribute access
    // ─────────────────────────────────────────────────────────────────────────

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attr(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.set_attr(name, value);
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove_attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.has_attr(name)
    }

    pub fn class(&self) -> Option<&str> {
        self.get_attr("class")
    }

    /// Check the class list for a single class name
    pub fn has_class(&self, class: &str) -> bool {
        self.class()
            .is_some_and(|value| crate::attr::has_class(value, class))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Concatenated text of all descendant text nodes (raw sections included as-is)
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => buf.push_str(&t.content),
                Node::Element(e) => e.collect_text(buf),
            }
        }
    }

    /// Depth-first search for the first element matching `predicate` (self included)
    pub fn find<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        Self::find_in(self, &predicate)
    }

    fn find_in<'a, F>(elem: &'a Element, predicate: &F) -> Option<&'a Element>
    where
        F: Fn(&Element) -> bool,
    {
        if predicate(elem) {
            return Some(elem);
        }
        elem.children_elements()
            .find_map(|child| Self::find_in(child, predicate))
    }

    /// Collect all elements matching `predicate` in document order
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut results = Vec::new();
        Self::collect_matching(self, &predicate, &mut results);
        results
    }

    fn collect_matching<'a, F>(elem: &'a Element, predicate: &F, results: &mut Vec<&'a Element>)
    where
        F: Fn(&Element) -> bool,
    {
        if predicate(elem) {
            results.push(elem);
        }
        for child in elem.children_elements() {
            Self::collect_matching(child, predicate, results);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_builder() {
        let elem = Element::new("figure")
            .with_class("kg-card kg-image-card")
            .attr("data-x", "1")
            .child(Element::new("img").attr("src", "/a.png"))
            .text("Hello");

        assert_eq!(elem.tag, "figure");
        assert_eq!(elem.class(), Some("kg-card kg-image-card"));
        assert!(elem.has_class("kg-image-card"));
        assert_eq!(elem.child_count(), 2);
        assert_eq!(elem.text_content(), "Hello");
        assert_eq!(elem.first_child().map(|e| e.tag.as_str()), Some("img"));
    }

    #[test]
    fn test_element_find() {
        let elem = Element::new("div")
            .child(Element::new("span").with_class("a"))
            .child(Element::new("p").child(Element::new("span").with_class("b")));

        let found = elem.find(|e| e.tag == "p").unwrap();
        assert_eq!(found.child_count(), 1);
        assert_eq!(elem.find_all(|e| e.tag == "span").len(), 2);
        assert!(elem.find(|e| e.tag == "table").is_none());
    }
}
