//! Render tree and the DOM-construction capability.
//!
//! Card renderers never touch a host document directly. They receive a
//! [`Dom`] implementation and build markup through it, so the same renderer
//! can target this crate's own tree ([`VDom`]) or a host DOM binding.

mod element;
mod text;

pub use element::Element;
pub use text::{Text, TextKind};

use smallvec::SmallVec;

// =============================================================================
// Node
// =============================================================================

/// Node in a render tree - either Element or Text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
}

impl Node {
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Type alias for children collection.
pub type Children = SmallVec<[Node; 4]>;

// =============================================================================
// Dom capability
// =============================================================================

/// Minimal DOM-construction capability supplied by the host.
///
/// Renderers only create elements, set attributes and append children. Text
/// appended with [`Dom::append_raw_html`] is trusted markup and must be
/// inserted without escaping.
pub trait Dom {
    type Element;

    fn create_element(&mut self, tag: &str) -> Self::Element;

    fn set_attribute(&mut self, element: &mut Self::Element, name: &str, value: &str);

    fn append_child(&mut self, parent: &mut Self::Element, child: Self::Element);

    fn append_text(&mut self, parent: &mut Self::Element, text: &str);

    fn append_raw_html(&mut self, parent: &mut Self::Element, html: &str);
}

/// Default [`Dom`] producing this crate's [`Element`] tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct VDom;

impl Dom for VDom {
    type Element = Element;

    fn create_element(&mut self, tag: &str) -> Element {
        Element::new(tag)
    }

    fn set_attribute(&mut self, element: &mut Element, name: &str, value: &str) {
        element.set_attr(name, value);
    }

    fn append_child(&mut self, parent: &mut Element, child: Element) {
        parent.push_elem(child);
    }

    fn append_text(&mut self, parent: &mut Element, text: &str) {
        parent.push_text(text);
    }

    fn append_raw_html(&mut self, parent: &mut Element, html: &str) {
        parent.push_raw(html);
    }
}

// =============================================================================
// Exported
// =============================================================================

/// Result of exporting a node to DOM.
///
/// `Empty` is how a node signals "nothing to render": no outer element and
/// empty text content, as opposed to an empty `<figure>` shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exported<E> {
    Element(E),
    Empty,
}

impl<E> Exported<E> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Exported::Empty)
    }

    pub fn element(&self) -> Option<&E> {
        match self {
            Exported::Element(e) => Some(e),
            Exported::Empty => None,
        }
    }

    pub fn into_element(self) -> Option<E> {
        match self {
            Exported::Element(e) => Some(e),
            Exported::Empty => None,
        }
    }
}

impl<E> From<Option<E>> for Exported<E> {
    fn from(value: Option<E>) -> Self {
        value.map_or(Exported::Empty, Exported::Element)
    }
}

impl Exported<Element> {
    /// Serialized markup of the outer element, `None` when empty.
    pub fn outer_html(&self) -> Option<String> {
        self.element().map(crate::render::element_to_html)
    }

    pub fn text_content(&self) -> String {
        self.element().map(Element::text_content).unwrap_or_default()
    }
}
