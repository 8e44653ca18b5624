//! Document node model.
//!
//! [`DocNode`] is the closed union over every built-in node type, plus
//! [`ExtensionNode`] for caller-registered decorators. Nodes are owned
//! values: `set_*` accessors mutate a node's own copy, `with_*` return a new
//! one, and clones never share state.
//!
//! Node categories drive import normalization and export:
//!
//! | Category    | Types                                  |
//! |-------------|----------------------------------------|
//! | inline      | text, linebreak, link                  |
//! | text block  | paragraph, heading, quote              |
//! | list        | list, listitem                         |
//! | decorator   | image, gallery, embed, extensions      |

mod card;
mod document;
mod element;
mod embed;
mod extension;
mod gallery;
mod image;
mod registry;
mod text;

pub use card::CardNode;
pub use document::{Document, SerializedDocument, first_strong_direction};
pub use element::{
    Direction, ElementBase, ElementFormat, HeadingNode, HeadingTag, LinkNode, LinkPayload,
    ListItemNode, ListNode, ListType, ParagraphNode, QuoteNode,
};
pub use embed::EmbedNode;
pub use extension::ExtensionNode;
pub use gallery::GalleryNode;
pub use image::ImageNode;
pub use registry::{DomConversion, DomImportFn, DomImportRule, JsonImportFn, NodeKind, NodeRegistry};
pub use text::{LineBreakNode, TextFormat, TextMode, TextNode};

use serde_json::Value;

// =============================================================================
// DocNode
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocNode {
    Paragraph(ParagraphNode),
    Heading(HeadingNode),
    Quote(QuoteNode),
    List(ListNode),
    ListItem(ListItemNode),
    Link(LinkNode),
    Text(TextNode),
    LineBreak(LineBreakNode),
    Image(ImageNode),
    Gallery(GalleryNode),
    Embed(EmbedNode),
    Extension(ExtensionNode),
}

impl DocNode {
    crate::impl_doc_node_accessors!(
        paragraph, heading, quote, list, list_item, link, text, line_break, image, gallery, embed,
        extension,
    );

    /// Serialized `type` tag.
    pub fn node_type(&self) -> &str {
        match self {
            Self::Paragraph(_) => ParagraphNode::TYPE,
            Self::Heading(_) => HeadingNode::TYPE,
            Self::Quote(_) => QuoteNode::TYPE,
            Self::List(_) => ListNode::TYPE,
            Self::ListItem(_) => ListItemNode::TYPE,
            Self::Link(_) => LinkNode::TYPE,
            Self::Text(_) => TextNode::TYPE,
            Self::LineBreak(_) => LineBreakNode::TYPE,
            Self::Image(_) => ImageNode::TYPE,
            Self::Gallery(_) => GalleryNode::TYPE,
            Self::Embed(_) => EmbedNode::TYPE,
            Self::Extension(e) => e.node_type.as_str(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Paragraph(n) => n.to_json(),
            Self::Heading(n) => n.to_json(),
            Self::Quote(n) => n.to_json(),
            Self::List(n) => n.to_json(),
            Self::ListItem(n) => n.to_json(),
            Self::Link(n) => n.to_json(),
            Self::Text(n) => n.to_json(),
            Self::LineBreak(n) => n.to_json(),
            Self::Image(n) => n.export_json(),
            Self::Gallery(n) => n.export_json(),
            Self::Embed(n) => n.export_json(),
            Self::Extension(n) => n.to_json(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Categories
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Text(_) | Self::LineBreak(_) | Self::Link(_))
    }

    pub fn is_text_block(&self) -> bool {
        matches!(self, Self::Paragraph(_) | Self::Heading(_) | Self::Quote(_))
    }

    pub fn is_decorator(&self) -> bool {
        matches!(
            self,
            Self::Image(_) | Self::Gallery(_) | Self::Embed(_) | Self::Extension(_)
        )
    }

    /// Type-specific emptiness.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(n) => n.is_empty(),
            Self::LineBreak(_) | Self::Extension(_) => false,
            Self::Image(n) => n.is_empty(),
            Self::Gallery(n) => n.is_empty(),
            Self::Embed(n) => n.is_empty(),
            _ => self.children().is_empty(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Children
    // ─────────────────────────────────────────────────────────────────────────

    pub fn element(&self) -> Option<&ElementBase> {
        match self {
            Self::Paragraph(n) => Some(&n.base),
            Self::Heading(n) => Some(&n.base),
            Self::Quote(n) => Some(&n.base),
            Self::List(n) => Some(&n.base),
            Self::ListItem(n) => Some(&n.base),
            Self::Link(n) => Some(&n.base),
            _ => None,
        }
    }

    pub fn element_mut(&mut self) -> Option<&mut ElementBase> {
        match self {
            Self::Paragraph(n) => Some(&mut n.base),
            Self::Heading(n) => Some(&mut n.base),
            Self::Quote(n) => Some(&mut n.base),
            Self::List(n) => Some(&mut n.base),
            Self::ListItem(n) => Some(&mut n.base),
            Self::Link(n) => Some(&mut n.base),
            _ => None,
        }
    }

    /// Children of an element node; leaves have none.
    pub fn children(&self) -> &[DocNode] {
        self.element().map_or(&[], |base| base.children.as_slice())
    }

    /// Detach and return the children, leaving the node empty.
    pub fn take_children(&mut self) -> Vec<DocNode> {
        self.element_mut()
            .map(|base| std::mem::take(&mut base.children))
            .unwrap_or_default()
    }

    /// Replace the children of an element node. Leaves are returned unchanged.
    pub fn with_children(mut self, children: Vec<DocNode>) -> Self {
        if let Some(base) = self.element_mut() {
            base.children = children;
        }
        self
    }

    /// Copy with the same attributes and no children. Leaves are cloned.
    pub fn shell(&self) -> Self {
        match self {
            Self::Paragraph(n) => Self::Paragraph(ParagraphNode { base: n.base.shell() }),
            Self::Heading(n) => Self::Heading(HeadingNode {
                base: n.base.shell(),
                tag: n.tag,
            }),
            Self::Quote(n) => Self::Quote(QuoteNode { base: n.base.shell() }),
            Self::List(n) => Self::List(ListNode {
                base: n.base.shell(),
                list_type: n.list_type,
                start: n.start,
            }),
            Self::ListItem(n) => Self::ListItem(ListItemNode {
                base: n.base.shell(),
                value: n.value,
            }),
            Self::Link(n) => Self::Link(n.shell()),
            leaf => leaf.clone(),
        }
    }

    /// Plain text: text nodes verbatim, line breaks as `\n`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(n) => out.push_str(&n.text),
            Self::LineBreak(_) => out.push('\n'),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}

macro_rules! impl_from_node {
    ($($variant:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                impl From<[<$variant Node>]> for DocNode {
                    fn from(node: [<$variant Node>]) -> Self {
                        Self::$variant(node)
                    }
                }
            )*
        }
    };
}

impl_from_node!(
    Paragraph, Heading, Quote, List, ListItem, Link, Text, LineBreak, Image, Gallery, Embed,
    Extension,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph() -> DocNode {
        ParagraphNode::new(vec![
            TextNode::new("Hello ").into(),
            LinkNode::new("/post", vec![TextNode::new("link").into()]).into(),
            LineBreakNode.into(),
            TextNode::new("bye").into(),
        ])
        .into()
    }

    #[test]
    fn test_accessors() {
        let node = paragraph();
        assert!(node.is_paragraph());
        assert!(node.as_paragraph().is_some());
        assert!(node.as_heading().is_none());
        assert_eq!(node.node_type(), "paragraph");
        assert!(node.children()[1].is_link());
    }

    #[test]
    fn test_text_content() {
        assert_eq!(paragraph().text_content(), "Hello link\nbye");
    }

    #[test]
    fn test_categories() {
        let node = paragraph();
        assert!(node.is_text_block());
        assert!(node.children()[0].is_inline());
        assert!(DocNode::from(ImageNode::default()).is_decorator());
        assert!(DocNode::from(ImageNode::default()).is_empty());
        assert!(!node.is_empty());
    }

    #[test]
    fn test_shell_and_children() {
        let mut node: DocNode = HeadingNode::new(HeadingTag::H3, vec![TextNode::new("x").into()]).into();
        let shell = node.shell();
        assert!(shell.children().is_empty());
        assert_eq!(shell.as_heading().map(|h| h.tag), Some(HeadingTag::H3));

        let children = node.take_children();
        assert_eq!(children.len(), 1);
        assert!(node.is_empty());
        let node = node.with_children(children);
        assert_eq!(node.text_content(), "x");
    }
}
