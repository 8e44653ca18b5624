//! Node kind registry.
//!
//! Maps type tags to their JSON import function and HTML tags to their DOM
//! import rules. A registry is built once per document call and consulted
//! for every node of that document.
//!
//! # Examples
//!
//! ```
//! use kg_cards::nodes::{NodeKind, NodeRegistry};
//!
//! let mut registry = NodeRegistry::with_defaults();
//! registry.register(NodeKind::extension("callout", 1));
//!
//! assert!(registry.contains("paragraph"));
//! assert!(registry.contains("callout"));
//! assert!(!registry.contains("widget"));
//! ```

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::error::{ContentError, ContentResult};
use crate::import::SourceElement;

use super::card::CardNode;
use super::element::{
    HeadingNode, LinkNode, ListItemNode, ListNode, ParagraphNode, QuoteNode, import_heading,
    import_link, import_list, import_list_item, import_paragraph, import_quote,
};
use super::extension::ExtensionNode;
use super::text::{LineBreakNode, TextFormat, TextNode, import_line_break, import_text_format};
use super::{DocNode, EmbedNode, GalleryNode, ImageNode, embed, gallery, image};

// =============================================================================
// Conversion types
// =============================================================================

/// What a DOM import rule turns an element into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomConversion {
    /// Finished node; the element's DOM children are not visited
    Leaf(DocNode),
    /// Element node that receives the converted DOM children
    Container(DocNode),
    /// Apply a text format to all text below the element
    Format(TextFormat),
    /// Drop the element and its subtree
    Skip,
}

pub type JsonImportFn = fn(&Map<String, Value>, &NodeRegistry) -> ContentResult<DocNode>;

pub type DomImportFn = fn(&SourceElement) -> Option<DomConversion>;

/// Recognition rule for a set of HTML tags. Higher priority runs first.
#[derive(Debug, Clone, Copy)]
pub struct DomImportRule {
    pub tags: &'static [&'static str],
    pub priority: u8,
    pub convert: DomImportFn,
}

// =============================================================================
// NodeKind
// =============================================================================

/// Registration record for one node type.
#[derive(Debug, Clone)]
pub struct NodeKind {
    pub node_type: CompactString,
    pub version: u32,
    pub import_json: JsonImportFn,
    pub dom_rules: SmallVec<[DomImportRule; 2]>,
}

impl NodeKind {
    pub fn new(node_type: impl Into<CompactString>, version: u32, import_json: JsonImportFn) -> Self {
        Self {
            node_type: node_type.into(),
            version,
            import_json,
            dom_rules: SmallVec::new(),
        }
    }

    /// Add a DOM import rule (builder style)
    pub fn with_dom_rule(mut self, tags: &'static [&'static str], priority: u8, convert: DomImportFn) -> Self {
        self.dom_rules.push(DomImportRule {
            tags,
            priority,
            convert,
        });
        self
    }

    /// Kind for a built-in card node type.
    pub fn card<N: CardNode + Into<DocNode>>() -> Self {
        Self::new(N::TYPE, N::VERSION, import_card::<N>)
    }

    /// Kind for a caller-defined decorator node stored as [`ExtensionNode`].
    pub fn extension(node_type: impl Into<CompactString>, version: u32) -> Self {
        Self::new(node_type, version, |serialized, registry| {
            ExtensionNode::from_json(serialized, registry).map(DocNode::Extension)
        })
    }
}

fn import_card<N: CardNode + Into<DocNode>>(
    serialized: &Map<String, Value>,
    _registry: &NodeRegistry,
) -> ContentResult<DocNode> {
    N::import_json_map(serialized).map(Into::into)
}

// =============================================================================
// NodeRegistry
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    kinds: FxHashMap<CompactString, NodeKind>,
    /// Tag → rules sorted by descending priority, registration order within a priority
    by_tag: FxHashMap<CompactString, SmallVec<[DomImportRule; 2]>>,
    order: Vec<CompactString>,
}

impl NodeRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in node type.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in default_kinds() {
            registry.register(kind);
        }
        tracing::trace!(kinds = registry.len(), "built default node registry");
        registry
    }

    /// Register a kind, replacing any kind with the same type tag.
    pub fn register(&mut self, kind: NodeKind) {
        let node_type = kind.node_type.clone();
        if self.kinds.insert(node_type.clone(), kind).is_some() {
            tracing::debug!(node_type = %node_type, "replacing registered node kind");
        } else {
            self.order.push(node_type);
        }
        self.rebuild_tag_index();
    }

    pub fn get(&self, node_type: &str) -> Option<&NodeKind> {
        self.kinds.get(node_type)
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.kinds.contains_key(node_type)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Registered type tags in registration order.
    pub fn node_types(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(CompactString::as_str)
    }

    /// Import one serialized node through its registered kind.
    pub fn import_json(&self, serialized: &Value) -> ContentResult<DocNode> {
        let Value::Object(serialized) = serialized else {
            return Err(ContentError::invalid("node", "expected a JSON object"));
        };
        let node_type = serialized
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ContentError::invalid("node", "missing `type` tag"))?;
        let kind = self
            .get(node_type)
            .ok_or_else(|| ContentError::UnknownNodeType(node_type.to_owned()))?;
        (kind.import_json)(serialized, self)
    }

    /// First matching DOM import rule for `element`, by priority.
    pub fn import_dom(&self, element: &SourceElement) -> Option<DomConversion> {
        self.by_tag
            .get(element.tag())?
            .iter()
            .find_map(|rule| (rule.convert)(element))
    }

    fn rebuild_tag_index(&mut self) {
        self.by_tag.clear();
        for node_type in &self.order {
            let Some(kind) = self.kinds.get(node_type) else {
                continue;
            };
            for rule in &kind.dom_rules {
                for tag in rule.tags {
                    self.by_tag.entry(CompactString::from(*tag)).or_default().push(*rule);
                }
            }
        }
        for rules in self.by_tag.values_mut() {
            // Stable: equal priorities keep registration order
            rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        }
    }
}

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const FORMAT_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "s", "del", "strike", "u", "ins", "code", "kbd", "samp", "sub",
    "sup", "mark", "span",
];

fn default_kinds() -> Vec<NodeKind> {
    vec![
        NodeKind::new(ParagraphNode::TYPE, ParagraphNode::VERSION, |s, r| {
            ParagraphNode::from_json(s, r).map(DocNode::Paragraph)
        })
        .with_dom_rule(&["p"], 0, import_paragraph),
        NodeKind::new(HeadingNode::TYPE, HeadingNode::VERSION, |s, r| {
            HeadingNode::from_json(s, r).map(DocNode::Heading)
        })
        .with_dom_rule(HEADING_TAGS, 0, import_heading),
        NodeKind::new(QuoteNode::TYPE, QuoteNode::VERSION, |s, r| {
            QuoteNode::from_json(s, r).map(DocNode::Quote)
        })
        .with_dom_rule(&["blockquote"], 0, import_quote),
        NodeKind::new(ListNode::TYPE, ListNode::VERSION, |s, r| {
            ListNode::from_json(s, r).map(DocNode::List)
        })
        .with_dom_rule(&["ul", "ol"], 0, import_list),
        NodeKind::new(ListItemNode::TYPE, ListItemNode::VERSION, |s, r| {
            ListItemNode::from_json(s, r).map(DocNode::ListItem)
        })
        .with_dom_rule(&["li"], 0, import_list_item),
        NodeKind::new(LinkNode::TYPE, LinkNode::VERSION, |s, r| {
            LinkNode::from_json(s, r).map(DocNode::Link)
        })
        .with_dom_rule(&["a"], 0, import_link),
        NodeKind::new(TextNode::TYPE, TextNode::VERSION, |s, _| {
            TextNode::from_json(s).map(DocNode::Text)
        })
        .with_dom_rule(FORMAT_TAGS, 0, import_text_format),
        NodeKind::new(LineBreakNode::TYPE, LineBreakNode::VERSION, |s, _| {
            LineBreakNode::from_json(s).map(DocNode::LineBreak)
        })
        .with_dom_rule(&["br"], 0, import_line_break),
        NodeKind::card::<ImageNode>()
            .with_dom_rule(&["figure"], 1, image::import_image_figure)
            .with_dom_rule(&["img"], 0, image::import_img),
        NodeKind::card::<GalleryNode>().with_dom_rule(&["figure"], 1, gallery::import_gallery_figure),
        NodeKind::card::<EmbedNode>()
            .with_dom_rule(&["figure"], 1, embed::import_embed_figure)
            .with_dom_rule(&["iframe"], 0, embed::import_iframe),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_registered() {
        let registry = NodeRegistry::with_defaults();
        let types: Vec<_> = registry.node_types().collect();
        assert_eq!(
            types,
            vec![
                "paragraph", "heading", "quote", "list", "listitem", "link", "text", "linebreak",
                "image", "gallery", "embed"
            ]
        );
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_import_json_dispatch() {
        let registry = NodeRegistry::with_defaults();
        let node = registry
            .import_json(&json!({"type": "embed", "url": "https://example.com/"}))
            .unwrap();
        assert_eq!(node.as_embed().map(|embed| embed.url()), Some("https://example.com/"));

        let err = registry.import_json(&json!({"type": "widget"})).unwrap_err();
        assert!(matches!(err, ContentError::UnknownNodeType(ref t) if t == "widget"));

        let err = registry.import_json(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ContentError::InvalidNode { .. }));
    }

    #[test]
    fn test_extension_registration() {
        let mut registry = NodeRegistry::with_defaults();
        registry.register(NodeKind::extension("callout", 1));
        let node = registry
            .import_json(&json!({"type": "callout", "version": 1, "text": "Hi"}))
            .unwrap();
        let extension = node.as_extension().unwrap();
        assert_eq!(extension.node_type, "callout");
        assert_eq!(extension.field("text"), Some(&json!("Hi")));
    }

    #[test]
    fn test_replacing_kind_keeps_position() {
        let mut registry = NodeRegistry::with_defaults();
        let before = registry.len();
        registry.register(NodeKind::card::<ImageNode>());
        assert_eq!(registry.len(), before);
        assert_eq!(registry.node_types().nth(8), Some("image"));
        assert!(registry.get("image").unwrap().dom_rules.is_empty());
    }
}
