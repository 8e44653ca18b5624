//! Document root and its JSON schema.
//!
//! ```json
//! {"root": {"children": [...], "direction": null, "format": "", "indent": 0, "type": "root", "version": 1}}
//! ```

use serde_json::{Map, Value};
use unicode_bidi::{BidiClass, bidi_class};

use crate::error::{ContentError, ContentResult};

use super::element::{Direction, ElementBase};
use super::registry::NodeRegistry;
use super::text::check_version;
use super::DocNode;

/// Serialized document state.
pub type SerializedDocument = Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub root: ElementBase,
}

impl Document {
    pub const ROOT_TYPE: &'static str = "root";
    pub const VERSION: u32 = 1;

    pub fn new(children: Vec<DocNode>) -> Self {
        Self {
            root: ElementBase::with_children(children),
        }
    }

    pub fn children(&self) -> &[DocNode] {
        &self.root.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<DocNode> {
        &mut self.root.children
    }

    pub fn push(&mut self, node: impl Into<DocNode>) {
        self.root.children.push(node.into());
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Top-level blocks' text, separated by blank lines.
    pub fn text_content(&self) -> String {
        self.children()
            .iter()
            .map(DocNode::text_content)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // JSON
    // ─────────────────────────────────────────────────────────────────────────

    pub fn to_json(&self) -> SerializedDocument {
        let mut out = Map::new();
        out.insert(
            "root".into(),
            Value::Object(self.root.to_json(Self::ROOT_TYPE, Self::VERSION)),
        );
        Value::Object(out)
    }

    pub fn to_json_string(&self) -> ContentResult<String> {
        Ok(serde_json::to_string(&self.to_json())?)
    }

    pub fn from_json(serialized: &Value, registry: &NodeRegistry) -> ContentResult<Self> {
        let root = serialized
            .get("root")
            .and_then(Value::as_object)
            .ok_or_else(|| ContentError::invalid(Self::ROOT_TYPE, "missing `root` object"))?;
        if let Some(found) = root.get("type").and_then(Value::as_str) {
            if found != Self::ROOT_TYPE {
                return Err(ContentError::invalid(
                    Self::ROOT_TYPE,
                    format!("root has type {found:?}"),
                ));
            }
        }
        check_version(root, Self::ROOT_TYPE, Self::VERSION)?;
        Ok(Self {
            root: ElementBase::from_json(root, Self::ROOT_TYPE, registry)?,
        })
    }

    pub fn from_json_str(serialized: &str, registry: &NodeRegistry) -> ContentResult<Self> {
        let value: Value = serde_json::from_str(serialized)?;
        Self::from_json(&value, registry)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Direction
    // ─────────────────────────────────────────────────────────────────────────

    /// Set every element's direction from the first strong character of its
    /// text; elements without strong characters get no direction.
    pub fn update_directions(&mut self) {
        for child in &mut self.root.children {
            update_node_direction(child);
        }
        self.root.direction = first_strong_direction(&self.text_content());
    }
}

fn update_node_direction(node: &mut DocNode) {
    let direction = first_strong_direction(&node.text_content());
    if let Some(base) = node.element_mut() {
        base.direction = direction;
        for child in &mut base.children {
            update_node_direction(child);
        }
    }
}

/// Direction of the first strongly typed character in `text`.
pub fn first_strong_direction(text: &str) -> Option<Direction> {
    text.chars().find_map(|c| match bidi_class(c) {
        BidiClass::L => Some(Direction::Ltr),
        BidiClass::R | BidiClass::AL => Some(Direction::Rtl),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{CardNode, ImageNode, LinkNode, ParagraphNode, TextNode};
    use serde_json::json;

    fn sample() -> Document {
        let mut doc = Document::default();
        doc.push(ParagraphNode::new(vec![
            TextNode::new("Hello ").into(),
            LinkNode::new("/post", vec![TextNode::new("link").into()]).into(),
        ]));
        doc.push(ImageNode::new("/content/images/a.png"));
        doc
    }

    #[test]
    fn test_round_trip() {
        let registry = NodeRegistry::with_defaults();
        let doc = sample();
        let json = doc.to_json();
        assert_eq!(json["root"]["type"], "root");
        assert_eq!(json["root"]["children"][1]["type"], "image");

        let restored = Document::from_json(&json, &registry).unwrap();
        assert_eq!(restored, doc);

        let text = doc.to_json_string().unwrap();
        assert_eq!(Document::from_json_str(&text, &registry).unwrap(), doc);
    }

    #[test]
    fn test_root_errors() {
        let registry = NodeRegistry::with_defaults();
        assert!(Document::from_json(&json!({}), &registry).is_err());

        let err = Document::from_json(&json!({"root": {"type": "root", "version": 5}}), &registry).unwrap_err();
        assert!(matches!(err, ContentError::SchemaVersion { .. }));

        let err = Document::from_json(
            &json!({"root": {"children": [{"type": "widget"}], "type": "root"}}),
            &registry,
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::UnknownNodeType(_)));
    }

    #[test]
    fn test_directions() {
        assert_eq!(first_strong_direction("  123 abc"), Some(Direction::Ltr));
        assert_eq!(first_strong_direction("42 שלום"), Some(Direction::Rtl));
        assert_eq!(first_strong_direction("مرحبا"), Some(Direction::Rtl));
        assert_eq!(first_strong_direction("123 !"), None);

        let mut doc = sample();
        doc.update_directions();
        assert_eq!(doc.root.direction, Some(Direction::Ltr));
        let paragraph = doc.children()[0].as_paragraph().unwrap();
        assert_eq!(paragraph.base.direction, Some(Direction::Ltr));
        assert_eq!(doc.to_json()["root"]["children"][0]["direction"], "ltr");
        // Cards carry no direction
        assert!(doc.children()[1].as_image().unwrap().get_dataset().get("direction").is_none());
    }
}
