//! Caller-defined decorator nodes.
//!
//! An extension node carries an opaque field set under a type tag that the
//! caller registered with [`NodeKind::extension`](super::NodeKind::extension).
//! Fields round-trip verbatim; the crate never interprets them.

use compact_str::CompactString;
use serde_json::{Map, Value};

use crate::error::{ContentError, ContentResult};

use super::registry::NodeRegistry;
use super::text::check_version;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionNode {
    pub node_type: CompactString,
    pub version: u32,
    pub fields: Map<String, Value>,
}

impl ExtensionNode {
    pub fn new(node_type: impl Into<CompactString>) -> Self {
        Self {
            node_type: node_type.into(),
            version: 1,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), Value::String(self.node_type.to_string()));
        out.insert("version".into(), Value::from(self.version));
        out.extend(self.fields.clone());
        Value::Object(out)
    }

    /// Import against the registered kind's version.
    pub fn from_json(serialized: &Map<String, Value>, registry: &NodeRegistry) -> ContentResult<Self> {
        let node_type = serialized
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ContentError::invalid("extension", "missing `type` tag"))?;
        let kind = registry
            .get(node_type)
            .ok_or_else(|| ContentError::UnknownNodeType(node_type.to_owned()))?;
        let version = check_version(serialized, node_type, kind.version)?;

        let mut fields = serialized.clone();
        fields.remove("type");
        fields.remove("version");
        Ok(Self {
            node_type: node_type.into(),
            version,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::NodeKind;
    use serde_json::json;

    fn registry() -> NodeRegistry {
        let mut registry = NodeRegistry::with_defaults();
        registry.register(NodeKind::extension("callout", 2));
        registry
    }

    #[test]
    fn test_round_trip() {
        let node = ExtensionNode::new("callout")
            .with_field("calloutText", "Hello")
            .with_field("backgroundColor", "grey");
        let json = node.to_json();
        assert_eq!(
            json,
            json!({"type": "callout", "version": 1, "calloutText": "Hello", "backgroundColor": "grey"})
        );
        let restored = ExtensionNode::from_json(json.as_object().unwrap(), &registry()).unwrap();
        assert_eq!(restored, node);
    }

    #[test]
    fn test_version_checked_against_registration() {
        let serialized = json!({"type": "callout", "version": 3});
        let err = ExtensionNode::from_json(serialized.as_object().unwrap(), &registry()).unwrap_err();
        assert!(matches!(err, ContentError::SchemaVersion { found: 3, supported: 2, .. }));

        let serialized = json!({"type": "callout"});
        let node = ExtensionNode::from_json(serialized.as_object().unwrap(), &registry()).unwrap();
        assert_eq!(node.version, 2);
    }
}
