//! Error types for kg-cards.
//!
//! Renderers and URL transforms never fail; errors only come out of JSON
//! import and programmer mistakes such as an unregistered node type.

use thiserror::Error;

/// Errors that can occur while importing or exporting documents.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Serialized node was written by a newer schema than this build supports
    #[error("unsupported {node_type} node version: found v{found}, supports up to v{supported}")]
    SchemaVersion {
        node_type: String,
        found: u32,
        supported: u32,
    },

    /// No node kind is registered for this type tag
    #[error("unknown node type: {0:?}")]
    UnknownNodeType(String),

    /// Serialized node has the right type tag but the wrong shape
    #[error("invalid {node_type} node: {message}")]
    InvalidNode { node_type: String, message: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

impl ContentError {
    pub fn invalid(node_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidNode {
            node_type: node_type.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ContentError::SchemaVersion {
            node_type: "image".to_string(),
            found: 3,
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "unsupported image node version: found v3, supports up to v1"
        );

        let err = ContentError::UnknownNodeType("widget".to_string());
        assert_eq!(err.to_string(), "unknown node type: \"widget\"");
    }

    #[test]
    fn test_error_is_send_sync() {
        static_assertions::assert_impl_all!(ContentError: Send, Sync);
    }
}
