//! Text node type
//!
//! Text content nodes in the render tree. Raw text carries pre-sanitized HTML
//! (captions, embed markup) and is serialized verbatim.

// =============================================================================
// TextKind
// =============================================================================

/// How text content is serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextKind {
    /// Escaped on output.
    #[default]
    Normal,
    /// Trusted HTML, written as-is.
    Raw,
}

// =============================================================================
// Text
// =============================================================================

/// Text content node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    /// Text content
    pub content: String,
    pub kind: TextKind,
}

impl Text {
    /// Create a new text node
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: TextKind::Normal,
        }
    }

    /// Create a raw HTML section
    pub fn raw(html: impl Into<String>) -> Self {
        Self {
            content: html.into(),
            kind: TextKind::Raw,
        }
    }

    pub fn is_raw(&self) -> bool {
        self.kind == TextKind::Raw
    }

    /// Check if text content is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Check if text is only whitespace
    pub fn is_whitespace(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_node() {
        let text = Text::new("  hello world  ");
        assert!(!text.is_empty());
        assert!(!text.is_whitespace());
        assert!(!text.is_raw());

        let raw = Text::raw("<b>caption</b>");
        assert!(raw.is_raw());
    }
}
