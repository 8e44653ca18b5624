//! kg-cards - Card renderers, document nodes and URL transforms for a
//! rich-text publishing editor
//!
//! ## Core Concepts
//!
//! **Cards**: rich content blocks (image, gallery, embed) stored as flat
//! payload records and rendered to a fixed HTML contract through an injected
//! [`Dom`] capability.
//!
//! **Documents**: a tree of [`DocNode`](nodes::DocNode)s with a stable JSON
//! schema. Node types are looked up in a [`NodeRegistry`](nodes::NodeRegistry)
//! built once per document call.
//!
//! ## Modules
//! - `cards`: Card renderers and payload records
//! - `url`: Site URL rewriting for payloads and HTML fragments
//! - `nodes`: Document node model, JSON import/export and DOM import rules
//! - `import`: HTML → document importer
//! - `transform`: Whole-document transforms and pipelines
//! - `export`: Document → HTML export
//! - `dom` / `render`: Render tree and its HTML serialization
//!
//! ## Usage
//!
//! ```
//! use kg_cards::RenderOptions;
//! use kg_cards::export::document_to_html;
//! use kg_cards::import::{ImportOptions, html_to_doc};
//!
//! let doc = html_to_doc(
//!     r#"<p>Hello <a href="/post">link</a></p><img src="/content/images/a.png" alt="A">"#,
//!     &ImportOptions::default(),
//! )
//! .unwrap();
//!
//! let html = document_to_html(&doc, &RenderOptions::default());
//! assert_eq!(
//!     html,
//!     r#"<p>Hello <a href="/post">link</a></p><figure class="kg-card kg-image-card"><img src="/content/images/a.png" class="kg-image" alt="A"></figure>"#
//! );
//! ```

// =============================================================================
// Core modules
// =============================================================================

/// Accessor generation macros
#[macro_use]
pub mod macros;

/// Attribute and class list helpers
pub mod attr;

/// Render tree and the `Dom` capability
pub mod dom;

/// HTML serialization of the render tree
pub mod render;

/// Render options
pub mod options;

/// Error types
pub mod error;

/// Card renderers
pub mod cards;

/// URL transforms
pub mod url;

/// Document node model
pub mod nodes;

/// HTML → document import
pub mod import;

/// Document transforms and pipelines
pub mod transform;

/// Document → HTML export
pub mod export;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Render tree
pub use dom::{Dom, Element, Exported, Node, Text, TextKind, VDom};

// Options
pub use options::{ContentImageSizes, ImageSize, RenderOptions};

// Error types
pub use error::{ContentError, ContentResult};

// Documents
pub use nodes::{Document, SerializedDocument};

// Entry points
pub use export::{document_to_html, export_document_html};
pub use import::{ImportOptions, html_to_doc, html_to_document, html_to_documents};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{EmbedPayload, GalleryPayload, ImagePayload};
    use crate::nodes::{DocNode, NodeKind, NodeRegistry};
    use crate::transform::{AbsoluteToRelative, Pipeline, RelativeToAbsolute};
    use static_assertions::assert_impl_all;

    assert_impl_all!(Document: Send, Sync, Clone);
    assert_impl_all!(DocNode: Send, Sync, Clone);
    assert_impl_all!(NodeRegistry: Send, Sync);
    assert_impl_all!(NodeKind: Send, Sync);
    assert_impl_all!(ImportOptions: Send, Sync);
    assert_impl_all!(RenderOptions: Send, Sync);
    assert_impl_all!(ImagePayload: Send, Sync);
    assert_impl_all!(GalleryPayload: Send, Sync);
    assert_impl_all!(EmbedPayload: Send, Sync);
    assert_impl_all!(Element: Send, Sync);
    assert_impl_all!(ContentError: Send, Sync, std::error::Error);
    assert_impl_all!(Pipeline: Send, Sync);

    #[test]
    fn test_import_json_export_html() {
        let imported = html_to_document(
            r#"<h1>Title</h1><p>Body <em>text</em></p><figure class="kg-card kg-embed-card"><a class="kg-embed-container" href="https://example.com/">Example</a></figure>"#,
            &ImportOptions::default(),
        )
        .unwrap();

        let registry = NodeRegistry::with_defaults();
        let doc = Document::from_json(&imported, &registry).unwrap();
        assert_eq!(doc.to_json(), imported);
        assert_eq!(
            document_to_html(&doc, &RenderOptions::default()),
            concat!(
                "<h1>Title</h1><p>Body <em>text</em></p>",
                r#"<figure class="kg-card kg-embed-card"><a class="kg-embed-container" href="https://example.com/">Example</a></figure>"#,
            )
        );
    }

    #[test]
    fn test_site_round_trip() {
        let options = RenderOptions::new().with_site_url("https://example.com/");
        let doc = html_to_doc(
            r#"<p><a href="https://example.com/a/">a</a></p><img src="https://example.com/content/images/x.png">"#,
            &ImportOptions::default(),
        )
        .unwrap();

        let relative = Pipeline::new(doc.clone())
            .pipe(AbsoluteToRelative::new(options.clone()))
            .into_inner();
        assert_ne!(relative, doc);
        let absolute = Pipeline::new(relative)
            .pipe(RelativeToAbsolute::new(options))
            .into_inner();
        assert_eq!(absolute, doc);
    }
}
