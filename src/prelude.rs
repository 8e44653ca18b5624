//! Prelude module for common imports.
//!
//! ```
//! use kg_cards::prelude::*;
//!
//! let doc = html_to_doc("<p>Hi</p>", &ImportOptions::default()).unwrap();
//! assert_eq!(doc.text_content(), "Hi");
//! ```

// Render tree
pub use crate::dom::{Dom, Element, Exported, Node, Text, TextKind, VDom};
pub use crate::render::{element_to_html, fragment_to_html};

// Options
pub use crate::options::{ContentImageSizes, RenderOptions};

// Cards
pub use crate::cards::{
    CardWidth, EmbedPayload, GalleryImage, GalleryPayload, ImagePayload, render_embed,
    render_gallery, render_image,
};

// URL transforms
pub use crate::url::{UrlRule, UrlTransformMap, absolute_to_relative, relative_to_absolute};

// Nodes
pub use crate::nodes::{
    CardNode, DocNode, Document, EmbedNode, ExtensionNode, GalleryNode, ImageNode, LinkNode,
    NodeKind, NodeRegistry, ParagraphNode, SerializedDocument, TextFormat, TextNode,
};

// Import / export
pub use crate::export::{document_to_html, export_document_html};
pub use crate::import::{EditorContext, ImportOptions, html_to_doc, html_to_document};

// Transform
pub use crate::transform::{
    AbsoluteToRelative, IdentityTransform, Pipeline, RelativeToAbsolute, Transform,
};

// Error
pub use crate::error::{ContentError, ContentResult};
