//! Document processing pipeline.

use crate::nodes::Document;

use super::Transform;

// =============================================================================
// Pipeline
// =============================================================================

/// Synchronous pipeline for document processing.
///
/// Wraps a `Document` and provides fluent API for transformations.
///
/// # Example
///
/// ```
/// use kg_cards::RenderOptions;
/// use kg_cards::nodes::{Document, ImageNode};
/// use kg_cards::transform::{AbsoluteToRelative, Pipeline};
///
/// let mut doc = Document::default();
/// doc.push(ImageNode::new("https://example.com/content/images/a.png"));
///
/// let options = RenderOptions::new().with_site_url("https://example.com");
/// let doc = Pipeline::new(doc)
///     .pipe(AbsoluteToRelative::new(options))
///     .into_inner();
///
/// assert_eq!(doc.children()[0].as_image().unwrap().src(), "/content/images/a.png");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    doc: Document,
}

impl Pipeline {
    /// Create a new pipeline from a document.
    #[inline]
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    /// Apply a transform to the document.
    #[inline]
    pub fn pipe<T: Transform>(self, transform: T) -> Self {
        Self {
            doc: transform.transform(self.doc),
        }
    }

    /// Conditionally apply a transform.
    #[inline]
    pub fn pipe_if<T: Transform>(self, condition: bool, transform: T) -> Self {
        if condition {
            self.pipe(transform)
        } else {
            self.pipe(super::IdentityTransform)
        }
    }

    /// Inspect the document without consuming the pipeline.
    ///
    /// Useful for logging or debugging intermediate state.
    #[inline]
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnOnce(&Document),
    {
        f(&self.doc);
        self
    }

    #[inline]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Consume the pipeline and return the document.
    #[inline]
    pub fn into_inner(self) -> Document {
        self.doc
    }
}

impl From<Document> for Pipeline {
    #[inline]
    fn from(doc: Document) -> Self {
        Self::new(doc)
    }
}

impl From<Pipeline> for Document {
    #[inline]
    fn from(pipeline: Pipeline) -> Self {
        pipeline.into_inner()
    }
}
