//! Core transform trait.

use crate::nodes::Document;

/// Transform a document into a new document.
pub trait Transform: Sized {
    /// Transform the document.
    fn transform(self, doc: Document) -> Document;
}

// =============================================================================
// IdentityTransform
// =============================================================================

/// Identity transform that returns the document unchanged.
///
/// Useful for conditional transforms where one branch doesn't need to modify
/// the document.
///
/// # Example
///
/// ```
/// use kg_cards::nodes::Document;
/// use kg_cards::transform::{IdentityTransform, Pipeline};
///
/// let doc = Pipeline::new(Document::default()).pipe(IdentityTransform).into_inner();
/// assert!(doc.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl Transform for IdentityTransform {
    #[inline]
    fn transform(self, doc: Document) -> Document {
        doc
    }
}

/// Closures over whole documents are transforms.
impl<F> Transform for F
where
    F: FnOnce(Document) -> Document,
{
    #[inline]
    fn transform(self, doc: Document) -> Document {
        self(doc)
    }
}
