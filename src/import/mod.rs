//! HTML → document import.
//!
//! Each call parses the input as the body of a fresh HTML document, builds
//! its own [`EditorContext`] (default node kinds plus caller extensions) and
//! walks the DOM through the registry's import rules. The walked nodes are
//! normalized while being inserted at the root, so the serialized document is
//! always a valid tree.
//!
//! # Examples
//!
//! ```
//! use kg_cards::import::{ImportOptions, html_to_document};
//!
//! let doc = html_to_document(r#"<p>Hello <a href="/post">link</a></p>"#, &ImportOptions::default()).unwrap();
//! let paragraph = &doc["root"]["children"][0];
//! assert_eq!(paragraph["type"], "paragraph");
//! assert_eq!(paragraph["children"][1]["url"], "/post");
//! ```

mod generate;
mod insert;
mod source;

pub use source::SourceElement;

use serde::Deserialize;

use crate::error::ContentResult;
use crate::nodes::{DocNode, Document, NodeKind, NodeRegistry, ParagraphNode, SerializedDocument};
use crate::options::RenderOptions;
use crate::transform::{AbsoluteToRelative, Pipeline};

use self::generate::DomWalker;
use self::insert::normalize_root;
use self::source::parse_body;

// =============================================================================
// Options
// =============================================================================

/// Importer configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportOptions {
    /// Node kinds registered on top of the defaults
    #[serde(skip)]
    pub extensions: Vec<NodeKind>,
    /// When set, URLs under this site are stored root-relative
    pub site_url: Option<String>,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extension(mut self, kind: NodeKind) -> Self {
        self.extensions.push(kind);
        self
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = Some(site_url.into());
        self
    }

    fn site_url(&self) -> Option<&str> {
        self.site_url.as_deref().filter(|url| !url.is_empty())
    }
}

// =============================================================================
// EditorContext
// =============================================================================

/// Per-call editing state: a registry and the document being built.
///
/// The root starts out holding one placeholder paragraph so there is always
/// an insertion point; [`EditorContext::finish`] removes it.
#[derive(Debug)]
pub struct EditorContext {
    registry: NodeRegistry,
    document: Document,
    /// Root index of the next insertion
    cursor: usize,
}

impl EditorContext {
    pub fn new(extensions: &[NodeKind]) -> Self {
        let mut registry = NodeRegistry::with_defaults();
        for kind in extensions {
            registry.register(kind.clone());
        }
        Self {
            registry,
            document: Document::new(vec![ParagraphNode::default().into()]),
            cursor: 1,
        }
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Parse `html` and insert its content after everything inserted so far.
    pub fn insert_html(&mut self, html: &str) {
        let Some(parsed) = parse_body(html) else {
            tracing::debug!("parsed html has no body element");
            return;
        };
        let walked = DomWalker::new(&self.registry).walk(parsed.body());
        self.insert_nodes(walked);
    }

    /// Normalize `nodes` into root blocks and insert them at the cursor.
    pub fn insert_nodes(&mut self, nodes: Vec<DocNode>) {
        let blocks = normalize_root(nodes);
        let count = blocks.len();
        let at = self.cursor.min(self.document.children().len());
        self.document.children_mut().splice(at..at, blocks);
        self.cursor = at + count;
    }

    /// Drop the placeholder, compute directions and hand back the document.
    pub fn finish(mut self) -> Document {
        let children = self.document.children_mut();
        if children.first().is_some_and(|first| first.is_paragraph() && first.is_empty()) {
            children.remove(0);
        }
        self.document.update_directions();
        self.document
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Import `html` into a [`Document`].
pub fn html_to_doc(html: &str, options: &ImportOptions) -> ContentResult<Document> {
    let mut context = EditorContext::new(&options.extensions);
    context.insert_html(html);
    let doc = context.finish();

    let doc = match options.site_url() {
        Some(site_url) => Pipeline::new(doc)
            .pipe(AbsoluteToRelative::new(RenderOptions::new().with_site_url(site_url)))
            .into_inner(),
        None => doc,
    };
    tracing::debug!(
        input_len = html.len(),
        blocks = doc.children().len(),
        "imported html document"
    );
    Ok(doc)
}

/// Import `html` and serialize the resulting document state.
pub fn html_to_document(html: &str, options: &ImportOptions) -> ContentResult<SerializedDocument> {
    Ok(html_to_doc(html, options)?.to_json())
}

/// Import many HTML inputs, one editing context per input.
#[cfg(not(feature = "parallel"))]
pub fn html_to_documents<S>(inputs: &[S], options: &ImportOptions) -> Vec<ContentResult<SerializedDocument>>
where
    S: AsRef<str> + Sync,
{
    inputs
        .iter()
        .map(|html| html_to_document(html.as_ref(), options))
        .collect()
}

/// Import many HTML inputs in parallel, one editing context per input.
#[cfg(feature = "parallel")]
pub fn html_to_documents<S>(inputs: &[S], options: &ImportOptions) -> Vec<ContentResult<SerializedDocument>>
where
    S: AsRef<str> + Sync,
{
    use rayon::prelude::*;

    inputs
        .par_iter()
        .map(|html| html_to_document(html.as_ref(), options))
        .collect()
}
