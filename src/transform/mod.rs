//! Document transforms.
//!
//! # Module Structure
//!
//! - `Transform` - Core trait: consume a document, produce a document
//! - `IdentityTransform` - No-op, for conditional branches
//! - `AbsoluteToRelative` / `RelativeToAbsolute` - Site URL rewriting over
//!   every card and link
//! - `Pipeline` - Fluent chaining of transforms
//!
//! # Example
//!
//! ```
//! use kg_cards::RenderOptions;
//! use kg_cards::nodes::Document;
//! use kg_cards::transform::{Pipeline, RelativeToAbsolute};
//!
//! let options = RenderOptions::new().with_site_url("https://example.com");
//! let doc = Pipeline::new(Document::default())
//!     .pipe_if(true, RelativeToAbsolute::new(options))
//!     .inspect(|doc| assert!(doc.is_empty()))
//!     .into_inner();
//! # let _ = doc;
//! ```

mod core;
mod pipeline;
mod urls;

pub use core::{IdentityTransform, Transform};
pub use pipeline::Pipeline;
pub use urls::{AbsoluteToRelative, RelativeToAbsolute};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::GalleryImage;
    use crate::nodes::{CardNode, DocNode, Document, GalleryNode, ImageNode, LinkNode, ParagraphNode, TextNode};
    use crate::options::RenderOptions;

    const SITE: &str = "https://example.com";

    fn options() -> RenderOptions {
        RenderOptions::new().with_site_url(SITE)
    }

    fn absolute_doc() -> Document {
        let mut doc = Document::default();
        doc.push(ParagraphNode::new(vec![
            TextNode::new("see ").into(),
            LinkNode::new(
                "https://example.com/post/",
                vec![TextNode::new("post").into()],
            )
            .into(),
        ]));
        doc.push(
            ImageNode::new("https://example.com/content/images/a.png")
                .with_caption(r#"<a href="https://example.com/about/">About</a>"#),
        );
        doc.push(GalleryNode::new(vec![GalleryImage {
            src: "https://example.com/content/images/b.png".into(),
            ..Default::default()
        }]));
        doc
    }

    fn link_url(doc: &Document) -> &str {
        doc.children()[0].children()[1].as_link().unwrap().url()
    }

    #[test]
    fn test_absolute_to_relative() {
        let doc = Pipeline::new(absolute_doc())
            .pipe(AbsoluteToRelative::new(options()))
            .into_inner();

        assert_eq!(link_url(&doc), "/post/");
        // Link children survive the rewrite
        assert_eq!(doc.children()[0].text_content(), "see post");

        let image = doc.children()[1].as_image().unwrap();
        assert_eq!(image.src(), "/content/images/a.png");
        assert_eq!(image.caption(), r#"<a href="/about/">About</a>"#);

        let gallery = doc.children()[2].as_gallery().unwrap();
        assert_eq!(gallery.images()[0].src, "/content/images/b.png");
    }

    #[test]
    fn test_round_trip() {
        let original = absolute_doc();
        let doc = Pipeline::new(original.clone())
            .pipe(AbsoluteToRelative::new(options()))
            .pipe(RelativeToAbsolute::new(options()))
            .into_inner();
        assert_eq!(doc, original);
    }

    #[test]
    fn test_empty_site_url_is_noop() {
        let original = absolute_doc();
        let doc = Pipeline::new(original.clone())
            .pipe(AbsoluteToRelative::new(RenderOptions::default()))
            .into_inner();
        assert_eq!(doc, original);
    }

    #[test]
    fn test_pipe_if_and_inspect() {
        let mut seen = 0;
        let doc = Pipeline::new(absolute_doc())
            .pipe_if(false, AbsoluteToRelative::new(options()))
            .inspect(|doc| seen = doc.children().len())
            .pipe(|mut doc: Document| {
                doc.children_mut().retain(DocNode::is_decorator);
                doc
            })
            .into_inner();

        assert_eq!(seen, 3);
        assert_eq!(doc.children().len(), 2);
        assert_eq!(
            doc.children()[0].as_image().map(|image| image.export_json()["src"].clone()),
            Some("https://example.com/content/images/a.png".into())
        );
    }
}
