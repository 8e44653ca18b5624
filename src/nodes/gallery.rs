//! Gallery card node.

use crate::cards::{GalleryImage, GalleryPayload, render_gallery};
use crate::dom::Dom;
use crate::import::SourceElement;
use crate::options::RenderOptions;
use crate::url::{UrlRule, UrlTransformMap};

use super::card::CardNode;
use super::registry::DomConversion;
use super::DocNode;

/// Images per row when imported markup carries no row containers.
const IMAGES_PER_ROW: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryNode {
    payload: GalleryPayload,
}

crate::impl_payload_accessors!(GalleryNode, payload;
    str { caption },
    ref { images: Vec<GalleryImage> },
);

impl GalleryNode {
    pub fn new(images: Vec<GalleryImage>) -> Self {
        Self {
            payload: GalleryPayload {
                images,
                caption: String::new(),
            },
        }
    }
}

impl CardNode for GalleryNode {
    const TYPE: &'static str = "gallery";
    const URL_TRANSFORM_MAP: UrlTransformMap = &[
        ("caption", UrlRule::Html),
        (
            "images",
            UrlRule::Each(&[
                ("src", UrlRule::Url),
                ("caption", UrlRule::Html),
                ("href", UrlRule::Url),
            ]),
        ),
    ];

    type Payload = GalleryPayload;

    fn from_payload(payload: GalleryPayload) -> Self {
        Self { payload }
    }

    fn payload(&self) -> &GalleryPayload {
        &self.payload
    }

    fn payload_mut(&mut self) -> &mut GalleryPayload {
        &mut self.payload
    }

    fn is_empty(&self) -> bool {
        self.payload.images.is_empty()
    }

    fn render<D: Dom>(&self, dom: &mut D, options: &RenderOptions) -> Option<D::Element> {
        render_gallery(&self.payload, dom, options)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DOM import
// ─────────────────────────────────────────────────────────────────────────────

/// `<figure class="kg-gallery-card">`; rows come from `.kg-gallery-row`
/// containers, or groups of three when there are none.
pub(crate) fn import_gallery_figure(figure: &SourceElement) -> Option<DomConversion> {
    if !figure.has_class("kg-gallery-card") {
        return None;
    }

    let rows = figure.find_all(|el| el.has_class("kg-gallery-row"));
    let mut images = Vec::new();
    if rows.is_empty() {
        for (index, img) in figure.find_all(|el| el.tag() == "img").iter().enumerate() {
            images.push(gallery_image(figure, img, index / IMAGES_PER_ROW));
        }
    } else {
        for (row, row_elem) in rows.iter().enumerate() {
            for img in row_elem.find_all(|el| el.tag() == "img") {
                images.push(gallery_image(row_elem, &img, row));
            }
        }
    }

    let mut payload = GalleryPayload {
        images,
        caption: String::new(),
    };
    payload.caption = figure
        .child_elements()
        .into_iter()
        .find(|el| el.tag() == "figcaption")
        .map(|caption| caption.inner_html().trim().to_owned())
        .unwrap_or_default();

    Some(DomConversion::Leaf(DocNode::Gallery(GalleryNode::from_payload(payload))))
}

fn gallery_image(container: &SourceElement, img: &SourceElement, row: usize) -> GalleryImage {
    let src = img.attr("src").unwrap_or_default();
    let href = container
        .find_all(|el| el.tag() == "a")
        .into_iter()
        .find(|link| link.find(|inner| inner.same_node(img)).is_some())
        .and_then(|link| link.attr("href"))
        .unwrap_or_default();

    GalleryImage {
        row: u32::try_from(row).unwrap_or(u32::MAX),
        file_name: file_name(&src),
        width: img.attr_u32("width").unwrap_or_default(),
        height: img.attr_u32("height").unwrap_or_default(),
        alt: img.attr("alt").unwrap_or_default(),
        title: img.attr("title").unwrap_or_default(),
        caption: String::new(),
        href,
        src,
    }
}

/// Last path segment of a URL, without query or fragment.
fn file_name(src: &str) -> String {
    let path = src.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/').next().unwrap_or_default().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::VDom;
    use serde_json::json;

    fn images() -> Vec<GalleryImage> {
        vec![
            GalleryImage::new("/content/images/a.png", "a.png", 300, 200),
            GalleryImage::new("/content/images/b.png", "b.png", 300, 200).in_row(1),
        ]
    }

    #[test]
    fn test_is_empty() {
        assert!(GalleryNode::default().is_empty());
        assert!(!GalleryNode::new(images()).is_empty());
    }

    #[test]
    fn test_dataset_and_json_round_trip() {
        let node = GalleryNode::new(images()).with_caption("My <i>gallery</i>");
        let dataset = node.get_dataset();
        let keys: Vec<_> = dataset.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["images", "caption"]);

        let image_keys: Vec<_> = dataset["images"][0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            image_keys,
            vec!["row", "fileName", "src", "width", "height", "alt", "title", "caption", "href"]
        );

        let restored = GalleryNode::import_json(&node.export_json()).unwrap();
        assert_eq!(restored, node);
    }

    #[test]
    fn test_import_json_partial_images() {
        let node = GalleryNode::import_json(&json!({
            "type": "gallery",
            "version": 1,
            "images": [{"src": "/a.png", "fileName": "a.png", "width": 10, "height": 10}]
        }))
        .unwrap();
        assert_eq!(node.images().len(), 1);
        assert_eq!(node.images()[0].row, 0);
        assert_eq!(node.caption(), "");
    }

    #[test]
    fn test_import_json_nested_nulls() {
        let node = GalleryNode::import_json(&json!({
            "type": "gallery",
            "images": [{"src": "/a.png", "fileName": "a.png", "width": 600, "height": null, "caption": null}],
            "caption": null
        }))
        .unwrap();
        assert_eq!(node.images()[0].width, 600);
        assert_eq!(node.images()[0].height, 0);
        assert_eq!(node.images()[0].caption, "");
    }

    #[test]
    fn test_nested_url_transforms() {
        let options = RenderOptions::new()
            .with_site_url("https://example.com")
            .with_item_url("https://example.com/post/");
        let mut node = GalleryNode::new(images());
        node.images_mut()[0].caption = r##"<a href="#top">top</a>"##.into();

        let absolute = node.relative_to_absolute(&options);
        assert_eq!(absolute.images()[0].src, "https://example.com/content/images/a.png");
        assert_eq!(absolute.images()[0].caption, r#"<a href="https://example.com/post/#top">top</a>"#);
        assert_eq!(absolute.absolute_to_relative(&options), node);
    }

    #[test]
    fn test_export_dom_empty() {
        let exported = GalleryNode::default().export_dom(&mut VDom, &RenderOptions::default());
        assert!(exported.is_empty());
        assert!(exported.outer_html().is_none());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("/content/images/2020/a.png?v=1"), "a.png");
        assert_eq!(file_name("https://cdn.example.com/b.jpg#x"), "b.jpg");
        assert_eq!(file_name(""), "");
    }
}
