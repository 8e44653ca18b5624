//! Gallery card: images grouped into rows inside `div.kg-gallery-container`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dom::Dom;
use crate::options::RenderOptions;

use super::{
    CardWidth, append_caption, build_srcset, card_classes, create_with_attrs, null_as_default, wrap_in_link,
};

/// One image of a gallery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryImage {
    #[serde(deserialize_with = "null_as_default")]
    pub row: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub file_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub src: String,
    #[serde(deserialize_with = "null_as_default")]
    pub width: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub height: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub alt: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Pre-sanitized HTML
    #[serde(deserialize_with = "null_as_default")]
    pub caption: String,
    #[serde(deserialize_with = "null_as_default")]
    pub href: String,
}

impl GalleryImage {
    pub fn new(src: impl Into<String>, file_name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            src: src.into(),
            file_name: file_name.into(),
            width,
            height,
            ..Default::default()
        }
    }

    pub fn in_row(mut self, row: u32) -> Self {
        self.row = row;
        self
    }

    /// Images without a source, file name or dimensions are never rendered.
    pub fn is_valid(&self) -> bool {
        !self.src.is_empty() && !self.file_name.is_empty() && self.width > 0 && self.height > 0
    }
}

/// Gallery card payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryPayload {
    pub images: Vec<GalleryImage>,
    /// Pre-sanitized HTML
    pub caption: String,
}

impl GalleryPayload {
    /// Valid images grouped by row number, rows ascending, images in payload order.
    pub fn rows(&self) -> Vec<Vec<&GalleryImage>> {
        let mut rows: BTreeMap<u32, Vec<&GalleryImage>> = BTreeMap::new();
        for image in self.images.iter().filter(|image| image.is_valid()) {
            rows.entry(image.row).or_default().push(image);
        }
        rows.into_values().collect()
    }
}

/// Render a gallery card; `None` when there is no valid image.
pub fn render_gallery<D: Dom>(
    payload: &GalleryPayload,
    dom: &mut D,
    options: &RenderOptions,
) -> Option<D::Element> {
    let rows = payload.rows();
    if rows.is_empty() {
        tracing::trace!("gallery card has no valid images, rendering nothing");
        return None;
    }

    // Galleries are always wide; the width is part of the base class list
    let classes = card_classes("kg-card kg-gallery-card kg-width-wide", &payload.caption, CardWidth::Regular);
    let class = classes.value();
    let mut figure = create_with_attrs(dom, "figure", &[("class", class.as_str())]);
    let mut container = create_with_attrs(dom, "div", &[("class", "kg-gallery-container")]);

    for row in rows {
        let mut row_elem = create_with_attrs(dom, "div", &[("class", "kg-gallery-row")]);
        for image in row {
            let mut image_elem = create_with_attrs(dom, "div", &[("class", "kg-gallery-image")]);
            let img = render_gallery_img(image, dom, options);
            let img = wrap_in_link(dom, img, &image.href);
            dom.append_child(&mut image_elem, img);
            dom.append_child(&mut row_elem, image_elem);
        }
        dom.append_child(&mut container, row_elem);
    }

    dom.append_child(&mut figure, container);
    append_caption(dom, &mut figure, &payload.caption);

    Some(figure)
}

fn render_gallery_img<D: Dom>(image: &GalleryImage, dom: &mut D, options: &RenderOptions) -> D::Element {
    let width = image.width.to_string();
    let height = image.height.to_string();
    let mut img = create_with_attrs(
        dom,
        "img",
        &[
            ("src", image.src.as_str()),
            ("width", width.as_str()),
            ("height", height.as_str()),
            ("loading", "lazy"),
        ],
    );
    if !image.alt.is_empty() {
        dom.set_attribute(&mut img, "alt", &image.alt);
    }
    if !image.title.is_empty() {
        dom.set_attribute(&mut img, "title", &image.title);
    }
    if let Some(srcset) = build_srcset(&image.src, options.content_image_sizes.as_ref()) {
        dom.set_attribute(&mut img, "srcset", &srcset);
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::VDom;
    use crate::options::ContentImageSizes;
    use crate::render::fragment_to_html;

    fn render(payload: &GalleryPayload, options: &RenderOptions) -> String {
        fragment_to_html(render_gallery(payload, &mut VDom, options).as_ref())
    }

    #[test]
    fn test_renders_rows() {
        let payload = GalleryPayload {
            images: vec![
                GalleryImage::new("/content/images/a.png", "a.png", 300, 200),
                GalleryImage::new("/content/images/c.png", "c.png", 300, 200).in_row(1),
                GalleryImage::new("/content/images/b.png", "b.png", 300, 200),
            ],
            caption: String::new(),
        };

        assert_eq!(
            render(&payload, &RenderOptions::default()),
            concat!(
                r#"<figure class="kg-card kg-gallery-card kg-width-wide"><div class="kg-gallery-container">"#,
                r#"<div class="kg-gallery-row">"#,
                r#"<div class="kg-gallery-image"><img src="/content/images/a.png" width="300" height="200" loading="lazy"></div>"#,
                r#"<div class="kg-gallery-image"><img src="/content/images/b.png" width="300" height="200" loading="lazy"></div>"#,
                r#"</div><div class="kg-gallery-row">"#,
                r#"<div class="kg-gallery-image"><img src="/content/images/c.png" width="300" height="200" loading="lazy"></div>"#,
                r#"</div></div></figure>"#
            )
        );
    }

    #[test]
    fn test_caption_alt_and_srcset() {
        let mut image = GalleryImage::new("/content/images/a.png", "a.png", 300, 200);
        image.alt = "alt".into();
        image.href = "https://example.com".into();
        let payload = GalleryPayload {
            images: vec![image],
            caption: "<i>Gallery</i>".into(),
        };
        let options = RenderOptions::new()
            .with_content_image_sizes(ContentImageSizes::new().with("w600", 600));

        assert_eq!(
            render(&payload, &options),
            concat!(
                r#"<figure class="kg-card kg-gallery-card kg-width-wide kg-card-hascaption"><div class="kg-gallery-container">"#,
                r#"<div class="kg-gallery-row"><div class="kg-gallery-image"><a href="https://example.com">"#,
                r#"<img src="/content/images/a.png" width="300" height="200" loading="lazy" alt="alt" srcset="/content/images/size/w600/a.png 600w">"#,
                r#"</a></div></div></div><figcaption><i>Gallery</i></figcaption></figure>"#
            )
        );
    }

    #[test]
    fn test_image_record_nulls_take_defaults() {
        let image: GalleryImage = serde_json::from_value(serde_json::json!({
            "src": "/a.png",
            "fileName": "a.png",
            "width": 600,
            "height": null,
            "alt": null
        }))
        .unwrap();
        assert_eq!(image.height, 0);
        assert_eq!(image.alt, "");
        assert_eq!(image.row, 0);
        assert!(!image.is_valid());
    }

    #[test]
    fn test_renders_nothing_without_valid_images() {
        let payload = GalleryPayload {
            images: vec![GalleryImage::new("/content/images/a.png", "", 300, 200)],
            caption: "caption".into(),
        };
        assert!(render_gallery(&payload, &mut VDom, &RenderOptions::default()).is_none());
        assert_eq!(render(&GalleryPayload::default(), &RenderOptions::default()), "");
    }
}
