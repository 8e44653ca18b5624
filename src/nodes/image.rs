//! Image card node.

use crate::cards::{CardWidth, ImagePayload, render_image};
use crate::dom::Dom;
use crate::import::SourceElement;
use crate::options::RenderOptions;
use crate::url::{UrlRule, UrlTransformMap};

use super::card::CardNode;
use super::registry::DomConversion;
use super::DocNode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageNode {
    payload: ImagePayload,
}

crate::impl_payload_accessors!(ImageNode, payload;
    str { src, caption, alt, title, card_width, href },
    copy { width: Option<u32>, height: Option<u32> },
);

impl ImageNode {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            payload: ImagePayload::new(src),
        }
    }
}

impl CardNode for ImageNode {
    const TYPE: &'static str = "image";
    const URL_TRANSFORM_MAP: UrlTransformMap = &[
        ("src", UrlRule::Url),
        ("caption", UrlRule::Html),
        ("href", UrlRule::Url),
    ];

    type Payload = ImagePayload;

    fn from_payload(payload: ImagePayload) -> Self {
        Self { payload }
    }

    fn payload(&self) -> &ImagePayload {
        &self.payload
    }

    fn payload_mut(&mut self) -> &mut ImagePayload {
        &mut self.payload
    }

    fn is_empty(&self) -> bool {
        self.payload.src.is_empty()
    }

    fn render<D: Dom>(&self, dom: &mut D, options: &RenderOptions) -> Option<D::Element> {
        render_image(&self.payload, dom, options)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DOM import
// ─────────────────────────────────────────────────────────────────────────────

/// `<figure class="kg-image-card">` as produced by the renderer.
pub(crate) fn import_image_figure(figure: &SourceElement) -> Option<DomConversion> {
    if !figure.has_class("kg-image-card") {
        return None;
    }
    let img = figure.find(|el| el.tag() == "img")?;
    let mut payload = payload_from_img(&img);

    payload.caption = figure
        .find(|el| el.tag() == "figcaption")
        .map(|caption| caption.inner_html().trim().to_owned())
        .unwrap_or_default();
    payload.card_width = if figure.has_class("kg-width-full") {
        CardWidth::Full.as_str().to_owned()
    } else if figure.has_class("kg-width-wide") {
        CardWidth::Wide.as_str().to_owned()
    } else {
        String::new()
    };
    payload.href = figure
        .find(|el| el.tag() == "a" && el.find(|inner| inner.tag() == "img").is_some())
        .and_then(|link| link.attr("href"))
        .unwrap_or_default();

    Some(DomConversion::Leaf(DocNode::Image(ImageNode::from_payload(payload))))
}

/// A bare `<img>` outside a card figure.
pub(crate) fn import_img(img: &SourceElement) -> Option<DomConversion> {
    let payload = payload_from_img(img);
    if payload.src.is_empty() {
        return Some(DomConversion::Skip);
    }
    Some(DomConversion::Leaf(DocNode::Image(ImageNode::from_payload(payload))))
}

fn payload_from_img(img: &SourceElement) -> ImagePayload {
    ImagePayload {
        src: img.attr("src").unwrap_or_default(),
        alt: img.attr("alt").unwrap_or_default(),
        title: img.attr("title").unwrap_or_default(),
        width: img.attr_u32("width"),
        height: img.attr_u32("height"),
        ..Default::default()
    }
}
