//! Image card: `<figure class="kg-card kg-image-card"><img …><figcaption>…</figcaption></figure>`

use serde::{Deserialize, Serialize};

use crate::dom::Dom;
use crate::options::RenderOptions;

use super::{CardWidth, append_caption, build_srcset, card_classes, create_with_attrs, wrap_in_link};

/// Image card payload, fields in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagePayload {
    pub src: String,
    /// Pre-sanitized HTML
    pub caption: String,
    pub alt: String,
    pub title: String,
    pub card_width: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub href: String,
}

impl ImagePayload {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Default::default()
        }
    }

    pub fn card_width(&self) -> CardWidth {
        CardWidth::parse(&self.card_width)
    }
}

/// Render an image card; `None` when `src` is empty.
pub fn render_image<D: Dom>(
    payload: &ImagePayload,
    dom: &mut D,
    options: &RenderOptions,
) -> Option<D::Element> {
    if payload.src.is_empty() {
        tracing::trace!("image card has no src, rendering nothing");
        return None;
    }

    let classes = card_classes("kg-card kg-image-card", &payload.caption, payload.card_width());
    let class = classes.value();
    let mut figure = create_with_attrs(dom, "figure", &[("class", class.as_str())]);

    let mut img = create_with_attrs(dom, "img", &[("src", payload.src.as_str()), ("class", "kg-image")]);
    if let Some(width) = payload.width {
        dom.set_attribute(&mut img, "width", &width.to_string());
    }
    if let Some(height) = payload.height {
        dom.set_attribute(&mut img, "height", &height.to_string());
    }
    if !payload.alt.is_empty() {
        dom.set_attribute(&mut img, "alt", &payload.alt);
    }
    if !payload.title.is_empty() {
        dom.set_attribute(&mut img, "title", &payload.title);
    }
    if let Some(srcset) = build_srcset(&payload.src, options.content_image_sizes.as_ref()) {
        dom.set_attribute(&mut img, "srcset", &srcset);
    }

    let img = wrap_in_link(dom, img, &payload.href);
    dom.append_child(&mut figure, img);
    append_caption(dom, &mut figure, &payload.caption);

    Some(figure)
}
