//! Embed card node.

use serde_json::{Map, Value};

use crate::cards::{EmbedPayload, render_embed};
use crate::dom::Dom;
use crate::import::SourceElement;
use crate::options::RenderOptions;
use crate::url::{UrlRule, UrlTransformMap};

use super::card::CardNode;
use super::registry::DomConversion;
use super::DocNode;

/// Hosts whose bare iframes are imported as video embeds.
const VIDEO_HOSTS: &[&str] = &["youtube.com/", "youtube-nocookie.com/", "player.vimeo.com/"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedNode {
    payload: EmbedPayload,
}

crate::impl_payload_accessors!(EmbedNode, payload;
    str { url, embed_type, html, caption },
    ref { metadata: Map<String, Value> },
);

impl EmbedNode {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            payload: EmbedPayload::new(url),
        }
    }
}

impl CardNode for EmbedNode {
    const TYPE: &'static str = "embed";
    const URL_TRANSFORM_MAP: UrlTransformMap = &[("url", UrlRule::Url)];

    type Payload = EmbedPayload;

    fn from_payload(payload: EmbedPayload) -> Self {
        Self { payload }
    }

    fn payload(&self) -> &EmbedPayload {
        &self.payload
    }

    fn payload_mut(&mut self) -> &mut EmbedPayload {
        &mut self.payload
    }

    fn is_empty(&self) -> bool {
        self.payload.url.is_empty()
    }

    fn render<D: Dom>(&self, dom: &mut D, options: &RenderOptions) -> Option<D::Element> {
        render_embed(&self.payload, dom, options)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DOM import
// ─────────────────────────────────────────────────────────────────────────────

/// `<figure class="kg-embed-card">`: embed markup is everything except the caption.
pub(crate) fn import_embed_figure(figure: &SourceElement) -> Option<DomConversion> {
    if !figure.has_class("kg-embed-card") {
        return None;
    }

    let mut payload = EmbedPayload::default();
    payload.caption = figure
        .child_elements()
        .into_iter()
        .find(|el| el.tag() == "figcaption")
        .map(|caption| caption.inner_html().trim().to_owned())
        .unwrap_or_default();

    // Link fallback written by the renderer when there was no embed markup
    if let Some(link) = figure.find(|el| el.tag() == "a" && el.has_class("kg-embed-container")) {
        payload.url = link.attr("href").unwrap_or_default();
        let title = link.text_content();
        if !title.is_empty() && title != payload.url {
            payload.metadata.insert("title".into(), Value::String(title));
        }
    } else {
        payload.html = figure.inner_html_without(&["figcaption"]).trim().to_owned();
        payload.url = figure
            .attr("data-url")
            .or_else(|| figure.find(|el| matches!(el.tag(), "iframe" | "video")).and_then(|el| el.attr("src")))
            .or_else(|| figure.find(|el| el.tag() == "a").and_then(|el| el.attr("href")))
            .unwrap_or_default();
        if figure.find(|el| el.tag() == "iframe").is_some() && is_video_url(&payload.url) {
            payload.embed_type = "video".into();
        }
    }

    Some(DomConversion::Leaf(DocNode::Embed(EmbedNode::from_payload(payload))))
}

/// Bare `<iframe>` pointing at a known video host.
pub(crate) fn import_iframe(iframe: &SourceElement) -> Option<DomConversion> {
    let src = iframe.attr("src")?;
    if !is_video_url(&src) {
        return None;
    }
    let payload = EmbedPayload {
        url: src,
        embed_type: "video".into(),
        html: iframe.outer_html(),
        ..Default::default()
    };
    Some(DomConversion::Leaf(DocNode::Embed(EmbedNode::from_payload(payload))))
}

fn is_video_url(url: &str) -> bool {
    VIDEO_HOSTS.iter().any(|host| url.contains(host))
}
