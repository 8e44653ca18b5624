//! Embed card: third-party embed markup (oEmbed html) or a link fallback.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dom::Dom;
use crate::options::RenderOptions;

use super::{CardWidth, append_caption, card_classes, create_with_attrs};

/// Embed card payload, fields in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedPayload {
    pub url: String,
    pub embed_type: String,
    /// Trusted embed markup from the oEmbed provider
    pub html: String,
    pub metadata: Map<String, Value>,
    /// Pre-sanitized HTML
    pub caption: String,
}

impl EmbedPayload {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// `metadata.title` when it is a non-empty string.
    pub fn metadata_title(&self) -> Option<&str> {
        self.metadata
            .get("title")
            .and_then(Value::as_str)
            .filter(|title| !title.is_empty())
    }
}

/// Render an embed card; `None` when `url` is empty.
pub fn render_embed<D: Dom>(
    payload: &EmbedPayload,
    dom: &mut D,
    _options: &RenderOptions,
) -> Option<D::Element> {
    if payload.url.is_empty() {
        tracing::trace!("embed card has no url, rendering nothing");
        return None;
    }

    let classes = card_classes("kg-card kg-embed-card", &payload.caption, CardWidth::Regular);
    let class = classes.value();
    let mut figure = create_with_attrs(dom, "figure", &[("class", class.as_str())]);

    if payload.html.is_empty() {
        let mut link = create_with_attrs(
            dom,
            "a",
            &[("class", "kg-embed-container"), ("href", payload.url.as_str())],
        );
        let label = payload.metadata_title().unwrap_or(&payload.url);
        dom.append_text(&mut link, label);
        dom.append_child(&mut figure, link);
    } else {
        dom.append_raw_html(&mut figure, &payload.html);
    }

    append_caption(dom, &mut figure, &payload.caption);

    Some(figure)
}
