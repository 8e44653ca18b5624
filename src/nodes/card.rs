//! Card node capability set.
//!
//! A card node wraps exactly one payload record. The trait supplies JSON
//! import/export, DOM export through the card renderer and URL rewriting
//! through the type's transform map; implementors only declare the type tag,
//! the payload and the renderer.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::dom::{Dom, Exported};
use crate::error::{ContentError, ContentResult};
use crate::options::RenderOptions;
use crate::url::{self, UrlTransformMap};

use super::element::PayloadRewrite;
use super::text::check_version;

pub trait CardNode: Clone + Default + PartialEq + fmt::Debug {
    /// Type tag written to `type`
    const TYPE: &'static str;

    /// Highest schema version this build reads and the one it writes
    const VERSION: u32 = 1;

    /// Every payload field that can legally contain a URL
    const URL_TRANSFORM_MAP: UrlTransformMap;

    type Payload: Serialize + DeserializeOwned + Clone + Default;

    fn from_payload(payload: Self::Payload) -> Self;

    fn payload(&self) -> &Self::Payload;

    fn payload_mut(&mut self) -> &mut Self::Payload;

    fn is_empty(&self) -> bool;

    /// Render through the card renderer; `None` means nothing to render.
    fn render<D: Dom>(&self, dom: &mut D, options: &RenderOptions) -> Option<D::Element>;

    /// Upgrade a dataset written by `from_version` to [`Self::VERSION`].
    fn migrate(dataset: Map<String, Value>, from_version: u32) -> ContentResult<Map<String, Value>> {
        let _ = from_version;
        Ok(dataset)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Provided
    // ─────────────────────────────────────────────────────────────────────────

    /// Build from a partial dataset. Missing and `null` fields take their
    /// defaults; unrecognized fields are ignored.
    fn from_dataset(dataset: &Map<String, Value>) -> ContentResult<Self> {
        let fields: Map<String, Value> = dataset
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let payload = serde_json::from_value(Value::Object(fields))
            .map_err(|err| ContentError::invalid(Self::TYPE, err.to_string()))?;
        Ok(Self::from_payload(payload))
    }

    /// Full field set in canonical order.
    fn get_dataset(&self) -> Map<String, Value> {
        match serde_json::to_value(self.payload()) {
            Ok(Value::Object(dataset)) => dataset,
            _ => Map::new(),
        }
    }

    /// `{type, version, ...dataset}`
    fn export_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), Value::String(Self::TYPE.into()));
        out.insert("version".into(), Value::from(Self::VERSION));
        out.extend(self.get_dataset());
        Value::Object(out)
    }

    fn import_json(serialized: &Value) -> ContentResult<Self> {
        let Value::Object(serialized) = serialized else {
            return Err(ContentError::invalid(Self::TYPE, "expected a JSON object"));
        };
        Self::import_json_map(serialized)
    }

    /// Inverse of [`export_json`](Self::export_json). A missing `version`
    /// means the current one; older versions go through [`migrate`](Self::migrate).
    fn import_json_map(serialized: &Map<String, Value>) -> ContentResult<Self> {
        if let Some(found) = serialized.get("type").and_then(Value::as_str) {
            if found != Self::TYPE {
                return Err(ContentError::invalid(
                    Self::TYPE,
                    format!("type tag {found:?} does not match"),
                ));
            }
        }
        let version = check_version(serialized, Self::TYPE, Self::VERSION)?;

        let mut dataset = serialized.clone();
        dataset.remove("type");
        dataset.remove("version");
        if version < Self::VERSION {
            tracing::debug!(node_type = Self::TYPE, from = version, to = Self::VERSION, "migrating node");
            dataset = Self::migrate(dataset, version)?;
        }
        Self::from_dataset(&dataset)
    }

    /// Renderer output, or [`Exported::Empty`] when there is nothing to render.
    fn export_dom<D: Dom>(&self, dom: &mut D, options: &RenderOptions) -> Exported<D::Element> {
        self.render(dom, options).into()
    }

    /// Copy with every mapped URL made root-relative.
    fn absolute_to_relative(&self, options: &RenderOptions) -> Self {
        rewrite_card(self, url::absolute_to_relative, options)
    }

    /// Copy with every mapped root-relative URL made absolute.
    fn relative_to_absolute(&self, options: &RenderOptions) -> Self {
        rewrite_card(self, url::relative_to_absolute, options)
    }
}

fn rewrite_card<N: CardNode>(node: &N, rewrite: PayloadRewrite, options: &RenderOptions) -> N {
    let dataset = rewrite(&node.get_dataset(), N::URL_TRANSFORM_MAP, options);
    match N::from_dataset(&dataset) {
        Ok(rewritten) => rewritten,
        Err(err) => {
            tracing::debug!(node_type = N::TYPE, %err, "url rewrite produced an invalid dataset");
            node.clone()
        }
    }
}
