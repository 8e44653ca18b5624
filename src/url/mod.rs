//! URL transform library.
//!
//! Every node type declares a [`UrlTransformMap`]: which payload fields hold
//! a bare URL, which hold an HTML fragment whose anchors must be rewritten,
//! and which hold arrays of nested records with their own map. The two entry
//! points, [`absolute_to_relative`] and [`relative_to_absolute`], walk a
//! payload through that map and return a new payload.
//!
//! # Example
//!
//! ```
//! use kg_cards::url::{UrlRule, relative_to_absolute};
//! use kg_cards::RenderOptions;
//! use serde_json::json;
//!
//! let map = &[("src", UrlRule::Url)];
//! let payload = json!({"src": "/content/images/a.png", "alt": "/keep"});
//! let options = RenderOptions::new().with_site_url("https://example.com/");
//!
//! let out = relative_to_absolute(payload.as_object().unwrap(), map, &options);
//! assert_eq!(out["src"], "https://example.com/content/images/a.png");
//! assert_eq!(out["alt"], "/keep");
//! ```

mod html;
mod rewrite;

pub use html::{anchor_hrefs, rewrite_html};
pub use rewrite::{UrlDirection, UrlRewriter, to_absolute_url, to_relative_url};

use serde_json::{Map, Value};

use crate::options::RenderOptions;

// =============================================================================
// Transform maps
// =============================================================================

/// How one payload field is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlRule {
    /// The field is a bare URL
    Url,
    /// The field is an HTML fragment; anchor hrefs are rewritten and
    /// fragment-only links are treated as self links
    Html,
    /// The field is an array of records, each rewritten with the nested map
    Each(UrlTransformMap),
}

/// Field name → rule, in declaration order.
pub type UrlTransformMap = &'static [(&'static str, UrlRule)];

/// Every field name in `map`, nested maps flattened as `field.nested`.
pub fn url_fields(map: UrlTransformMap) -> Vec<String> {
    let mut fields = Vec::new();
    for (name, rule) in map {
        match rule {
            UrlRule::Each(nested) => {
                fields.extend(url_fields(nested).into_iter().map(|field| format!("{name}.{field}")));
            }
            _ => fields.push((*name).to_owned()),
        }
    }
    fields
}

// =============================================================================
// Payload transforms
// =============================================================================

/// Rewrite every declared URL of `payload` from absolute to root-relative.
pub fn absolute_to_relative(
    payload: &Map<String, Value>,
    map: UrlTransformMap,
    options: &RenderOptions,
) -> Map<String, Value> {
    let rewriter = UrlRewriter::new(options.site_url(), UrlDirection::ToRelative)
        .with_item_url(options.item_url());
    transform_payload(payload, map, &rewriter)
}

/// Rewrite every declared root-relative URL of `payload` to absolute.
pub fn relative_to_absolute(
    payload: &Map<String, Value>,
    map: UrlTransformMap,
    options: &RenderOptions,
) -> Map<String, Value> {
    let rewriter = UrlRewriter::new(options.site_url(), UrlDirection::ToAbsolute)
        .with_item_url(options.item_url());
    transform_payload(payload, map, &rewriter)
}

/// Apply `map` to a copy of `payload`. Undeclared fields and values of an
/// unexpected JSON type are copied through untouched.
pub fn transform_payload(
    payload: &Map<String, Value>,
    map: UrlTransformMap,
    rewriter: &UrlRewriter<'_>,
) -> Map<String, Value> {
    let mut out = payload.clone();
    if rewriter.is_noop() {
        return out;
    }

    for (field, rule) in map {
        let Some(value) = out.get_mut(*field) else {
            continue;
        };
        match (rule, value) {
            (UrlRule::Url, Value::String(url)) => *url = rewriter.rewrite(url),
            (UrlRule::Html, Value::String(html)) => *html = rewrite_html(html, rewriter),
            (UrlRule::Each(nested), Value::Array(items)) => {
                for item in items.iter_mut() {
                    if let Value::Object(record) = item {
                        *record = transform_payload(record, nested, rewriter);
                    }
                }
            }
            _ => {}
        }
    }
    out
}
