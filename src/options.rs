//! Render and transform options.
//!
//! Hosts usually hand these over as a JSON option bag, so [`RenderOptions`]
//! deserializes from camelCase keys and ignores anything it does not know.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

// =============================================================================
// ContentImageSizes
// =============================================================================

/// One responsive image size: a size label and its target pixel width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSize {
    pub key: String,
    pub width: u32,
}

/// Ordered size-label → width table used to build `srcset` attributes.
///
/// Order is significant: srcset entries are emitted in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentImageSizes {
    sizes: Vec<ImageSize>,
}

impl ContentImageSizes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a size (builder style)
    pub fn with(mut self, key: impl Into<String>, width: u32) -> Self {
        self.push(key, width);
        self
    }

    /// Add or replace a size, keeping the original position on replace.
    pub fn push(&mut self, key: impl Into<String>, width: u32) {
        let key = key.into();
        if let Some(size) = self.sizes.iter_mut().find(|s| s.key == key) {
            size.width = width;
        } else {
            self.sizes.push(ImageSize { key, width });
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageSize> {
        self.sizes.iter()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl<'de> Deserialize<'de> for ContentImageSizes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // `{ "w600": { "width": 600 }, ... }` - entries without a usable width are skipped
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut sizes = ContentImageSizes::new();
        for (key, value) in raw {
            let width = value
                .get("width")
                .and_then(Value::as_u64)
                .and_then(|w| u32::try_from(w).ok());
            if let Some(width) = width {
                sizes.push(key, width);
            }
        }
        Ok(sizes)
    }
}

// =============================================================================
// RenderOptions
// =============================================================================

/// Read-only context passed into rendering and URL transforms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Base URL of the site, used for absolute/relative rewriting
    pub site_url: Option<String>,
    /// URL of the containing document, used to resolve self links
    pub item_url: Option<String>,
    /// Responsive image widths; `None` disables srcset entirely
    pub content_image_sizes: Option<ContentImageSizes>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = Some(site_url.into());
        self
    }

    pub fn with_item_url(mut self, item_url: impl Into<String>) -> Self {
        self.item_url = Some(item_url.into());
        self
    }

    pub fn with_content_image_sizes(mut self, sizes: ContentImageSizes) -> Self {
        self.content_image_sizes = Some(sizes);
        self
    }

    /// Parse an option bag; unknown keys are ignored.
    pub fn from_json(value: &Value) -> crate::ContentResult<Self> {
        Ok(Self::deserialize(value)?)
    }

    pub fn site_url(&self) -> &str {
        self.site_url.as_deref().unwrap_or_default()
    }

    pub fn item_url(&self) -> Option<&str> {
        self.item_url.as_deref().filter(|url| !url.is_empty())
    }
}
