//! Responsive `srcset` rules.
//!
//! Each rule recognises one family of image URLs and knows how to derive the
//! URL of a resized variant. Rules are tried in table order; the first rule
//! that matches a `src` builds every entry.

use std::sync::LazyLock;

use regex::Regex;

use crate::options::ContentImageSizes;

/// `/content/images/<path>`, optionally below a subdirectory prefix.
static CONTENT_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<root>/(?:[^?#]*?/)?content/images)/(?P<path>[^?#].*)$")
        .expect("content image pattern is valid")
});

/// Image CDNs that resize through a `w` query parameter.
static WIDTH_PARAM_CDN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://images\.unsplash\.com/").expect("cdn host pattern is valid")
});

static WIDTH_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<sep>[?&])w=[^&#]*").expect("width param pattern is valid")
});

// =============================================================================
// SrcsetRule
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrcsetRule {
    /// Local upload: insert `/size/<key>` right after `content/images`
    ContentPath,
    /// CDN URL: rewrite the `w=` query parameter
    WidthParam,
}

/// Rules in match order.
pub const SRCSET_RULES: &[SrcsetRule] = &[SrcsetRule::ContentPath, SrcsetRule::WidthParam];

impl SrcsetRule {
    pub fn matches(self, src: &str) -> bool {
        match self {
            Self::ContentPath => !src.starts_with("//") && CONTENT_IMAGE_RE.is_match(src),
            Self::WidthParam => WIDTH_PARAM_CDN_RE.is_match(src),
        }
    }

    /// URL of the `key`/`width` variant of `src`, `None` when the rule does not apply.
    pub fn sized_url(self, src: &str, key: &str, width: u32) -> Option<String> {
        if !self.matches(src) {
            return None;
        }
        match self {
            Self::ContentPath => {
                let caps = CONTENT_IMAGE_RE.captures(src)?;
                Some(format!("{}/size/{}/{}", &caps["root"], key, &caps["path"]))
            }
            Self::WidthParam => Some(set_width_param(src, width)),
        }
    }
}

/// Replace the first `w=` parameter, appending one when absent.
fn set_width_param(src: &str, width: u32) -> String {
    if WIDTH_PARAM_RE.is_match(src) {
        return WIDTH_PARAM_RE
            .replace(src, |caps: &regex::Captures<'_>| format!("{}w={}", &caps["sep"], width))
            .into_owned();
    }

    let (base, fragment) = match src.find('#') {
        Some(pos) => src.split_at(pos),
        None => (src, ""),
    };
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}w={width}{fragment}")
}

/// Build a `srcset` value for `src`, or `None` when no rule applies.
pub fn build_srcset(src: &str, sizes: Option<&ContentImageSizes>) -> Option<String> {
    let sizes = sizes.filter(|s| !s.is_empty())?;
    if src.is_empty() {
        return None;
    }
    let rule = SRCSET_RULES.iter().copied().find(|rule| rule.matches(src))?;

    let entries: Vec<String> = sizes
        .iter()
        .filter_map(|size| {
            rule.sized_url(src, &size.key, size.width)
                .map(|url| format!("{} {}w", url, size.width))
        })
        .collect();

    (!entries.is_empty()).then(|| entries.join(", "))
}
