//! Single-URL rewriting against a site URL.

/// Direction of a URL rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlDirection {
    ToRelative,
    ToAbsolute,
}

/// Rewrites bare URLs between absolute and root-relative form.
///
/// An empty site URL turns every rewrite into a no-op.
#[derive(Debug, Clone, Copy)]
pub struct UrlRewriter<'a> {
    site_url: &'a str,
    item_url: Option<&'a str>,
    direction: UrlDirection,
}

impl<'a> UrlRewriter<'a> {
    pub fn new(site_url: &'a str, direction: UrlDirection) -> Self {
        Self {
            site_url,
            item_url: None,
            direction,
        }
    }

    /// Document URL used to resolve fragment-only self links.
    pub fn with_item_url(mut self, item_url: Option<&'a str>) -> Self {
        self.item_url = item_url.filter(|url| !url.is_empty());
        self
    }

    pub fn direction(&self) -> UrlDirection {
        self.direction
    }

    pub fn is_noop(&self) -> bool {
        self.site_url.is_empty()
    }

    /// Rewrite a bare URL field value.
    pub fn rewrite(&self, url: &str) -> String {
        if self.is_noop() {
            return url.to_owned();
        }
        match self.direction {
            UrlDirection::ToRelative => to_relative_url(url, self.site_url),
            UrlDirection::ToAbsolute => to_absolute_url(url, self.site_url),
        }
    }

    /// Rewrite a URL found in a self-referencing field.
    ///
    /// Same as [`rewrite`](Self::rewrite), except that fragment-only links
    /// resolve against the item URL when one is set.
    pub fn rewrite_self_link(&self, url: &str) -> String {
        let Some(item_url) = self.item_url else {
            return self.rewrite(url);
        };
        if self.is_noop() {
            return url.to_owned();
        }
        match self.direction {
            UrlDirection::ToAbsolute if url.starts_with('#') => format!("{item_url}{url}"),
            UrlDirection::ToRelative => match url.strip_prefix(item_url) {
                Some(fragment) if fragment.starts_with('#') => fragment.to_owned(),
                _ => self.rewrite(url),
            },
            UrlDirection::ToAbsolute => self.rewrite(url),
        }
    }
}

/// `https://example.com/blog/post` → `/post` for site `https://example.com/blog`.
///
/// Values outside the site pass through unchanged.
pub fn to_relative_url(url: &str, site_url: &str) -> String {
    if url.is_empty() || site_url.is_empty() {
        return url.to_owned();
    }
    let base = site_url.trim_end_matches('/');
    match url.strip_prefix(base) {
        Some("") => "/".to_owned(),
        Some(rest) if rest.starts_with('/') => rest.to_owned(),
        _ => url.to_owned(),
    }
}

/// `/post` → `https://example.com/blog/post` for site `https://example.com/blog/`.
///
/// Only root-relative values are rewritten; empty, protocol-relative and
/// fully-qualified URLs pass through unchanged.
pub fn to_absolute_url(url: &str, site_url: &str) -> String {
    if site_url.is_empty() || !url.starts_with('/') || url.starts_with("//") {
        return url.to_owned();
    }
    format!("{}{}", site_url.trim_end_matches('/'), url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://example.com/";

    #[test]
    fn test_to_relative() {
        assert_eq!(to_relative_url("https://example.com/post/", SITE), "/post/");
        assert_eq!(to_relative_url("https://example.com", SITE), "/");
        assert_eq!(to_relative_url("https://example.com/", SITE), "/");
        assert_eq!(to_relative_url("https://other.com/post/", SITE), "https://other.com/post/");
        // Prefix must end on a path boundary
        assert_eq!(
            to_relative_url("https://example.community/", SITE),
            "https://example.community/"
        );
        assert_eq!(to_relative_url("", SITE), "");
    }

    #[test]
    fn test_to_relative_subdirectory() {
        let site = "https://example.com/blog";
        assert_eq!(to_relative_url("https://example.com/blog/post", site), "/post");
        assert_eq!(to_relative_url("https://example.com/about", site), "https://example.com/about");
    }

    #[test]
    fn test_to_absolute() {
        assert_eq!(to_absolute_url("/post/", SITE), "https://example.com/post/");
        assert_eq!(to_absolute_url("/post/", "https://example.com"), "https://example.com/post/");
        assert_eq!(to_absolute_url("//cdn.example.com/a.png", SITE), "//cdn.example.com/a.png");
        assert_eq!(to_absolute_url("https://other.com/", SITE), "https://other.com/");
        assert_eq!(to_absolute_url("post", SITE), "post");
        assert_eq!(to_absolute_url("", SITE), "");
    }

    #[test]
    fn test_empty_site_url_is_noop() {
        let rewriter = UrlRewriter::new("", UrlDirection::ToAbsolute);
        assert!(rewriter.is_noop());
        assert_eq!(rewriter.rewrite("/post"), "/post");
        assert_eq!(
            UrlRewriter::new("", UrlDirection::ToRelative).rewrite("https://example.com/post"),
            "https://example.com/post"
        );
    }

    #[test]
    fn test_self_links() {
        let item = Some("https://example.com/my-post/");
        let to_abs = UrlRewriter::new(SITE, UrlDirection::ToAbsolute).with_item_url(item);
        assert_eq!(to_abs.rewrite_self_link("#intro"), "https://example.com/my-post/#intro");
        assert_eq!(to_abs.rewrite_self_link("/other/"), "https://example.com/other/");
        // Bare URL fields never resolve against the item
        assert_eq!(to_abs.rewrite("#intro"), "#intro");

        let to_rel = UrlRewriter::new(SITE, UrlDirection::ToRelative).with_item_url(item);
        assert_eq!(to_rel.rewrite_self_link("https://example.com/my-post/#intro"), "#intro");
        assert_eq!(to_rel.rewrite_self_link("https://example.com/my-post/"), "/my-post/");

        let no_item = UrlRewriter::new(SITE, UrlDirection::ToAbsolute).with_item_url(Some(""));
        assert_eq!(no_item.rewrite_self_link("#intro"), "#intro");
    }
}
