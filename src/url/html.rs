//! Anchor `href` rewriting inside HTML fragments.
//!
//! Only the href values change; every other byte of the fragment, including
//! attribute order, quoting and surrounding text, is preserved.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::UrlRewriter;

/// `<a ... href=` followed by a double-quoted, single-quoted or bare value.
static ANCHOR_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?P<head><a\s(?:[^>]*?\s)?href\s*=\s*)(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<bare>[^\s"'>]+))"#)
        .expect("anchor href pattern is valid")
});

/// Rewrite every anchor href in `html` through the rewriter's self-link rule.
pub fn rewrite_html(html: &str, rewriter: &UrlRewriter<'_>) -> String {
    if html.is_empty() || rewriter.is_noop() {
        return html.to_owned();
    }

    ANCHOR_HREF_RE
        .replace_all(html, |caps: &Captures<'_>| {
            let head = &caps["head"];
            if let Some(value) = caps.name("dq") {
                format!("{head}\"{}\"", rewriter.rewrite_self_link(value.as_str()))
            } else if let Some(value) = caps.name("sq") {
                format!("{head}'{}'", rewriter.rewrite_self_link(value.as_str()))
            } else {
                let value = caps.name("bare").map_or("", |m| m.as_str());
                format!("{head}{}", rewriter.rewrite_self_link(value))
            }
        })
        .into_owned()
}

/// Every anchor href in `html`, in document order.
pub fn anchor_hrefs(html: &str) -> Vec<&str> {
    ANCHOR_HREF_RE
        .captures_iter(html)
        .filter_map(|caps| {
            caps.name("dq")
                .or_else(|| caps.name("sq"))
                .or_else(|| caps.name("bare"))
                .map(|m| m.as_str())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::UrlDirection;

    const SITE: &str = "https://example.com/";

    #[test]
    fn test_rewrites_to_relative_preserving_markup() {
        let rewriter = UrlRewriter::new(SITE, UrlDirection::ToRelative);
        let html = r#"A <a class="x" href="https://example.com/post/" target='_blank'>link</a> and <a href='https://other.com/'>other</a>"#;
        assert_eq!(
            rewrite_html(html, &rewriter),
            r#"A <a class="x" href="/post/" target='_blank'>link</a> and <a href='https://other.com/'>other</a>"#
        );
    }

    #[test]
    fn test_rewrites_to_absolute() {
        let rewriter = UrlRewriter::new(SITE, UrlDirection::ToAbsolute);
        assert_eq!(
            rewrite_html("<A HREF=/post>x</A> <img src=\"/image.png\">", &rewriter),
            "<A HREF=https://example.com/post>x</A> <img src=\"/image.png\">"
        );
    }

    #[test]
    fn test_ignores_non_anchor_hrefs() {
        let rewriter = UrlRewriter::new(SITE, UrlDirection::ToAbsolute);
        let html = r#"<link href="/style.css"><abbr data-href="/x">y</abbr>"#;
        assert_eq!(rewrite_html(html, &rewriter), html);
    }

    #[test]
    fn test_resolves_fragments_against_item_url() {
        let rewriter = UrlRewriter::new(SITE, UrlDirection::ToAbsolute)
            .with_item_url(Some("https://example.com/my-post/"));
        assert_eq!(
            rewrite_html(r##"<a href="#notes">notes</a>"##, &rewriter),
            r##"<a href="https://example.com/my-post/#notes">notes</a>"##
        );
    }

    #[test]
    fn test_anchor_hrefs() {
        let html = r#"<a href="/a">a</a><a data-x="1" href='/b'>b</a><a href=/c>c</a>"#;
        assert_eq!(anchor_hrefs(html), vec!["/a", "/b", "/c"]);
    }
}
