//! Open Graph and Twitter Card meta tags for post pages.

use std::fmt::Write as _;

use crate::content::PageRecord;
use crate::utils::html::escape_attr;

const TITLE_CLOSE: &str = "</title>";

/// Insert SEO meta tags right after the first `</title>`.
///
/// Documents without a `<title>` are returned unchanged.
pub fn inject_seo_meta(html: &str, page: &PageRecord) -> String {
    let Some(pos) = find_ignore_case(html, TITLE_CLOSE) else {
        crate::debug!("seo"; "no </title> in {}, skipping meta tags", page.url);
        return html.to_string();
    };
    let at = pos + TITLE_CLOSE.len();

    let tags = meta_tags(page);
    let mut out = String::with_capacity(html.len() + tags.len());
    out.push_str(&html[..at]);
    out.push_str(&tags);
    out.push_str(&html[at..]);
    out
}

fn meta_tags(page: &PageRecord) -> String {
    let title = escape_attr(&page.title);
    let description = page
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(escape_attr);

    let mut tags = String::from("\n");
    let mut meta = |attr: &str, key: &str, value: &str| {
        let _ = writeln!(tags, r#"<meta {attr}="{key}" content="{value}">"#);
    };

    if let Some(desc) = &description {
        meta("name", "description", desc);
    }
    if !page.tags.is_empty() {
        meta("name", "keywords", &escape_attr(&page.tags.join(", ")));
    }
    meta("property", "og:type", "article");
    meta("property", "og:title", &title);
    if let Some(desc) = &description {
        meta("property", "og:description", desc);
    }
    meta("property", "twitter:card", "summary_large_image");
    meta("property", "twitter:title", &title);
    if let Some(desc) = &description {
        meta("property", "twitter:description", desc);
    }
    tags
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}
