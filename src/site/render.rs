//! Page template rendering.
//!
//! [`TemplateRenderer`] reads `index.html` and `post.html` from the templates
//! directory, falling back to the embedded defaults for whichever is absent.
//!
//! | Template     | Placeholders                                                        |
//! |--------------|---------------------------------------------------------------------|
//! | `index.html` | `lang`, `site_title`, `site_description`, `posts`                   |
//! | `post.html`  | `lang`, `site_title`, `title`, `date`, `date_long`, `url`, `canonical`, `content`, `tags` |
//!
//! Every value is HTML-escaped except `content`, `posts`, `canonical` and
//! `tags`, which are generated markup.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::SiteInfoConfig;
use crate::content::PageRecord;
use crate::embed::TemplateVars;
use crate::embed::site::{INDEX_HTML, POST_HTML};
use crate::utils::html::{escape, escape_attr};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Turns page data into complete HTML documents.
pub trait PageRenderer: Send + Sync {
    /// Index page listing `pages` in the given order.
    fn render_index(&self, pages: &[&PageRecord]) -> Result<String, RenderError>;

    /// Standalone page for one record.
    fn render_post(&self, page: &PageRecord) -> Result<String, RenderError>;
}

/// `{{placeholder}}` templates, user-provided or embedded.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    site: SiteInfoConfig,
    index: Option<String>,
    post: Option<String>,
}

impl TemplateRenderer {
    /// Embedded templates only.
    #[cfg(test)]
    pub fn embedded(site: &SiteInfoConfig) -> Self {
        Self {
            site: site.clone(),
            index: None,
            post: None,
        }
    }

    /// Load overrides from `dir`. Missing files are not an error.
    pub fn from_dir(site: &SiteInfoConfig, dir: &Path) -> Result<Self, RenderError> {
        Ok(Self {
            site: site.clone(),
            index: read_optional(&dir.join("index.html"))?,
            post: read_optional(&dir.join("post.html"))?,
        })
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, RenderError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(RenderError::Template {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl PageRenderer for TemplateRenderer {
    fn render_index(&self, pages: &[&PageRecord]) -> Result<String, RenderError> {
        let vars = IndexVars {
            site: &self.site,
            pages,
        };
        let template = self.index.as_deref().unwrap_or(INDEX_HTML.content());
        Ok(vars.apply(template))
    }

    fn render_post(&self, page: &PageRecord) -> Result<String, RenderError> {
        let vars = PostVars {
            site: &self.site,
            page,
        };
        let template = self.post.as_deref().unwrap_or(POST_HTML.content());
        Ok(vars.apply(template))
    }
}

/// Variables for `index.html`.
pub struct IndexVars<'a> {
    pub site: &'a SiteInfoConfig,
    pub pages: &'a [&'a PageRecord],
}

impl TemplateVars for IndexVars<'_> {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "lang" => Some(escape_attr(&self.site.language)),
            "site_title" => Some(escape(&self.site.title)),
            "site_description" => Some(escape(&self.site.description)),
            "posts" => Some(Cow::Owned(post_list(self.pages))),
            _ => None,
        }
    }
}

/// Variables for `post.html`.
pub struct PostVars<'a> {
    pub site: &'a SiteInfoConfig,
    pub page: &'a PageRecord,
}

impl TemplateVars for PostVars<'_> {
    fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        let page = self.page;
        match name {
            "lang" => Some(escape_attr(&self.site.language)),
            "site_title" => Some(escape(&self.site.title)),
            "title" => Some(escape(&page.title)),
            "date" => Some(escape_attr(&page.publish_date)),
            "date_long" => Some(Cow::Owned(page.date.display_long())),
            "url" => Some(escape_attr(&page.url)),
            "canonical" => Some(Cow::Owned(
                self.site
                    .absolute_url(&page.url)
                    .map(|href| format!(r#"<link rel="canonical" href="{}">"#, escape_attr(&href)))
                    .unwrap_or_default(),
            )),
            "content" => Some(Cow::Borrowed(&page.html_body)),
            "tags" => Some(Cow::Owned(tag_list(&page.tags))),
            _ => None,
        }
    }
}

fn post_list(pages: &[&PageRecord]) -> String {
    if pages.is_empty() {
        return r#"<p class="empty">No posts yet.</p>"#.to_string();
    }

    let mut out = String::from("<ul class=\"posts\">\n");
    for page in pages {
        let _ = writeln!(
            out,
            r#"<li><time datetime="{}">{}</time><a href="{}">{}</a></li>"#,
            escape_attr(&page.publish_date),
            page.date.date_str(),
            escape_attr(&page.url),
            escape(&page.title),
        );
    }
    out.push_str("</ul>");
    out
}

fn tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let items: Vec<_> = tags
        .iter()
        .map(|t| format!("<li>{}</li>", escape(t)))
        .collect();
    format!("<ul class=\"tags\">{}</ul>", items.join(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::DateTimeUtc;

    fn page(title: &str, date: DateTimeUtc, slug: &str) -> PageRecord {
        PageRecord {
            title: title.into(),
            publish_date: date.to_string(),
            date,
            slug: slug.into(),
            url: crate::content::page_url(&date, slug),
            html_body: "<p>body {{title}}</p>".into(),
            is_draft: false,
            description: None,
            tags: vec!["a&b".into()],
            source_path: PathBuf::from("x.md"),
        }
    }

    #[test]
    fn test_index_lists_pages_in_order() {
        let renderer = TemplateRenderer::embedded(&SiteInfoConfig::default());
        let a = page("Newer", DateTimeUtc::from_ymd(2024, 3, 1), "newer");
        let b = page("Older <b>", DateTimeUtc::from_ymd(2024, 1, 1), "older");

        let html = renderer.render_index(&[&a, &b]).unwrap();
        let newer = html.find("/2024/03/01/newer/").unwrap();
        let older = html.find("/2024/01/01/older/").unwrap();
        assert!(newer < older);
        assert!(html.contains("Older &lt;b&gt;"));
        assert!(html.contains("<title>Blog</title>"));
    }

    #[test]
    fn test_empty_index() {
        let renderer = TemplateRenderer::embedded(&SiteInfoConfig::default());
        assert!(renderer.render_index(&[]).unwrap().contains("No posts yet."));
    }

    #[test]
    fn test_post_body_not_reexpanded() {
        let renderer = TemplateRenderer::embedded(&SiteInfoConfig::default());
        let p = page("Hello", DateTimeUtc::from_ymd(2024, 1, 2), "hello");

        let html = renderer.render_post(&p).unwrap();
        assert!(html.contains("<title>Hello | Blog</title>"));
        assert!(html.contains("<p>body {{title}}</p>"));
        assert!(html.contains("January 2, 2024"));
        assert!(html.contains("<li>a&amp;b</li>"));
        assert!(!html.contains("rel=\"canonical\""));
    }

    #[test]
    fn test_canonical_link_with_site_url() {
        let site = SiteInfoConfig {
            url: Some("https://example.com".into()),
            ..Default::default()
        };
        let renderer = TemplateRenderer::embedded(&site);
        let p = page("Hello", DateTimeUtc::from_ymd(2024, 1, 2), "hello");

        let html = renderer.render_post(&p).unwrap();
        assert!(html.contains(
            r#"<link rel="canonical" href="https://example.com/2024/01/02/hello/">"#
        ));
    }

    #[test]
    fn test_template_override() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join("post.html"), "<title>{{ title }}</title>{{content}}").unwrap();

        let renderer = TemplateRenderer::from_dir(&SiteInfoConfig::default(), temp.path()).unwrap();
        let p = page("Custom", DateTimeUtc::from_ymd(2024, 1, 2), "custom");
        assert_eq!(
            renderer.render_post(&p).unwrap(),
            "<title>Custom</title><p>body {{title}}</p>"
        );
        // index.html absent: embedded fallback
        assert!(renderer.render_index(&[]).unwrap().contains("<!DOCTYPE html>"));
    }
}
