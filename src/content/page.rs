//! Normalized page records.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::convert::ParsedDocument;
use super::meta::{get_bool, get_list, get_str};
use super::slug::{UNTITLED, first_slug};
use super::LoadError;
use crate::utils::date::DateTimeUtc;

/// One content document, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub title: String,
    /// Normalized publish date: `YYYY-MM-DD`, or RFC 3339 when a time of day
    /// was given.
    pub publish_date: String,
    pub date: DateTimeUtc,
    pub slug: String,
    /// `/YYYY/MM/DD/slug/`
    pub url: String,
    pub html_body: String,
    pub is_draft: bool,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub source_path: PathBuf,
}

/// `YYYY-MM-DD-rest` filename stems.
static DATED_STEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2})(?:-(.+))?$").expect("dated stem pattern is valid")
});

/// What the filename contributes: an optional date and display text.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct StemInfo {
    pub date: Option<String>,
    pub text: String,
}

impl StemInfo {
    pub(super) fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        match DATED_STEM.captures(&stem) {
            Some(caps) => Self {
                date: caps.get(1).map(|m| m.as_str().to_string()),
                text: caps.get(2).map_or_else(String::new, |m| humanize(m.as_str())),
            },
            None => Self {
                date: None,
                text: humanize(&stem),
            },
        }
    }
}

/// `my-first_post` -> `my first post`
fn humanize(stem: &str) -> String {
    stem.split(['-', '_'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl PageRecord {
    /// Build a record from a converted document.
    ///
    /// - date: metadata `date`, else the filename prefix; required
    /// - title: metadata `title`, else first heading, else filename text,
    ///   else the slug
    /// - slug: metadata `slug`, else the title, else the filename text
    pub fn from_document(path: &Path, doc: ParsedDocument) -> Result<Self, LoadError> {
        let stem = StemInfo::from_path(path);

        let raw_date = get_str(&doc.meta, "date")
            .map(str::to_string)
            .or(stem.date)
            .ok_or_else(|| LoadError::MissingDate {
                path: path.to_path_buf(),
            })?;
        let date = DateTimeUtc::parse(&raw_date).ok_or_else(|| LoadError::InvalidDate {
            path: path.to_path_buf(),
            value: raw_date.clone(),
        })?;

        let title = get_str(&doc.meta, "title")
            .map(str::to_string)
            .or(doc.first_heading)
            .unwrap_or_else(|| stem.text.clone());

        let slug = first_slug([
            get_str(&doc.meta, "slug").unwrap_or_default(),
            title.as_str(),
            stem.text.as_str(),
        ]);

        let title = match title.trim() {
            "" if slug == UNTITLED => UNTITLED.to_string(),
            "" => slug.replace('-', " "),
            t => t.to_string(),
        };

        Ok(Self {
            url: page_url(&date, &slug),
            title,
            publish_date: date.to_string(),
            date,
            slug,
            html_body: doc.html,
            is_draft: get_bool(&doc.meta, "draft"),
            description: get_str(&doc.meta, "description").map(str::to_string),
            tags: get_list(&doc.meta, "tags"),
            source_path: path.to_path_buf(),
        })
    }

    /// Give this record a different slug (used to resolve URL collisions).
    pub(super) fn with_slug(mut self, slug: String) -> Self {
        self.url = page_url(&self.date, &slug);
        self.slug = slug;
        self
    }
}

/// Canonical page URL: `/YYYY/MM/DD/slug/`.
pub fn page_url(date: &DateTimeUtc, slug: &str) -> String {
    format!(
        "/{:04}/{:02}/{:02}/{slug}/",
        date.year, date.month, date.day
    )
}
