//! Content directory scanning.
//!
//! Files are enumerated in path order and converted in parallel; the result
//! keeps path order so that duplicate-URL resolution is deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use thiserror::Error;

use super::convert::DocumentConverter;
use super::page::PageRecord;
use crate::config::WatchConfig;
use crate::log;

/// Why a single source file was skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: no publish date (set `date` or use a YYYY-MM-DD- filename prefix)", path.display())]
    MissingDate { path: PathBuf },

    #[error("{}: invalid date `{value}`", path.display())]
    InvalidDate { path: PathBuf, value: String },

    #[error("{}: {message}", path.display())]
    Frontmatter { path: PathBuf, message: String },
}

/// Pages that loaded plus the files that were skipped.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub pages: Vec<PageRecord>,
    pub skipped: Vec<LoadError>,
}

/// Load every content document under `dir`.
///
/// Per-file failures never abort the load: they are logged and returned in
/// [`LoadOutcome::skipped`]. A missing directory yields an empty outcome.
pub fn load_pages(
    dir: &Path,
    watch: &WatchConfig,
    converter: &dyn DocumentConverter,
) -> LoadOutcome {
    if !dir.is_dir() {
        log!("warning"; "content directory {} does not exist", dir.display());
        return LoadOutcome::default();
    }

    let files = collect_content_files(dir, watch);
    let results: Vec<_> = files
        .par_iter()
        .map(|path| load_page(path, converter))
        .collect();

    let mut outcome = LoadOutcome::default();
    for result in results {
        match result {
            Ok(page) => outcome.pages.push(page),
            Err(e) => {
                log!("warning"; "skipping {}", e);
                outcome.skipped.push(e);
            }
        }
    }
    outcome.pages = dedupe_urls(outcome.pages);
    outcome
}

/// Content files under `dir`, sorted by path. Hidden entries are skipped.
fn collect_content_files(dir: &Path, watch: &WatchConfig) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .skip_hidden(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| !is_hidden(dir, p))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| watch.is_content_ext(e))
        })
        .collect();
    files.sort();
    files
}

/// Any component below `base` starting with a dot.
fn is_hidden(base: &Path, path: &Path) -> bool {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}

fn load_page(path: &Path, converter: &dyn DocumentConverter) -> Result<PageRecord, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = converter
        .parse(&raw)
        .map_err(|message| LoadError::Frontmatter {
            path: path.to_path_buf(),
            message,
        })?;
    PageRecord::from_document(path, doc)
}

/// Append `-2`, `-3`, ... to slugs whose URL is already taken.
fn dedupe_urls(pages: Vec<PageRecord>) -> Vec<PageRecord> {
    let mut seen: FxHashMap<String, usize> = FxHashMap::default();
    let mut out = Vec::with_capacity(pages.len());

    for page in pages {
        let count = seen.entry(page.url.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            out.push(page);
            continue;
        }

        let mut n = *count;
        let renamed = loop {
            let candidate = page.clone().with_slug(format!("{}-{n}", page.slug));
            if !seen.contains_key(&candidate.url) {
                break candidate;
            }
            n += 1;
        };
        log!("warning"; "{} collides with an earlier page at {}, using {}",
            page.source_path.display(), page.url, renamed.url);
        seen.insert(renamed.url.clone(), 1);
        out.push(renamed);
    }
    out
}
