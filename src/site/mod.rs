//! Site generation: published pages to the output tree.
//!
//! Every build discards the previous output directory and writes it again
//! from scratch, so the tree always matches the current sources exactly.
//!
//! ```text
//! public/
//! ├── index.html
//! └── 2024/01/02/hello-world/index.html
//! ```

pub mod render;
pub mod seo;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::config::SiteConfig;
use crate::content::{LoadOutcome, MarkdownConverter, PageRecord, load_pages};
use crate::log;
use crate::utils::path::join_url_path;
use crate::utils::plural_count;
use render::{PageRenderer, RenderError, TemplateRenderer};

const INDEX_FILE: &str = "index.html";

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("page {url} ({}) resolves outside the output directory", source_path.display())]
    InvalidUrl { url: String, source_path: PathBuf },
}

/// What a build wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTree {
    pub root: PathBuf,
    /// Every written file, index first, then pages in listing order.
    pub files: Vec<PathBuf>,
}

impl OutputTree {
    /// Number of pages written, excluding the index.
    pub fn page_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }
}

/// Generate the output tree for `pages`.
///
/// Drafts are dropped, the rest are listed newest first (stable for equal
/// dates). Any write failure aborts the build.
pub fn build_site(
    pages: &[PageRecord],
    output_dir: &Path,
    renderer: &dyn PageRenderer,
) -> Result<OutputTree, BuildError> {
    let mut published: Vec<&PageRecord> = pages.iter().filter(|p| !p.is_draft).collect();
    published.sort_by(|a, b| b.date.cmp(&a.date));

    // Reject escaping URLs before anything is deleted
    let targets = published
        .iter()
        .map(|page| {
            join_url_path(output_dir, &page.url)
                .map(|dir| dir.join(INDEX_FILE))
                .ok_or_else(|| BuildError::InvalidUrl {
                    url: page.url.clone(),
                    source_path: page.source_path.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    reset_dir(output_dir)?;

    let mut tree = OutputTree {
        root: output_dir.to_path_buf(),
        files: Vec::with_capacity(published.len() + 1),
    };

    let index_path = output_dir.join(INDEX_FILE);
    write_file(&index_path, &renderer.render_index(&published)?)?;
    tree.files.push(index_path);

    for (page, path) in published.iter().zip(targets) {
        let html = renderer.render_post(page)?;
        let html = seo::inject_seo_meta(&html, page);
        write_file(&path, &html)?;
        tree.files.push(path);
    }

    Ok(tree)
}

/// Load content and build the site with the configured templates.
pub fn run_full_build(config: &SiteConfig) -> anyhow::Result<OutputTree> {
    let start = Instant::now();

    let LoadOutcome { pages, skipped } =
        load_pages(&config.build.content, &config.watch, &MarkdownConverter::default());
    let renderer = TemplateRenderer::from_dir(&config.site, &config.build.templates)?;
    let tree = build_site(&pages, &config.build.output, &renderer)?;

    let drafts = pages.iter().filter(|p| p.is_draft).count();
    log!("build"; "{} in {:.0?} -> {}{}",
        plural_count(tree.page_count(), "page"),
        start.elapsed(),
        config.root_relative(&tree.root).display(),
        summary_suffix(drafts, skipped.len()));
    Ok(tree)
}

fn summary_suffix(drafts: usize, skipped: usize) -> String {
    let mut parts = Vec::new();
    if drafts > 0 {
        parts.push(format!("{} hidden", plural_count(drafts, "draft")));
    }
    if skipped > 0 {
        parts.push(format!("{} skipped", plural_count(skipped, "file")));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn reset_dir(dir: &Path) -> Result<(), BuildError> {
    let io_err = |source| BuildError::Io {
        path: dir.to_path_buf(),
        source,
    };
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(e)),
    }
    fs::create_dir_all(dir).map_err(io_err)
}

fn write_file(path: &Path, content: &str) -> Result<(), BuildError> {
    let io_err = |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}
