//! Relevance filter: raw notify events to [`ChangeEvent`]s.
//!
//! An event is relevant when it writes content (create, data or rename,
//! remove) to a file with a content or template extension that is not an
//! editor artifact and does not live in the output directory.

use std::path::Path;

use notify::EventKind;
use notify::event::ModifyKind;
use tokio::time::Instant;

use super::types::{ChangeEvent, ChangeKind};
use crate::config::SiteConfig;

/// Relevant changes carried by one notify event.
pub(super) fn classify(event: &notify::Event, config: &SiteConfig, at: Instant) -> Vec<ChangeEvent> {
    if !is_content_write(&event.kind) {
        return Vec::new();
    }

    event
        .paths
        .iter()
        .filter_map(|path| {
            relevance(path, config).map(|kind| ChangeEvent {
                path: path.clone(),
                kind,
                at,
            })
        })
        .collect()
}

/// Create, data/name modification and removal. Metadata-only touches and
/// reads would otherwise cause rebuild loops.
pub(super) fn is_content_write(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        EventKind::Access(_) | EventKind::Any | EventKind::Other => false,
    }
}

pub(super) fn relevance(path: &Path, config: &SiteConfig) -> Option<ChangeKind> {
    if path.starts_with(&config.build.output) || is_temp_file(path) {
        return None;
    }

    let ext = path.extension()?.to_str()?;
    if config.watch.is_content_ext(ext) {
        Some(ChangeKind::Content)
    } else if config.watch.is_template_ext(ext) {
        Some(ChangeKind::Template)
    } else {
        None
    }
}

/// Check if path is a temp/backup file (editor artifacts).
pub(super) fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "swx" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
        || name.starts_with('#')
}
