use std::path::PathBuf;

use notify::{RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

/// A directory to watch and how deep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoot {
    pub path: PathBuf,
    pub mode: RecursiveMode,
}

impl WatchRoot {
    pub fn recursive(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: RecursiveMode::Recursive,
        }
    }

    pub fn shallow(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: RecursiveMode::NonRecursive,
        }
    }
}

/// Watch-root consistency manager.
///
/// Responsibility:
/// - Attach existing roots at startup
/// - Re-attach roots that were removed and recreated
pub(super) struct WatchRoots {
    desired: Vec<WatchRoot>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(roots: Vec<WatchRoot>) -> Self {
        Self {
            desired: roots,
            attached: FxHashSet::default(),
        }
    }

    pub(super) fn attach_existing<W: Watcher>(&mut self, watcher: &mut W) -> notify::Result<()> {
        for root in &self.desired {
            if !root.path.exists() {
                crate::debug!("watch"; "not watching {} (missing)", root.path.display());
                continue;
            }
            watcher.watch(&root.path, root.mode)?;
            self.attached.insert(root.path.clone());
        }

        Ok(())
    }

    pub(super) fn maintain<W: Watcher>(&mut self, watcher: &mut W) {
        // Drop stale handles for roots that no longer exist.
        self.attached.retain(|path| path.exists());

        for root in &self.desired {
            if self.attached.contains(&root.path) || !root.path.exists() {
                continue;
            }

            match watcher.watch(&root.path, root.mode) {
                Ok(()) => {
                    self.attached.insert(root.path.clone());
                    crate::debug!("watch"; "re-attached watch: {}", root.path.display());
                }
                Err(e) => crate::log!("watch"; "failed to watch {}: {}", root.path.display(), e),
            }
        }
    }

    #[cfg(test)]
    pub(super) fn is_attached(&self, path: &std::path::Path) -> bool {
        self.attached.contains(path)
    }
}
