use std::path::PathBuf;

use tokio::time::Instant;

/// Which kind of source changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Content document (`watch.content_extensions`)
    Content,
    /// Template source (`watch.template_extensions`); triggers regeneration
    Template,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Template => "template",
        }
    }
}

/// A relevant filesystem change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
    pub at: Instant,
}

/// One coalesced rebuild request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// Classification of the most recent event in the burst
    pub kind: ChangeKind,
    /// Path of the most recent event
    pub path: PathBuf,
    /// Number of relevant events folded into this trigger
    pub events: usize,
}
