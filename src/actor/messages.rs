//! Actor Message Definitions
//!
//! ```text
//! FsActor --Rebuild(Trigger)--> RebuildActor --publish--> ReloadHub
//! ```

use super::fs::Trigger;

/// Messages to the Rebuild Actor
#[derive(Debug)]
pub enum RebuildMsg {
    /// Coalesced change burst: regenerate (if needed) and rebuild
    Rebuild(Trigger),
    /// Stop after the current rebuild
    Shutdown,
}
