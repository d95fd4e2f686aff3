//! Actor System for Rebuild-on-Change
//!
//! Message-passing concurrency for watch mode:
//!
//! ```text
//! FsActor --Rebuild(Trigger)--> RebuildActor --publish--> ReloadHub
//! (watch + debounce)            (regenerate + build)      (SSE fan-out)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher with debouncing
//! - `rebuild` - Serialized regenerate/build cycles
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod rebuild;

pub use coordinator::Coordinator;
