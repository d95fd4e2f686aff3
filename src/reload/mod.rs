//! Live reload over server-sent events.
//!
//! ```text
//! RebuildActor --publish--> [bounded queue] --dispatcher--> Subscription (per client)
//!                                                               |
//!                                     GET /_reload/events <-- stream_events
//! ```
//!
//! - `hub` - Bounded signal queue, dispatcher thread and client registry
//! - `stream` - Event stream writer (`connected`, `reload`, keepalive)

mod hub;
mod stream;

pub use hub::{ReloadHub, ReloadSignal, Subscription};
pub use stream::stream_events;

/// Route of the event stream endpoint.
pub const EVENTS_PATH: &str = "/_reload/events";

#[cfg(test)]
mod tests;
