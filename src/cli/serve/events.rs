//! `GET /_reload/events`: one blocking thread per connected browser.
//!
//! The connection is write-only once the head is sent, so a closed tab is
//! noticed on the next failed write. With no reloads in flight that is the
//! next keepalive: a departed client holds its thread and subscription for
//! at most about two keepalive intervals.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use tiny_http::Request;

use crate::reload::{ReloadHub, Subscription, stream_events};

/// Raw response head. The body is an open-ended event stream delimited by
/// connection close, so there is no length and no chunking.
const STREAM_HEAD: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Type: text/event-stream\r\n\
Cache-Control: no-cache\r\n\
Connection: keep-alive\r\n\
Access-Control-Allow-Origin: *\r\n\
\r\n";

/// Subscribe now and stream on a dedicated thread.
///
/// Subscribing before the thread starts means a reload published right
/// after the request arrives is not missed.
pub fn spawn_event_stream(request: Request, hub: &ReloadHub, keepalive: Duration) {
    let subscription = hub.subscribe();

    let spawned = thread::Builder::new()
        .name("reload-client".into())
        .spawn(move || match serve_stream(request, &subscription, keepalive) {
            Ok(reloads) => crate::debug!("reload"; "stream closed after {} reload(s)", reloads),
            Err(e) => crate::debug!("reload"; "client disconnected: {}", e),
        });

    if let Err(e) = spawned {
        crate::log!("reload"; "failed to start event stream: {}", e);
    }
}

fn serve_stream(request: Request, subscription: &Subscription, keepalive: Duration) -> io::Result<usize> {
    let mut writer = request.into_writer();
    writer.write_all(STREAM_HEAD)?;
    stream_events(&mut writer, subscription, keepalive)
}
