//! Server-sent event stream for one client.

use std::io::{self, Write};
use std::time::Duration;

use crossbeam::channel::RecvTimeoutError;

use super::hub::Subscription;

pub const CONNECTED: &[u8] = b"data: connected\n\n";
pub const RELOAD: &[u8] = b"data: reload\n\n";
pub const KEEPALIVE: &[u8] = b": keepalive\n\n";

/// Pump events to `writer` until the hub closes or a write fails.
///
/// Sends `connected` once, then one `reload` per signal, and a keepalive
/// comment whenever `keepalive` passes without a signal. Returns the number
/// of reloads delivered. A write error means the client went away.
pub fn stream_events<W: Write>(
    writer: &mut W,
    subscription: &Subscription,
    keepalive: Duration,
) -> io::Result<usize> {
    send(writer, CONNECTED)?;

    let mut reloads = 0;
    loop {
        match subscription.recv_timeout(keepalive) {
            Ok(_) => {
                send(writer, RELOAD)?;
                reloads += 1;
            }
            Err(RecvTimeoutError::Timeout) => send(writer, KEEPALIVE)?,
            Err(RecvTimeoutError::Disconnected) => return Ok(reloads),
        }
    }
}

fn send<W: Write>(writer: &mut W, event: &[u8]) -> io::Result<()> {
    writer.write_all(event)?;
    writer.flush()
}
