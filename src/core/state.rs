//! Shutdown coordination.
//!
//! Ctrl+C sets the `SHUTDOWN` flag. Once the dev server is registered the
//! handler also unblocks the HTTP accept loop and signals the actor system,
//! so `serve` can return normally instead of being killed mid-write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crossbeam::channel::Sender;
use tiny_http::Server;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for the actor system
static SHUTDOWN_TX: OnceLock<Sender<()>> = OnceLock::new();

/// Install the global Ctrl+C handler. Call once at program start.
///
/// Before `register_server()` the process exits immediately (nothing to
/// drain); afterwards shutdown is graceful.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if SERVER.get().is_some() {
            crate::log!("serve"; "shutting down...");
            request_shutdown();
        } else {
            std::process::exit(130);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server and the actor shutdown channel.
pub fn register_server(server: Arc<Server>, shutdown_tx: Sender<()>) {
    let _ = SERVER.set(server);
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Flag shutdown, notify the actor system and unblock the server.
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);

    if let Some(tx) = SHUTDOWN_TX.get() {
        let _ = tx.send(());
    }
    if let Some(server) = SERVER.get() {
        server.unblock();
    }
}

pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
