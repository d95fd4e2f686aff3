//! Server lifecycle management.

use crate::{actor::Coordinator, log};
use anyhow::Result;
use crossbeam::channel::Receiver;
use std::{
    net::SocketAddr,
    thread::{self, JoinHandle},
};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(
    interface: std::net::IpAddr,
    base_port: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                // Port 0 asks the OS for a free port
                let addr = server.server_addr().to_ip().unwrap_or(addr);
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map_or_else(|| "unknown error".to_string(), |e| e.to_string())
    ))
}

/// Run the actor system on its own thread with a small tokio runtime.
pub fn spawn_actors(
    coordinator: Option<Coordinator>,
    shutdown_rx: Receiver<()>,
) -> Option<JoinHandle<()>> {
    let coordinator = coordinator?;

    Some(thread::spawn(move || {
        run_actor_system(coordinator, shutdown_rx);
    }))
}

fn run_actor_system(coordinator: Coordinator, shutdown_rx: Receiver<()>) {
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            log!("actor"; "failed to create tokio runtime: {}", e);
            return;
        }
    };

    rt.block_on(async {
        if let Err(e) = coordinator.with_shutdown_signal(shutdown_rx).run().await {
            log!("actor"; "error: {}", e);
        }
    });
}

/// Wait for actor system to shutdown gracefully (max 2 seconds).
pub fn wait_for_shutdown(handle: Option<JoinHandle<()>>) {
    let Some(handle) = handle else { return };

    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(std::time::Duration::from_millis(50));
    }
}
