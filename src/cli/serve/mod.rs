//! Development server with live reload support.
//!
//! ```text
//! bind → attach watcher → initial build → actors + request loop
//! ```
//!
//! The watcher is attached before the initial build so edits made while it
//! runs still trigger a rebuild. A failing initial build is reported and the
//! server keeps running; the next change retries.

mod events;
mod inject;
mod lifecycle;
mod path;
mod response;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel;
use tiny_http::{Request, Server};

use crate::actor::Coordinator;
use crate::actor::rebuild::RebuildPhase;
use crate::config::SiteConfig;
use crate::core::{is_shutdown, register_server};
use crate::reload::{EVENTS_PATH, ReloadHub};
use crate::site::run_full_build;
use crate::{debug, log};

/// Worker threads for plain file requests.
const REQUEST_THREADS: usize = 4;

/// Build, then serve until Ctrl+C.
pub fn serve_site(config: Arc<SiteConfig>) -> Result<()> {
    let hub = Arc::new(ReloadHub::new(config.watch.reload_buffer));
    let bound = bind_server(&config)?;

    let coordinator = if config.serve.watch {
        Some(Coordinator::new(Arc::clone(&config), Arc::clone(&hub))?)
    } else {
        None
    };

    if let Err(e) = run_full_build(&config) {
        crate::logger::status_error("initial build failed", &format!("{e:#}"));
    }

    bound.run(config, hub, coordinator)
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server and hook it into the Ctrl+C handler.
pub fn bind_server(config: &SiteConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    register_server(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);
    if config.serve.watch {
        debug!("reload"; "events at http://{}{}", addr, EVENTS_PATH);
    }

    Ok(BoundServer {
        server,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Start the actors and the request loop (blocking until shutdown).
    pub fn run(
        self,
        config: Arc<SiteConfig>,
        hub: Arc<ReloadHub>,
        coordinator: Option<Coordinator>,
    ) -> Result<()> {
        let phase = coordinator.as_ref().map(Coordinator::phase);
        let actor_handle = lifecycle::spawn_actors(coordinator, self.shutdown_rx);

        let result = run_request_loop(&self.server, &config, &hub);

        // Ends every open event stream
        hub.close();
        if phase.is_some_and(|p| p.phase() == RebuildPhase::Rebuilding) {
            log!("serve"; "waiting for the running rebuild");
        }
        lifecycle::wait_for_shutdown(actor_handle);
        result
    }
}

fn run_request_loop(server: &Server, config: &Arc<SiteConfig>, hub: &ReloadHub) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .thread_name(|i| format!("serve-{i}"))
        .build()?;

    for request in server.incoming_requests() {
        if config.serve.watch && is_events_request(&request) {
            events::spawn_event_stream(request, hub, config.watch.keepalive());
            continue;
        }

        let config = Arc::clone(config);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config) {
                log!("serve"; "request error: {e}");
            }
        });
    }

    Ok(())
}

fn is_events_request(request: &Request) -> bool {
    path::url_path(request.url()) == EVENTS_PATH
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    if !response::is_read_request(&request) {
        return response::respond_method_not_allowed(request);
    }

    match path::resolve_path(request.url(), &config.build.output) {
        Some(file) => response::respond_file(request, &file, config.serve.watch),
        None => response::respond_not_found(request),
    }
}
