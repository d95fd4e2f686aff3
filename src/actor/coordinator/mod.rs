//! Actor Coordinator - Wires up the Rebuild Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates the trigger channel
//! - Attaches the watcher (Watcher-First, in [`Coordinator::new`])
//! - Runs both actors until shutdown

mod runtime;
mod watch_paths;


use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::RebuildMsg;
use super::rebuild::{PhaseTracker, RebuildActor};
use crate::config::SiteConfig;
use crate::reload::ReloadHub;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    fs: FsActor,
    rebuild: RebuildActor,
    rebuild_tx: mpsc::Sender<RebuildMsg>,
    phase: Arc<PhaseTracker>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// Attach the watcher and wire the actors.
    ///
    /// Call before the initial build: changes made while it runs are
    /// buffered and handled once [`run`](Self::run) starts.
    pub fn new(config: Arc<SiteConfig>, hub: Arc<ReloadHub>) -> Result<Self> {
        let (rebuild_tx, rebuild_rx) = mpsc::channel::<RebuildMsg>(CHANNEL_BUFFER);
        let phase = Arc::new(PhaseTracker::default());

        let roots = watch_paths::collect_watch_roots(&config);
        let fs = FsActor::new(
            roots,
            rebuild_tx.clone(),
            Arc::clone(&config),
            Arc::clone(&phase),
        )
        .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;

        let rebuild = RebuildActor::new(rebuild_rx, config, hub, Arc::clone(&phase));

        Ok(Self {
            fs,
            rebuild,
            rebuild_tx,
            phase,
            shutdown_rx: None,
        })
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Shared view of the rebuild loop's phase.
    pub fn phase(&self) -> Arc<PhaseTracker> {
        Arc::clone(&self.phase)
    }

    /// Run the actor system.
    pub async fn run(self) -> Result<()> {
        crate::debug!("actor"; "start");
        runtime::run_actors(self.fs, self.rebuild, self.rebuild_tx, self.shutdown_rx).await?;
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
