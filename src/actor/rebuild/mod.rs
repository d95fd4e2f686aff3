//! Rebuild Actor - one site rebuild per coalesced trigger
//!
//! Consumes [`RebuildMsg`] from a single-consumer queue, so builds never
//! overlap. Template triggers run the configured regeneration command
//! first; a failing command aborts the cycle and leaves the output alone.
//! A successful build publishes one reload signal.

mod phase;


use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use super::fs::{ChangeKind, Trigger};
use super::messages::RebuildMsg;
use crate::config::SiteConfig;
use crate::logger::{status_detach, status_error, status_success};
use crate::reload::ReloadHub;
use crate::site::run_full_build;
use crate::utils::exec::Cmd;
use crate::utils::plural_count;

pub use phase::{PhaseTracker, RebuildPhase};

/// Result of one rebuild cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Output rewritten and reload published
    Rebuilt,
    /// Regeneration failed; build skipped
    RegenerateFailed,
    /// Build failed; output may be partial
    BuildFailed,
}

/// Coalesced work for one cycle.
struct Batch {
    trigger: Trigger,
    /// Queue messages folded into `trigger`
    triggers: usize,
    /// A `Shutdown` was queued behind the batch
    stop: bool,
}

pub struct RebuildActor {
    rx: mpsc::Receiver<RebuildMsg>,
    config: Arc<SiteConfig>,
    hub: Arc<ReloadHub>,
    phase: Arc<PhaseTracker>,
}

impl RebuildActor {
    pub fn new(
        rx: mpsc::Receiver<RebuildMsg>,
        config: Arc<SiteConfig>,
        hub: Arc<ReloadHub>,
        phase: Arc<PhaseTracker>,
    ) -> Self {
        Self {
            rx,
            config,
            hub,
            phase,
        }
    }

    /// Main loop. Returns on `Shutdown` or when every sender is gone.
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            let RebuildMsg::Rebuild(trigger) = msg else {
                break;
            };

            let batch = self.drain_queued(trigger);
            self.rebuild(&batch.trigger).await;
            self.phase.complete(batch.triggers);
            if batch.stop {
                break;
            }
        }

        crate::debug!("rebuild"; "stopped");
    }

    /// Fold triggers that queued up during the previous build into one.
    ///
    /// A template change anywhere in the batch keeps the regeneration step.
    fn drain_queued(&mut self, mut trigger: Trigger) -> Batch {
        let mut triggers = 1;
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                RebuildMsg::Rebuild(next) => {
                    triggers += 1;
                    let kind = if trigger.kind == ChangeKind::Template {
                        ChangeKind::Template
                    } else {
                        next.kind
                    };
                    trigger = Trigger {
                        kind,
                        path: next.path,
                        events: trigger.events + next.events,
                    };
                }
                RebuildMsg::Shutdown => {
                    return Batch {
                        trigger,
                        triggers,
                        stop: true,
                    };
                }
            }
        }
        Batch {
            trigger,
            triggers,
            stop: false,
        }
    }

    /// Run one cycle: optional regeneration, full build, reload.
    pub async fn rebuild(&self, trigger: &Trigger) -> CycleOutcome {
        // Watch lines were printed since the last status; never overwrite them
        status_detach();
        let start = Instant::now();

        if trigger.kind == ChangeKind::Template && !self.config.build.regenerate.is_empty() {
            let config = Arc::clone(&self.config);
            let result = tokio::task::spawn_blocking(move || regenerate(&config))
                .await
                .map_err(anyhow::Error::from)
                .and_then(|r| r);
            if let Err(e) = result {
                status_error("regenerate failed, output unchanged", &format!("{e:#}"));
                return CycleOutcome::RegenerateFailed;
            }
        }

        let config = Arc::clone(&self.config);
        let result = tokio::task::spawn_blocking(move || run_full_build(&config))
            .await
            .map_err(anyhow::Error::from)
            .and_then(|r| r);

        match result {
            Ok(tree) => {
                let delivered = self.hub.publish();
                crate::debug!("reload"; "signal {} for {}",
                    if delivered { "queued" } else { "dropped" },
                    plural_count(self.hub.client_count(), "client"));
                status_success(&format!(
                    "rebuilt {} in {:.0?}",
                    plural_count(tree.page_count(), "page"),
                    start.elapsed()
                ));
                CycleOutcome::Rebuilt
            }
            Err(e) => {
                status_error("build failed", &format!("{e:#}"));
                CycleOutcome::BuildFailed
            }
        }
    }
}

/// Run `[build] regenerate` in the project root.
fn regenerate(config: &SiteConfig) -> anyhow::Result<()> {
    crate::debug!("rebuild"; "running {}", config.build.regenerate.join(" "));
    Cmd::from_slice(config.build.regenerate.as_slice())
        .cwd(config.get_root())
        .run()?;
    Ok(())
}
