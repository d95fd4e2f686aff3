//! FileSystem Actor
//!
//! Watches the source roots and sends one coalesced trigger per burst of
//! relevant changes to the RebuildActor. Implements the "Watcher-First"
//! pattern: the watcher is attached in [`FsActor::new`], before the initial
//! build, so edits made during that build are buffered rather than lost.
//!
//! Architecture:
//! ```text
//! Watcher → Classifier (relevance) → Debouncer (timing) → RebuildMsg
//! ```

use std::sync::Arc;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::messages::RebuildMsg;
use super::rebuild::PhaseTracker;
use crate::config::SiteConfig;

// Relevance filter (notify events -> change events).
mod classifier;
// Pure timing: one pending event, one deadline.
mod debouncer;
// Shared fs event types.
mod types;
// Watch root attach/re-attach lifecycle.
mod watch_roots;


use debouncer::Debouncer;
use watch_roots::WatchRoots;

pub use types::{ChangeEvent, ChangeKind, Trigger};
pub use watch_roots::WatchRoot;

/// Idle timer target; never reached in practice.
const FAR_FUTURE: std::time::Duration = std::time::Duration::from_secs(86400 * 365);

/// Capacity of the notify -> async bridge.
const EVENT_BUFFER: usize = 64;

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Watch-root consistency layer (attach/re-attach root directories)
    watch_roots: WatchRoots,
    /// Channel to send triggers to RebuildActor
    rebuild_tx: mpsc::Sender<RebuildMsg>,
    debouncer: Debouncer,
    config: Arc<SiteConfig>,
    phase: Arc<PhaseTracker>,
}

impl FsActor {
    /// Create a new FsActor with Watcher-First pattern
    ///
    /// The watcher starts immediately, buffering events while the caller
    /// performs the initial build.
    pub fn new(
        roots: Vec<WatchRoot>,
        rebuild_tx: mpsc::Sender<RebuildMsg>,
        config: Arc<SiteConfig>,
        phase: Arc<PhaseTracker>,
    ) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        // Missing roots are attached later, once they appear
        let mut watch_roots = WatchRoots::new(roots);
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            rebuild_tx,
            debouncer: Debouncer::new(config.watch.debounce()),
            config,
            phase,
        })
    }

    /// Run the actor event loop until the RebuildActor goes away.
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut watch_roots,
            rebuild_tx,
            debouncer,
            config,
            phase,
        } = self;

        let (async_tx, async_rx) = mpsc::channel::<notify::Event>(EVENT_BUFFER);

        // Bridge notify's std channel into tokio. Watch errors are logged and
        // never stop the loop.
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        let pipeline = ChangePipeline {
            config,
            debouncer,
            phase,
            rebuild_tx,
        };
        pipeline
            .run(async_rx, || watch_roots.maintain(&mut watcher))
            .await;

        crate::debug!("watch"; "stopped");
    }
}

/// Classify, debounce and forward. Separate from the watcher so the timing
/// can be driven by any event source.
struct ChangePipeline {
    config: Arc<SiteConfig>,
    debouncer: Debouncer,
    phase: Arc<PhaseTracker>,
    rebuild_tx: mpsc::Sender<RebuildMsg>,
}

impl ChangePipeline {
    async fn run(
        mut self,
        mut events: mpsc::Receiver<notify::Event>,
        mut on_raw_event: impl FnMut(),
    ) {
        // Single reusable timer, reset on every relevant event
        let timer = tokio::time::sleep(FAR_FUTURE);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                biased;
                event = events.recv() => {
                    let Some(event) = event else { break };
                    on_raw_event();
                    self.record(&event);
                    if let Some(deadline) = self.debouncer.deadline() {
                        timer.as_mut().reset(deadline);
                    }
                }
                () = &mut timer, if self.debouncer.is_armed() => {
                    let Some(trigger) = self.debouncer.fire(Instant::now()) else {
                        continue;
                    };
                    self.phase.hand_off();
                    log_trigger(&trigger, &self.config);
                    if self.rebuild_tx.send(RebuildMsg::Rebuild(trigger)).await.is_err() {
                        self.phase.complete(1);
                        break;
                    }
                }
            }
        }
    }

    fn record(&mut self, event: &notify::Event) {
        for change in classifier::classify(event, &self.config, Instant::now()) {
            crate::debug!("watch"; "{} changed: {}",
                change.kind.label(),
                self.config.root_relative(&change.path).display());
            self.debouncer.record(change);
            self.phase.set_debouncing(true);
        }
    }
}

fn log_trigger(trigger: &Trigger, config: &SiteConfig) {
    let path = config.root_relative(&trigger.path);
    if trigger.events > 1 {
        crate::log!("watch"; "{} changed (+{} more)", path.display(), trigger.events - 1);
    } else {
        crate::log!("watch"; "{} changed", path.display());
    }
}
