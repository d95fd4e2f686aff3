use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::fs::FsActor;
use crate::actor::messages::RebuildMsg;
use crate::actor::rebuild::RebuildActor;

/// Grace period for an in-flight rebuild on shutdown.
const REBUILD_GRACE: Duration = Duration::from_millis(500);

/// Run all actors concurrently.
pub(super) async fn run_actors(
    fs: FsActor,
    rebuild: RebuildActor,
    rebuild_tx: mpsc::Sender<RebuildMsg>,
    shutdown_rx: Option<Receiver<()>>,
) -> Result<()> {
    let mut rebuild_handle = tokio::spawn(async move { rebuild.run().await });
    let mut fs_handle = tokio::spawn(async move { fs.run().await });
    let mut rebuild_done = false;

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            if fs_handle.is_finished() || rebuild_handle.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    } else {
        tokio::select! {
            _ = &mut fs_handle => {}
            _ = &mut rebuild_handle => rebuild_done = true,
        }
    }

    // Stop watching first so no new triggers arrive
    fs_handle.abort();

    if !rebuild_done {
        crate::debug!("actor"; "sending shutdown to rebuild");
        let _ = rebuild_tx.send(RebuildMsg::Shutdown).await;
        let _ = tokio::time::timeout(REBUILD_GRACE, rebuild_handle).await;
    }

    Ok(())
}
