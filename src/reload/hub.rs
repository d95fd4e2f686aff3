//! Reload signal fan-out.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;

/// "The output changed, reload."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadSignal;

struct Client {
    id: u64,
    tx: Sender<ReloadSignal>,
}

#[derive(Default)]
struct Registry {
    clients: Mutex<Vec<Client>>,
    next_id: AtomicU64,
}

impl Registry {
    fn fan_out(&self) {
        let mut clients = self.clients.lock();
        clients.retain(|client| match client.tx.try_send(ReloadSignal) {
            Ok(()) => true,
            // Client already has a reload pending
            Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        });
        crate::debug!("reload"; "signal delivered to {} client(s)", clients.len());
    }
}

/// Shared reload channel between the rebuild trigger and event streams.
///
/// `publish` never blocks: the queue holds at most `capacity` signals and
/// extra ones are dropped. A dispatcher thread drains the queue and copies
/// each signal into every subscriber's own bounded channel.
pub struct ReloadHub {
    tx: Mutex<Option<Sender<ReloadSignal>>>,
    registry: Arc<Registry>,
    capacity: usize,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl ReloadHub {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = channel::bounded(capacity);
        let registry = Arc::new(Registry::default());

        let dispatcher = {
            let registry = Arc::clone(&registry);
            std::thread::Builder::new()
                .name("reload-dispatch".into())
                .spawn(move || dispatch(rx, registry))
                .map_err(|e| crate::log!("error"; "failed to start reload dispatcher: {}", e))
                .ok()
        };

        Self {
            tx: Mutex::new(Some(tx)),
            registry,
            capacity,
            dispatcher: Mutex::new(dispatcher),
        }
    }

    /// Queue one reload signal. Returns `false` if it was dropped.
    pub fn publish(&self) -> bool {
        let Some(tx) = self.tx.lock().clone() else {
            return false;
        };
        match tx.try_send(ReloadSignal) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                crate::debug!("reload"; "queue full, signal dropped");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Register a new client. Only signals published from now on reach it.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = channel::bounded(self.capacity);
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        if self.tx.lock().is_some() {
            self.registry.clients.lock().push(Client { id, tx });
        }
        Subscription {
            id,
            rx,
            registry: Arc::clone(&self.registry),
        }
    }

    pub fn client_count(&self) -> usize {
        self.registry.clients.lock().len()
    }

    /// Stop the dispatcher and disconnect every subscriber.
    ///
    /// Open event streams observe the disconnect and finish.
    pub fn close(&self) {
        drop(self.tx.lock().take());
        if let Some(handle) = self.dispatcher.lock().take() {
            let _ = handle.join();
        }
        self.registry.clients.lock().clear();
    }
}

impl Drop for ReloadHub {
    fn drop(&mut self) {
        self.close();
    }
}

fn dispatch(rx: Receiver<ReloadSignal>, registry: Arc<Registry>) {
    for _signal in rx {
        registry.fan_out();
    }
    registry.clients.lock().clear();
}

/// One connected client's view of the hub. Unregisters on drop.
pub struct Subscription {
    id: u64,
    rx: Receiver<ReloadSignal>,
    registry: Arc<Registry>,
}

impl Subscription {
    /// Wait up to `timeout` for the next signal.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<ReloadSignal, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.clients.lock().retain(|c| c.id != self.id);
    }
}
