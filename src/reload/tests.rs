use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::RecvTimeoutError;

use super::stream::{CONNECTED, KEEPALIVE, RELOAD};
use super::*;

const WAIT: Duration = Duration::from_secs(2);
const SHORT: Duration = Duration::from_millis(100);

fn close_after(hub: &Arc<ReloadHub>, delay: Duration) -> thread::JoinHandle<()> {
    let hub = Arc::clone(hub);
    thread::spawn(move || {
        thread::sleep(delay);
        hub.close();
    })
}

#[test]
fn test_signal_reaches_every_subscriber() {
    let hub = ReloadHub::new(10);
    let a = hub.subscribe();
    let b = hub.subscribe();

    assert!(hub.publish());
    assert_eq!(a.recv_timeout(WAIT), Ok(ReloadSignal));
    assert_eq!(b.recv_timeout(WAIT), Ok(ReloadSignal));
    assert_eq!(a.recv_timeout(SHORT), Err(RecvTimeoutError::Timeout));
}

#[test]
fn test_late_subscriber_gets_nothing_old() {
    let hub = ReloadHub::new(10);
    let early = hub.subscribe();
    hub.publish();
    assert!(early.recv_timeout(WAIT).is_ok());

    let late = hub.subscribe();
    assert_eq!(late.recv_timeout(SHORT), Err(RecvTimeoutError::Timeout));

    hub.publish();
    assert!(late.recv_timeout(WAIT).is_ok());
}

#[test]
fn test_slow_client_drops_extra_signals() {
    let hub = ReloadHub::new(1);
    let sub = hub.subscribe();

    for _ in 0..3 {
        hub.publish();
        thread::sleep(Duration::from_millis(30));
    }
    thread::sleep(SHORT);

    let mut received = 0;
    while sub.recv_timeout(SHORT).is_ok() {
        received += 1;
    }
    assert_eq!(received, 1);
}

#[test]
fn test_subscription_drop_unregisters() {
    let hub = ReloadHub::new(4);
    let a = hub.subscribe();
    let b = hub.subscribe();
    assert_eq!(hub.client_count(), 2);

    drop(a);
    assert_eq!(hub.client_count(), 1);
    drop(b);
    assert_eq!(hub.client_count(), 0);
}

#[test]
fn test_close_disconnects_and_stops_publish() {
    let hub = ReloadHub::new(4);
    let sub = hub.subscribe();
    hub.close();

    assert!(!hub.publish());
    assert_eq!(sub.recv_timeout(SHORT), Err(RecvTimeoutError::Disconnected));
}

#[test]
fn test_stream_writes_connected_then_reload() {
    let hub = Arc::new(ReloadHub::new(10));
    let sub = hub.subscribe();
    hub.publish();
    let closer = close_after(&hub, Duration::from_millis(200));

    let mut out = Vec::new();
    let reloads = stream_events(&mut out, &sub, Duration::from_secs(30)).unwrap();
    closer.join().unwrap();

    assert_eq!(reloads, 1);
    assert_eq!(out, [CONNECTED, RELOAD].concat());
}

#[test]
fn test_stream_keepalive_when_idle() {
    let hub = Arc::new(ReloadHub::new(10));
    let sub = hub.subscribe();
    let closer = close_after(&hub, Duration::from_millis(150));

    let mut out = Vec::new();
    let reloads = stream_events(&mut out, &sub, Duration::from_millis(20)).unwrap();
    closer.join().unwrap();

    assert_eq!(reloads, 0);
    assert!(out.starts_with(CONNECTED));
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(std::str::from_utf8(KEEPALIVE).unwrap()));
    assert!(!text.contains("reload"));
}

struct Disconnected;

impl Write for Disconnected {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_stream_ends_on_write_failure() {
    let hub = ReloadHub::new(4);
    let sub = hub.subscribe();
    let err = stream_events(&mut Disconnected, &sub, SHORT).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}
