use std::time::Duration;

use tokio::time::Instant;

use super::types::{ChangeEvent, Trigger};

/// Pure debouncer: one pending event, one deadline.
///
/// Every recorded event replaces the pending one and pushes the deadline to
/// `event.at + window`, so a burst fires once, after it settles, carrying the
/// most recent classification.
#[derive(Debug)]
pub(super) struct Debouncer {
    window: Duration,
    latest: Option<ChangeEvent>,
    deadline: Option<Instant>,
    /// Events folded into the pending trigger
    count: usize,
}

impl Debouncer {
    pub(super) fn new(window: Duration) -> Self {
        Self {
            window,
            latest: None,
            deadline: None,
            count: 0,
        }
    }

    /// Arm, or reset, the timer for `event`.
    pub(super) fn record(&mut self, event: ChangeEvent) {
        self.deadline = Some(event.at + self.window);
        self.latest = Some(event);
        self.count += 1;
    }

    /// Take the pending trigger if the quiet period has elapsed.
    pub(super) fn fire(&mut self, now: Instant) -> Option<Trigger> {
        if self.deadline.is_none_or(|deadline| now < deadline) {
            return None;
        }

        self.deadline = None;
        let events = std::mem::take(&mut self.count);
        self.latest.take().map(|event| Trigger {
            kind: event.kind,
            path: event.path,
            events,
        })
    }

    pub(super) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub(super) fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}
