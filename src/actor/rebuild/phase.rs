use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Where the rebuild loop currently is.
///
/// ```text
/// Idle --event--> Debouncing --quiet--> Rebuilding --done--> Idle
/// ```
///
/// `Rebuilding` starts when the watcher hands a trigger off, not when the
/// worker picks it up, so the phase never drops to `Idle` in between.
/// Events during a rebuild start a new debounce in the background; the
/// phase still reports `Rebuilding` until every handed-off trigger is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildPhase {
    Idle,
    Debouncing,
    Rebuilding,
}

/// Phase shared between the watcher and the rebuild worker.
#[derive(Debug, Default)]
pub struct PhaseTracker {
    debouncing: AtomicBool,
    /// Triggers sent to the worker and not yet built
    pending: AtomicUsize,
}

impl PhaseTracker {
    pub fn phase(&self) -> RebuildPhase {
        if self.pending.load(Ordering::Acquire) > 0 {
            RebuildPhase::Rebuilding
        } else if self.debouncing.load(Ordering::Acquire) {
            RebuildPhase::Debouncing
        } else {
            RebuildPhase::Idle
        }
    }

    pub(crate) fn set_debouncing(&self, on: bool) {
        self.debouncing.store(on, Ordering::Release);
    }

    /// Debounce window closed; a trigger is on its way to the worker.
    pub(crate) fn hand_off(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
        self.debouncing.store(false, Ordering::Release);
    }

    /// The worker finished a cycle covering `triggers` handed-off triggers.
    pub(crate) fn complete(&self, triggers: usize) {
        let _ = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_sub(triggers))
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        let tracker = PhaseTracker::default();
        assert_eq!(tracker.phase(), RebuildPhase::Idle);

        tracker.set_debouncing(true);
        assert_eq!(tracker.phase(), RebuildPhase::Debouncing);

        // No Idle gap between the debounce and the build
        tracker.hand_off();
        assert_eq!(tracker.phase(), RebuildPhase::Rebuilding);

        // New burst while building: still reported as rebuilding
        tracker.set_debouncing(true);
        assert_eq!(tracker.phase(), RebuildPhase::Rebuilding);

        tracker.complete(1);
        assert_eq!(tracker.phase(), RebuildPhase::Debouncing);
    }

    #[test]
    fn test_merged_triggers_complete_together() {
        let tracker = PhaseTracker::default();
        tracker.hand_off();
        tracker.hand_off();

        tracker.complete(1);
        assert_eq!(tracker.phase(), RebuildPhase::Rebuilding);
        tracker.complete(1);
        assert_eq!(tracker.phase(), RebuildPhase::Idle);

        // Never underflows
        tracker.complete(3);
        assert_eq!(tracker.phase(), RebuildPhase::Idle);
    }
}
