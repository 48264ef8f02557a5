//! Deferred Timer - at most one pending action, evaluated on the caller's timeline
//!
//! There is no background thread. The owner asks `take_due(now)` whenever its
//! timeline advances; the payload is handed back once the deadline is reached.
//! Scheduling while a task is pending replaces it, so a stale task can never
//! fire after a newer one was scheduled.

use std::time::Duration;

use postura_core::MonoTime;

/// Handle identifying one scheduled task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

#[derive(Clone, Debug)]
struct Pending<T> {
    handle: TimerHandle,
    deadline: MonoTime,
    payload: T,
}

/// Single-slot cancellable timer
#[derive(Clone, Debug)]
pub struct DeferredTimer<T> {
    pending: Option<Pending<T>>,
    /// Next handle id
    next_id: u64,
    /// Tasks canceled or replaced before firing
    canceled: u64,
    /// Tasks that fired
    fired: u64,
}

impl<T> DeferredTimer<T> {
    pub fn new() -> Self {
        DeferredTimer {
            pending: None,
            next_id: 0,
            canceled: 0,
            fired: 0,
        }
    }

    /// Schedule `payload` at `now + delay`, replacing any pending task
    pub fn schedule(&mut self, now: MonoTime, delay: Duration, payload: T) -> TimerHandle {
        self.cancel();

        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending = Some(Pending {
            handle,
            deadline: now + delay,
            payload,
        });
        handle
    }

    /// Cancel the pending task, if any. Returns true if something was canceled.
    pub fn cancel(&mut self) -> bool {
        if self.pending.take().is_some() {
            self.canceled += 1;
            true
        } else {
            false
        }
    }

    /// Take the payload if its deadline is at or before `now`
    pub fn take_due(&mut self, now: MonoTime) -> Option<T> {
        match &self.pending {
            Some(p) if p.deadline <= now => {
                self.fired += 1;
                self.pending.take().map(|p| p.payload)
            }
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<MonoTime> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.pending.as_ref().map(|p| p.handle)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn canceled_count(&self) -> u64 {
        self.canceled
    }

    pub fn fired_count(&self) -> u64 {
        self.fired
    }
}

impl<T> Default for DeferredTimer<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fires_at_deadline() {
        let mut timer = DeferredTimer::new();
        timer.schedule(MonoTime::from_millis(1000), Duration::from_millis(5000), "hide");

        assert_eq!(timer.deadline(), Some(MonoTime::from_millis(6000)));
        assert_eq!(timer.take_due(MonoTime::from_millis(5999)), None);
        assert_eq!(timer.take_due(MonoTime::from_millis(6000)), Some("hide"));

        // Fires exactly once
        assert_eq!(timer.take_due(MonoTime::from_millis(9000)), None);
        assert_eq!(timer.fired_count(), 1);
    }

    #[test]
    fn test_schedule_replaces_pending() {
        let mut timer = DeferredTimer::new();
        let first = timer.schedule(MonoTime::ZERO, Duration::from_secs(5), 1);
        let second = timer.schedule(MonoTime::from_secs(2), Duration::from_secs(5), 2);

        assert_ne!(first, second);
        assert_eq!(timer.handle(), Some(second));
        assert_eq!(timer.canceled_count(), 1);

        // The first deadline passes without firing anything
        assert_eq!(timer.take_due(MonoTime::from_secs(5)), None);
        assert_eq!(timer.take_due(MonoTime::from_secs(7)), Some(2));
    }

    #[test]
    fn test_cancel() {
        let mut timer: DeferredTimer<()> = DeferredTimer::new();
        assert!(!timer.cancel());

        timer.schedule(MonoTime::ZERO, Duration::from_secs(1), ());
        assert!(timer.cancel());
        assert!(!timer.is_pending());
        assert_eq!(timer.take_due(MonoTime::from_secs(10)), None);
    }

    proptest! {
        #[test]
        fn prop_at_most_one_pending(ops in proptest::collection::vec((0u64..20_000, 0u64..10_000), 1..50)) {
            let mut timer = DeferredTimer::new();
            let mut last = None;
            for (now, delay) in ops {
                last = Some(timer.schedule(MonoTime::from_millis(now), Duration::from_millis(delay), now));
            }
            prop_assert_eq!(timer.handle(), last);
            prop_assert!(timer.take_due(MonoTime(u64::MAX)).is_some());
            prop_assert!(!timer.is_pending());
        }
    }
}
