//! Alert notifiers provided by the runtime

use std::sync::Arc;

use parking_lot::Mutex;
use postura_core::MonoTime;
use postura_engine::{AlertNotifier, AlertSignal, HideReason};
use tracing::{info, warn};

/// Notifier that reports alerts through tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl AlertNotifier for LogNotifier {
    fn raise(&mut self, at: MonoTime, angle: f64) {
        warn!(at = ?at, angle = angle.round(), "POSTURE ALERT: straighten up");
    }

    fn hide(&mut self, at: MonoTime, reason: HideReason) {
        info!(at = ?at, ?reason, "posture alert cleared");
    }
}

/// Notifier that records every signal; clones share the same log
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    signals: Arc<Mutex<Vec<AlertSignal>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<AlertSignal> {
        self.signals.lock().clone()
    }

    pub fn raised(&self) -> usize {
        self.signals.lock().iter().filter(|s| s.is_raise()).count()
    }

    pub fn hidden(&self) -> usize {
        self.signals.lock().iter().filter(|s| !s.is_raise()).count()
    }
}

impl AlertNotifier for RecordingNotifier {
    fn raise(&mut self, at: MonoTime, angle: f64) {
        self.signals.lock().push(AlertSignal::Raise { at, angle });
    }

    fn hide(&mut self, at: MonoTime, reason: HideReason) {
        self.signals.lock().push(AlertSignal::Hide { at, reason });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_clones_share_log() {
        let recorder = RecordingNotifier::new();
        let mut handle = recorder.clone();

        handle.raise(MonoTime::from_secs(10), 150.0);
        handle.hide(MonoTime::from_secs(12), HideReason::Recovered);

        assert_eq!(recorder.raised(), 1);
        assert_eq!(recorder.hidden(), 1);
        assert_eq!(recorder.signals().len(), 2);
    }
}
