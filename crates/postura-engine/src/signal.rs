//! Alert signals - the engine's side effects, as data
//!
//! The engine queues signals instead of calling out. Whoever drives the
//! engine drains them and forwards them to an `AlertNotifier`.

use postura_core::MonoTime;
use serde::Serialize;

/// Why an alert was hidden
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HideReason {
    /// A good or fair frame arrived
    Recovered,
    /// Required keypoints were missing or not visible
    KeypointsLost,
    /// Poor, but the dwell time is below the alert threshold
    BelowDwell,
    /// The deferred re-check decided to hide
    AutoHide,
}

/// Raise/hide instruction for the notifier
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum AlertSignal {
    /// Show the banner and play the audible alert
    Raise { at: MonoTime, angle: f64 },
    /// Take the banner down
    Hide { at: MonoTime, reason: HideReason },
}

impl AlertSignal {
    pub fn is_raise(&self) -> bool {
        matches!(self, AlertSignal::Raise { .. })
    }

    pub fn at(&self) -> MonoTime {
        match self {
            AlertSignal::Raise { at, .. } | AlertSignal::Hide { at, .. } => *at,
        }
    }
}

/// Collaborator that renders alerts (banner, sound)
pub trait AlertNotifier {
    /// Raise both the visual and the audible alert
    fn raise(&mut self, at: MonoTime, angle: f64);

    /// Hide the visual alert
    fn hide(&mut self, at: MonoTime, reason: HideReason);

    fn notify(&mut self, signal: AlertSignal) {
        match signal {
            AlertSignal::Raise { at, angle } => self.raise(at, angle),
            AlertSignal::Hide { at, reason } => self.hide(at, reason),
        }
    }
}

/// Notifier that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl AlertNotifier for NullNotifier {
    fn raise(&mut self, _at: MonoTime, _angle: f64) {}

    fn hide(&mut self, _at: MonoTime, _reason: HideReason) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        raised: u32,
        hidden: Vec<HideReason>,
    }

    impl AlertNotifier for Counting {
        fn raise(&mut self, _at: MonoTime, _angle: f64) {
            self.raised += 1;
        }

        fn hide(&mut self, _at: MonoTime, reason: HideReason) {
            self.hidden.push(reason);
        }
    }

    #[test]
    fn test_notify_routes_signals() {
        let mut notifier = Counting::default();
        notifier.notify(AlertSignal::Raise {
            at: MonoTime::from_secs(10),
            angle: 150.0,
        });
        notifier.notify(AlertSignal::Hide {
            at: MonoTime::from_secs(12),
            reason: HideReason::Recovered,
        });

        assert_eq!(notifier.raised, 1);
        assert_eq!(notifier.hidden, vec![HideReason::Recovered]);
    }

    #[test]
    fn test_signal_json_shape() {
        let json = serde_json::to_value(AlertSignal::Hide {
            at: MonoTime::from_millis(1200),
            reason: HideReason::KeypointsLost,
        })
        .unwrap();

        assert_eq!(json["signal"], "hide");
        assert_eq!(json["at"], 1200);
        assert_eq!(json["reason"], "keypoints_lost");
    }
}
