//! Posture state carried between frames

use std::time::Duration;

use postura_core::MonoTime;

/// Dwell and alert state of one engine
///
/// Owned by `PostureEngine`; mutated only from `process`/`poll`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostureState {
    /// Last computed angle; `None` until a frame passed the visibility gate.
    /// Left untouched by frames that fail the gate.
    pub(crate) current_neck_angle: Option<f64>,
    /// Start of the current poor streak
    pub(crate) poor_posture_start: Option<MonoTime>,
    /// Zero whenever `poor_posture_start` is unset
    pub(crate) poor_posture_duration: Duration,
    pub(crate) alert_shown: bool,
}

impl PostureState {
    pub fn current_neck_angle(&self) -> Option<f64> {
        self.current_neck_angle
    }

    pub fn poor_posture_start(&self) -> Option<MonoTime> {
        self.poor_posture_start
    }

    pub fn poor_posture_duration(&self) -> Duration {
        self.poor_posture_duration
    }

    pub fn alert_shown(&self) -> bool {
        self.alert_shown
    }

    pub fn in_poor_streak(&self) -> bool {
        self.poor_posture_start.is_some()
    }

    /// End any poor streak
    pub(crate) fn clear_streak(&mut self) {
        self.poor_posture_start = None;
        self.poor_posture_duration = Duration::ZERO;
    }
}
