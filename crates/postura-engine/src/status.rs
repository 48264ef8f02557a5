//! Status records - what the presentation layer renders for one frame

use std::time::Duration;

use postura_core::{Quality, QualityColor};
use serde::Serialize;

pub const TITLE_UNKNOWN: &str = "Keypoints not visible";
pub const SUBTITLE_UNKNOWN: &str = "Position yourself within the frame";
pub const TITLE_GOOD: &str = "Excellent Posture!";
pub const TITLE_FAIR: &str = "Fair Posture";
pub const TITLE_POOR: &str = "Poor Posture Detected";
pub const TITLE_ALERT: &str = "Poor Posture Alert!";

/// Dwell timer as shown to the user
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TimerDisplay {
    pub visible: bool,
    /// Whole seconds of dwell so far
    pub seconds: u64,
    /// Fraction of the warning duration elapsed, in [0, 1]
    pub progress: f64,
}

impl TimerDisplay {
    pub fn hidden() -> Self {
        TimerDisplay::default()
    }

    pub fn for_dwell(duration: Duration, warning_duration: Duration) -> Self {
        let progress = duration.as_secs_f64() / warning_duration.as_secs_f64();
        TimerDisplay {
            visible: true,
            seconds: duration.as_secs(),
            progress: progress.min(1.0),
        }
    }
}

/// Result of processing one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusRecord {
    pub quality: Quality,
    /// Last known neck angle; stale when `quality` is unknown
    pub angle_degrees: Option<f64>,
    pub title: String,
    pub subtitle: String,
    pub timer: TimerDisplay,
    /// Countdown to the alert, only while a poor streak is running
    pub seconds_remaining: Option<u64>,
    pub alert_active: bool,
}

impl StatusRecord {
    pub fn unknown(last_angle: Option<f64>) -> Self {
        StatusRecord {
            quality: Quality::Unknown,
            angle_degrees: last_angle,
            title: TITLE_UNKNOWN.to_string(),
            subtitle: SUBTITLE_UNKNOWN.to_string(),
            timer: TimerDisplay::hidden(),
            seconds_remaining: None,
            alert_active: false,
        }
    }

    pub fn good(angle: f64) -> Self {
        Self::settled(Quality::Good, TITLE_GOOD, angle)
    }

    pub fn fair(angle: f64) -> Self {
        Self::settled(Quality::Fair, TITLE_FAIR, angle)
    }

    fn settled(quality: Quality, title: &str, angle: f64) -> Self {
        StatusRecord {
            quality,
            angle_degrees: Some(angle),
            title: title.to_string(),
            subtitle: angle_label(angle),
            timer: TimerDisplay::hidden(),
            seconds_remaining: None,
            alert_active: false,
        }
    }

    /// Poor, alert not yet due
    pub fn poor_warming(angle: f64, timer: TimerDisplay, seconds_remaining: u64) -> Self {
        StatusRecord {
            quality: Quality::Poor,
            angle_degrees: Some(angle),
            title: TITLE_POOR.to_string(),
            subtitle: format!("{} - Alert in {}s", angle_label(angle), seconds_remaining),
            timer,
            seconds_remaining: Some(seconds_remaining),
            alert_active: false,
        }
    }

    /// Poor for at least the warning duration
    pub fn poor_alerting(angle: f64, timer: TimerDisplay, alert_active: bool) -> Self {
        StatusRecord {
            quality: Quality::Poor,
            angle_degrees: Some(angle),
            title: TITLE_ALERT.to_string(),
            subtitle: format!("{} - Straighten up now!", angle_label(angle)),
            timer,
            seconds_remaining: Some(0),
            alert_active,
        }
    }

    pub fn color(&self) -> QualityColor {
        self.quality.color()
    }

    /// Angle rounded for display
    pub fn rounded_angle(&self) -> Option<i64> {
        self.angle_degrees.map(round_degrees)
    }
}

/// Round half away from zero, matching how the angle is shown
pub fn round_degrees(angle: f64) -> i64 {
    angle.round() as i64
}

fn angle_label(angle: f64) -> String {
    format!("Neck angle: {}°", round_degrees(angle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitles() {
        assert_eq!(StatusRecord::good(171.6).subtitle, "Neck angle: 172°");
        assert_eq!(StatusRecord::fair(163.2).subtitle, "Neck angle: 163°");

        let timer = TimerDisplay::for_dwell(Duration::from_millis(3_500), Duration::from_secs(10));
        let warming = StatusRecord::poor_warming(150.4, timer, 7);
        assert_eq!(warming.subtitle, "Neck angle: 150° - Alert in 7s");

        let alert = StatusRecord::poor_alerting(149.5, timer, true);
        assert_eq!(alert.subtitle, "Neck angle: 150° - Straighten up now!");
    }

    #[test]
    fn test_timer_display() {
        let warning = Duration::from_secs(10);

        let t = TimerDisplay::for_dwell(Duration::from_millis(3_999), warning);
        assert!(t.visible);
        assert_eq!(t.seconds, 3);
        assert!((t.progress - 0.3999).abs() < 1e-9);

        let t = TimerDisplay::for_dwell(Duration::from_secs(25), warning);
        assert_eq!(t.seconds, 25);
        assert_eq!(t.progress, 1.0);
    }

    #[test]
    fn test_unknown_keeps_stale_angle() {
        let record = StatusRecord::unknown(Some(158.0));
        assert_eq!(record.quality, Quality::Unknown);
        assert_eq!(record.angle_degrees, Some(158.0));
        assert_eq!(record.color(), QualityColor::Neutral);
        assert!(!record.timer.visible);
    }
}
