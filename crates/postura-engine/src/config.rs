//! Engine configuration

use std::time::Duration;

use postura_core::{LandmarkScheme, PosturaError, PosturaResult};
use serde::{Deserialize, Serialize};

use crate::Thresholds;

/// What the alert auto-hide re-check compares against
///
/// The check runs `auto_hide_delay` after an alert is raised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoHidePolicy {
    /// The check compares against a threshold that does not exist, so it
    /// never hides. Alerts clear only on a good/fair/unknown frame.
    #[default]
    Inert,
    /// Hide if the last angle is at or below the warning threshold.
    /// The next poor frame re-raises the alert.
    AtOrBelowWarning,
}

/// Posture engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Angle thresholds
    pub thresholds: Thresholds,
    /// Dwell time before a poor streak raises an alert
    #[serde(with = "duration_ms", rename = "warning_duration_ms")]
    pub warning_duration: Duration,
    /// Delay of the auto-hide re-check after an alert is raised
    #[serde(with = "duration_ms", rename = "auto_hide_delay_ms")]
    pub auto_hide_delay: Duration,
    /// Keypoints at or below this visibility count as missing
    pub min_visibility: f64,
    pub auto_hide_policy: AutoHidePolicy,
    /// Index layout of incoming frames
    pub scheme: LandmarkScheme,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            thresholds: Thresholds::default(),
            warning_duration: Duration::from_millis(10_000),
            auto_hide_delay: Duration::from_millis(5_000),
            min_visibility: 0.6,
            auto_hide_policy: AutoHidePolicy::Inert,
            scheme: LandmarkScheme::BlazePose33,
        }
    }
}

impl EngineConfig {
    /// Tighter thresholds and a shorter dwell
    pub fn strict() -> Self {
        EngineConfig {
            thresholds: Thresholds {
                good: 172.0,
                warning: 165.0,
                ..Default::default()
            },
            warning_duration: Duration::from_millis(5_000),
            ..Default::default()
        }
    }

    /// Looser thresholds and a longer dwell
    pub fn lenient() -> Self {
        EngineConfig {
            thresholds: Thresholds {
                good: 163.0,
                warning: 150.0,
                ..Default::default()
            },
            warning_duration: Duration::from_millis(20_000),
            ..Default::default()
        }
    }

    pub fn with_scheme(mut self, scheme: LandmarkScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_auto_hide_policy(mut self, policy: AutoHidePolicy) -> Self {
        self.auto_hide_policy = policy;
        self
    }

    pub fn validate(&self) -> PosturaResult<()> {
        self.thresholds.validate()?;

        if self.warning_duration.is_zero() {
            return Err(PosturaError::ZeroWarningDuration);
        }
        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(PosturaError::InvalidVisibility(self.min_visibility));
        }
        Ok(())
    }
}

/// Durations as integer milliseconds
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis().min(u64::MAX as u128) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
