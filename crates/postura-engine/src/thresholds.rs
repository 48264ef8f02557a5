//! Angle thresholds and quality classification

use postura_core::{PosturaError, PosturaResult, Quality};
use serde::{Deserialize, Serialize};

/// Neck-angle thresholds, in degrees, descending
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Reference only; never branched on
    pub perfect: f64,
    /// At or above: good
    pub good: f64,
    /// At or above (and below `good`): fair. Below: poor
    pub warning: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            perfect: 180.0,
            good: 168.0,
            warning: 160.0,
        }
    }
}

impl Thresholds {
    pub fn new(good: f64, warning: f64) -> PosturaResult<Self> {
        let thresholds = Thresholds {
            good,
            warning,
            ..Default::default()
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// INVARIANT: good > warning, both <= 180
    pub fn validate(&self) -> PosturaResult<()> {
        let ordered = self.good > self.warning;
        let bounded = self.good <= 180.0 && self.warning <= 180.0;
        if ordered && bounded && self.good.is_finite() && self.warning.is_finite() {
            Ok(())
        } else {
            Err(PosturaError::InvalidThresholds {
                good: self.good,
                warning: self.warning,
            })
        }
    }

    /// Discretize an angle. Never returns `Quality::Unknown`.
    pub fn classify(&self, angle: f64) -> Quality {
        if angle >= self.good {
            Quality::Good
        } else if angle >= self.warning {
            Quality::Fair
        } else {
            Quality::Poor
        }
    }
}
