//! Posture quality classes and their presentation hints

use serde::{Deserialize, Serialize};

/// Discretized posture quality for one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Good,
    Fair,
    Poor,
    /// Required keypoints missing or not confidently visible
    #[default]
    Unknown,
}

/// Overlay color a presentation layer should use for a quality
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityColor {
    Green,
    Yellow,
    Red,
    Neutral,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Good => "good",
            Quality::Fair => "fair",
            Quality::Poor => "poor",
            Quality::Unknown => "unknown",
        }
    }

    pub fn color(self) -> QualityColor {
        match self {
            Quality::Good => QualityColor::Green,
            Quality::Fair => QualityColor::Yellow,
            Quality::Poor => QualityColor::Red,
            Quality::Unknown => QualityColor::Neutral,
        }
    }

    /// Does this quality keep the dwell timer running?
    #[inline]
    pub fn is_poor(self) -> bool {
        self == Quality::Poor
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl QualityColor {
    /// CSS-style hex color
    pub fn hex(self) -> &'static str {
        match self {
            QualityColor::Green => "#22c55e",
            QualityColor::Yellow => "#eab308",
            QualityColor::Red => "#ef4444",
            QualityColor::Neutral => "#9ca3af",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors() {
        assert_eq!(Quality::Good.color(), QualityColor::Green);
        assert_eq!(Quality::Fair.color(), QualityColor::Yellow);
        assert_eq!(Quality::Poor.color(), QualityColor::Red);
        assert_eq!(Quality::Unknown.color(), QualityColor::Neutral);
    }

    #[test]
    fn test_serialized_lowercase() {
        assert_eq!(serde_json::to_string(&Quality::Fair).unwrap(), "\"fair\"");
        assert_eq!(Quality::Unknown.to_string(), "unknown");
    }
}
