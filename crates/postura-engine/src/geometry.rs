//! Neck geometry - angle between the ear midpoint and the shoulder midpoint
//!
//! The angle is measured against the vertical through the shoulders:
//! 180° means the ears sit straight above the shoulders, and forward head
//! tilt lowers the value. Direction of the tilt is discarded.

use postura_core::{Frame, Keypoint, Landmark, LandmarkScheme, Point2};

/// The four landmarks the angle is computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeckLandmarks {
    pub left_ear: Point2,
    pub right_ear: Point2,
    pub left_shoulder: Point2,
    pub right_shoulder: Point2,
}

impl NeckLandmarks {
    /// Extract the landmarks from a frame, or `None` if any is missing,
    /// not visible enough, or has a non-finite coordinate.
    ///
    /// A keypoint passes when its visibility is strictly above `min_visibility`.
    pub fn extract(frame: &Frame, scheme: LandmarkScheme, min_visibility: f64) -> Option<Self> {
        let pick = |landmark: Landmark| -> Option<Point2> {
            frame
                .landmark(scheme, landmark)
                .filter(|kp: &&Keypoint| kp.is_finite() && kp.is_visible(min_visibility))
                .map(|kp| kp.position())
        };

        Some(NeckLandmarks {
            left_ear: pick(Landmark::LeftEar)?,
            right_ear: pick(Landmark::RightEar)?,
            left_shoulder: pick(Landmark::LeftShoulder)?,
            right_shoulder: pick(Landmark::RightShoulder)?,
        })
    }

    /// Ear midpoint, smooths single-ear noise
    pub fn avg_ear(&self) -> Point2 {
        self.left_ear.midpoint(&self.right_ear)
    }

    /// Shoulder midpoint
    pub fn avg_shoulder(&self) -> Point2 {
        self.left_shoulder.midpoint(&self.right_shoulder)
    }

    /// Same landmarks with left and right swapped
    pub fn mirrored(&self) -> Self {
        NeckLandmarks {
            left_ear: self.right_ear,
            right_ear: self.left_ear,
            left_shoulder: self.right_shoulder,
            right_shoulder: self.left_shoulder,
        }
    }

    pub fn neck_angle(&self) -> f64 {
        neck_angle(self.avg_ear(), self.avg_shoulder())
    }
}

/// Neck angle in degrees, in [0, 180]
///
/// `dy` is flipped because image y grows downward. Total for finite input:
/// `atan2(0, 0)` is 0, so coincident midpoints read as upright.
pub fn neck_angle(avg_ear: Point2, avg_shoulder: Point2) -> f64 {
    let dx = avg_ear.x - avg_shoulder.x;
    let dy = avg_shoulder.y - avg_ear.y;

    let raw = dx.abs().atan2(dy).to_degrees();
    180.0 - raw.abs()
}
