//! Keypoints and frames - what the pose estimator hands us
//!
//! Coordinates are normalized to the video frame: origin top-left, x to the
//! right, y downward, both nominally in [0, 1].

use serde::{Deserialize, Serialize};

/// Visibility assumed when the estimator does not report one
pub const FULL_VISIBILITY: f64 = 1.0;

/// 2D point in normalized frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Componentwise mean of two points
    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2 {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// One tracked landmark for one video frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    /// Detection confidence in [0, 1]; absent means fully visible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Keypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Visibility with the "absent means 1.0" rule applied
    #[inline]
    pub fn effective_visibility(&self) -> f64 {
        self.visibility.unwrap_or(FULL_VISIBILITY)
    }

    /// Strictly above `min` counts as visible
    #[inline]
    pub fn is_visible(&self, min: f64) -> bool {
        self.effective_visibility() > min
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// The four landmarks the posture engine reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landmark {
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
}

impl Landmark {
    pub fn all() -> &'static [Landmark] {
        &[
            Landmark::LeftEar,
            Landmark::RightEar,
            Landmark::LeftShoulder,
            Landmark::RightShoulder,
        ]
    }
}

/// Index layout of the pose estimator's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkScheme {
    /// BlazePose / MediaPipe Pose, 33 landmarks
    #[default]
    BlazePose33,
    /// COCO ordering used by MoveNet and friends, 17 keypoints
    Coco17,
}

impl LandmarkScheme {
    /// Frame index of a landmark under this scheme
    pub fn index(self, landmark: Landmark) -> usize {
        match (self, landmark) {
            (LandmarkScheme::BlazePose33, Landmark::LeftEar) => 7,
            (LandmarkScheme::BlazePose33, Landmark::RightEar) => 8,
            (LandmarkScheme::BlazePose33, Landmark::LeftShoulder) => 11,
            (LandmarkScheme::BlazePose33, Landmark::RightShoulder) => 12,
            (LandmarkScheme::Coco17, Landmark::LeftEar) => 3,
            (LandmarkScheme::Coco17, Landmark::RightEar) => 4,
            (LandmarkScheme::Coco17, Landmark::LeftShoulder) => 5,
            (LandmarkScheme::Coco17, Landmark::RightShoulder) => 6,
        }
    }

    /// Number of keypoints a full frame carries
    pub fn len(self) -> usize {
        match self {
            LandmarkScheme::BlazePose33 => 33,
            LandmarkScheme::Coco17 => 17,
        }
    }
}

/// All keypoints for one moment in time
///
/// Entries may be missing (`None`) when the estimator dropped a landmark;
/// frames may also be shorter than the scheme expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame {
    keypoints: Vec<Option<Keypoint>>,
}

impl Frame {
    pub fn new(keypoints: Vec<Option<Keypoint>>) -> Self {
        Self { keypoints }
    }

    /// Frame of `len` missing keypoints
    pub fn empty(len: usize) -> Self {
        Self {
            keypoints: vec![None; len],
        }
    }

    /// Frame containing only the four posture landmarks
    pub fn from_landmarks(
        scheme: LandmarkScheme,
        left_ear: Keypoint,
        right_ear: Keypoint,
        left_shoulder: Keypoint,
        right_shoulder: Keypoint,
    ) -> Self {
        let mut frame = Frame::empty(scheme.len());
        frame.set(scheme.index(Landmark::LeftEar), left_ear);
        frame.set(scheme.index(Landmark::RightEar), right_ear);
        frame.set(scheme.index(Landmark::LeftShoulder), left_shoulder);
        frame.set(scheme.index(Landmark::RightShoulder), right_shoulder);
        frame
    }

    /// Set a keypoint, growing the frame if needed
    pub fn set(&mut self, index: usize, keypoint: Keypoint) {
        if index >= self.keypoints.len() {
            self.keypoints.resize(index + 1, None);
        }
        self.keypoints[index] = Some(keypoint);
    }

    /// Remove a keypoint (marks it missing)
    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.keypoints.get_mut(index) {
            *slot = None;
        }
    }

    pub fn get(&self, index: usize) -> Option<&Keypoint> {
        self.keypoints.get(index).and_then(|kp| kp.as_ref())
    }

    pub fn landmark(&self, scheme: LandmarkScheme, landmark: Landmark) -> Option<&Keypoint> {
        self.get(scheme.index(landmark))
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    pub fn keypoints(&self) -> &[Option<Keypoint>] {
        &self.keypoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_defaults_to_full() {
        let kp = Keypoint::new(0.5, 0.5);
        assert_eq!(kp.effective_visibility(), 1.0);
        assert!(kp.is_visible(0.6));

        let dim = kp.with_visibility(0.6);
        assert!(!dim.is_visible(0.6));
    }

    #[test]
    fn test_from_landmarks_places_indices() {
        let ear = Keypoint::new(0.4, 0.3);
        let shoulder = Keypoint::new(0.4, 0.6);

        let frame = Frame::from_landmarks(LandmarkScheme::Coco17, ear, ear, shoulder, shoulder);
        assert_eq!(frame.len(), 17);
        assert_eq!(frame.get(3), Some(&ear));
        assert_eq!(frame.get(6), Some(&shoulder));
        assert!(frame.get(0).is_none());

        let frame = Frame::from_landmarks(LandmarkScheme::BlazePose33, ear, ear, shoulder, shoulder);
        assert_eq!(frame.len(), 33);
        assert_eq!(
            frame.landmark(LandmarkScheme::BlazePose33, Landmark::RightShoulder),
            Some(&shoulder)
        );
    }

    #[test]
    fn test_short_frame_reads_as_missing() {
        let frame = Frame::empty(4);
        assert!(frame
            .landmark(LandmarkScheme::BlazePose33, Landmark::LeftShoulder)
            .is_none());
    }

    #[test]
    fn test_frame_json_with_nulls() {
        let frame: Frame =
            serde_json::from_str(r#"[null, {"x": 0.1, "y": 0.2, "visibility": 0.9}, {"x": 0.3, "y": 0.4}]"#)
                .unwrap();

        assert_eq!(frame.len(), 3);
        assert!(frame.get(0).is_none());
        assert_eq!(frame.get(1).unwrap().visibility, Some(0.9));
        assert_eq!(frame.get(2).unwrap().visibility, None);
    }

    #[test]
    fn test_midpoint() {
        let m = Point2::new(0.2, 0.4).midpoint(&Point2::new(0.4, 0.8));
        assert!((m.x - 0.3).abs() < 1e-12);
        assert!((m.y - 0.6).abs() < 1e-12);
    }
}
