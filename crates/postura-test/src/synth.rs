//! Pose Synthesis - frames with a known neck angle
//!
//! Shoulders sit level around a fixed center; the ear midpoint is placed
//! `neck_length` above them and shifted sideways by `neck_length * tan(180° - angle)`.

use postura_core::{Frame, Keypoint, LandmarkScheme, Point2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-keypoint positional noise
#[derive(Clone, Copy, Debug)]
pub struct NoiseModel {
    /// Maximum displacement per coordinate, in normalized units
    pub amplitude: f64,
}

impl NoiseModel {
    pub fn none() -> Self {
        NoiseModel { amplitude: 0.0 }
    }

    /// Typical estimator jitter at webcam resolution
    pub fn webcam() -> Self {
        NoiseModel { amplitude: 0.003 }
    }

    /// Noisy estimator, low light
    pub fn shaky() -> Self {
        NoiseModel { amplitude: 0.01 }
    }

    fn apply(&self, p: Point2, rng: &mut StdRng) -> Point2 {
        if self.amplitude <= 0.0 {
            return p;
        }
        Point2::new(
            p.x + rng.gen_range(-self.amplitude..=self.amplitude),
            p.y + rng.gen_range(-self.amplitude..=self.amplitude),
        )
    }
}

/// Generator of synthetic pose frames
pub struct PoseSynth {
    scheme: LandmarkScheme,
    shoulder_center: Point2,
    shoulder_half_width: f64,
    ear_half_width: f64,
    /// Vertical ear-to-shoulder distance
    neck_length: f64,
    visibility: Option<f64>,
    noise: NoiseModel,
    rng: StdRng,
}

impl PoseSynth {
    pub fn new(scheme: LandmarkScheme) -> Self {
        PoseSynth {
            scheme,
            shoulder_center: Point2::new(0.5, 0.6),
            shoulder_half_width: 0.15,
            ear_half_width: 0.04,
            neck_length: 0.2,
            visibility: Some(0.95),
            noise: NoiseModel::none(),
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = noise;
        self
    }

    /// `None` leaves visibility unreported
    pub fn with_visibility(mut self, visibility: Option<f64>) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn scheme(&self) -> LandmarkScheme {
        self.scheme
    }

    /// Frame with the given neck angle, head leaning forward (to +x)
    pub fn frame(&mut self, angle: f64) -> Frame {
        self.leaning(angle, true)
    }

    /// Frame with the given neck angle, leaning to +x or -x
    pub fn leaning(&mut self, angle: f64, forward: bool) -> Frame {
        let visibility = self.visibility;
        self.build(angle, forward, visibility)
    }

    /// Frame whose right shoulder reports `visibility`
    pub fn dim(&mut self, angle: f64, visibility: f64) -> Frame {
        let mut frame = self.frame(angle);
        let index = self
            .scheme
            .index(postura_core::Landmark::RightShoulder);
        if let Some(kp) = frame.get(index).copied() {
            frame.set(index, kp.with_visibility(visibility));
        }
        frame
    }

    /// Frame with every keypoint missing
    pub fn dropout(&self) -> Frame {
        Frame::empty(self.scheme.len())
    }

    fn build(&mut self, angle: f64, forward: bool, visibility: Option<f64>) -> Frame {
        let offset = self.neck_length * (180.0 - angle).to_radians().tan();
        let sign = if forward { 1.0 } else { -1.0 };

        let ear_center = Point2::new(
            self.shoulder_center.x + sign * offset,
            self.shoulder_center.y - self.neck_length,
        );

        let left_ear = Point2::new(ear_center.x - self.ear_half_width, ear_center.y);
        let right_ear = Point2::new(ear_center.x + self.ear_half_width, ear_center.y);
        let left_shoulder = Point2::new(
            self.shoulder_center.x - self.shoulder_half_width,
            self.shoulder_center.y,
        );
        let right_shoulder = Point2::new(
            self.shoulder_center.x + self.shoulder_half_width,
            self.shoulder_center.y,
        );

        let noise = self.noise;
        let rng = &mut self.rng;
        let mut keypoint = |p: Point2| {
            let p = noise.apply(p, rng);
            let kp = Keypoint::new(p.x, p.y);
            match visibility {
                Some(v) => kp.with_visibility(v),
                None => kp,
            }
        };

        Frame::from_landmarks(
            self.scheme,
            keypoint(left_ear),
            keypoint(right_ear),
            keypoint(left_shoulder),
            keypoint(right_shoulder),
        )
    }
}

impl Default for PoseSynth {
    fn default() -> Self {
        Self::new(LandmarkScheme::BlazePose33)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postura_engine::NeckLandmarks;

    fn angle_of(frame: &Frame, scheme: LandmarkScheme) -> f64 {
        NeckLandmarks::extract(frame, scheme, 0.6)
            .expect("all landmarks visible")
            .neck_angle()
    }

    #[test]
    fn test_exact_angles() {
        let mut synth = PoseSynth::default();
        for angle in [180.0, 172.5, 168.0, 160.0, 150.0, 120.0] {
            let frame = synth.frame(angle);
            assert!((angle_of(&frame, synth.scheme()) - angle).abs() < 1e-9);
        }
    }

    #[test]
    fn test_lean_direction_symmetric() {
        let mut synth = PoseSynth::new(LandmarkScheme::Coco17);
        let forward = synth.leaning(155.0, true);
        let backward = synth.leaning(155.0, false);
        assert!(
            (angle_of(&forward, LandmarkScheme::Coco17) - angle_of(&backward, LandmarkScheme::Coco17))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_noise_is_seeded() {
        let mut a = PoseSynth::default().with_noise(NoiseModel::shaky()).with_seed(7);
        let mut b = PoseSynth::default().with_noise(NoiseModel::shaky()).with_seed(7);

        for _ in 0..10 {
            assert_eq!(a.frame(150.0), b.frame(150.0));
        }
    }

    #[test]
    fn test_dim_and_dropout() {
        let mut synth = PoseSynth::default();
        let dim = synth.dim(170.0, 0.4);
        assert!(NeckLandmarks::extract(&dim, synth.scheme(), 0.6).is_none());

        let gone = synth.dropout();
        assert_eq!(gone.len(), 33);
        assert!(NeckLandmarks::extract(&gone, synth.scheme(), 0.6).is_none());
    }
}
