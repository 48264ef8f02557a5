//! Scripted Timelines - run a frame schedule against a PostureEngine
//!
//! Time is driven by a `ManualClock`: before each step the clock jumps to the
//! step's timestamp, and the engine is called with that clock's reading.

use std::time::Duration;

use postura_core::{Frame, MonoTime, Quality};
use postura_engine::{AlertSignal, EngineConfig, EngineStats, PostureEngine, PostureState, StatusRecord};
use postura_time::{Clock, ManualClock};

use crate::{NoiseModel, PoseSynth};

/// What the pose source delivers at one step
#[derive(Clone, Debug, PartialEq)]
pub enum Pose {
    /// Fully visible pose with this neck angle
    Angle(f64),
    /// Pose with this angle, one shoulder at the given visibility
    Dim(f64, f64),
    /// No keypoints at all
    Hidden,
    /// Verbatim frame
    Raw(Frame),
}

#[derive(Clone, Debug)]
struct Step {
    at: MonoTime,
    pose: Pose,
}

/// Engine state after one step
#[derive(Clone, Debug)]
pub struct Observation {
    pub at: MonoTime,
    pub record: StatusRecord,
    /// Signals emitted while handling this step
    pub signals: Vec<AlertSignal>,
    pub dwell: Duration,
}

/// A frame schedule plus the engine configuration to run it with
pub struct Scenario {
    config: EngineConfig,
    steps: Vec<Step>,
    synth: PoseSynth,
    /// Idle until this time after the last frame
    idle_until: Option<MonoTime>,
}

impl Scenario {
    pub fn new(config: EngineConfig) -> Self {
        let synth = PoseSynth::new(config.scheme);
        Scenario {
            config,
            steps: Vec::new(),
            synth,
            idle_until: None,
        }
    }

    pub fn with_noise(mut self, noise: NoiseModel, seed: u64) -> Self {
        self.synth = PoseSynth::new(self.config.scheme)
            .with_noise(noise)
            .with_seed(seed);
        self
    }

    /// One frame at `t_ms`
    pub fn at(mut self, t_ms: u64, pose: Pose) -> Self {
        self.steps.push(Step {
            at: MonoTime::from_millis(t_ms),
            pose,
        });
        self
    }

    /// Frames from `from_ms` to `to_ms` inclusive, every `step_ms`
    pub fn every(mut self, from_ms: u64, to_ms: u64, step_ms: u64, pose: Pose) -> Self {
        let mut t = from_ms;
        while t <= to_ms {
            self.steps.push(Step {
                at: MonoTime::from_millis(t),
                pose: pose.clone(),
            });
            t += step_ms.max(1);
        }
        self
    }

    /// Keep the timeline running, frame-less, until `t_ms`
    pub fn idle_until(mut self, t_ms: u64) -> Self {
        self.idle_until = Some(MonoTime::from_millis(t_ms));
        self
    }

    /// Run the schedule on a fresh engine
    ///
    /// Panics if the configuration is invalid; scenarios are test fixtures.
    pub fn run(mut self) -> ScenarioResult {
        let mut engine = match PostureEngine::with_config(self.config.clone()) {
            Ok(engine) => engine,
            Err(e) => panic!("scenario config rejected: {e}"),
        };
        let clock = ManualClock::new();

        // Later entries win ties so overrides can be appended
        self.steps.sort_by_key(|s| s.at);
        self.steps.dedup_by(|later, earlier| {
            if later.at == earlier.at {
                std::mem::swap(later, earlier);
                true
            } else {
                false
            }
        });

        let mut observations = Vec::with_capacity(self.steps.len());
        for step in std::mem::take(&mut self.steps) {
            clock.set(step.at);
            let frame = self.frame_for(&step.pose);
            let record = engine.process(&frame, clock.now());

            observations.push(Observation {
                at: step.at,
                record,
                signals: engine.drain_signals(),
                dwell: engine.state().poor_posture_duration(),
            });
        }

        let mut idle_signals = Vec::new();
        if let Some(end) = self.idle_until {
            clock.set(end);
            engine.poll(clock.now());
            idle_signals = engine.drain_signals();
        }

        ScenarioResult {
            observations,
            idle_signals,
            stats: engine.stats().clone(),
            final_state: engine.state().clone(),
            pending_auto_hide: engine.next_deadline(),
        }
    }

    fn frame_for(&mut self, pose: &Pose) -> Frame {
        match pose {
            Pose::Angle(angle) => self.synth.frame(*angle),
            Pose::Dim(angle, visibility) => self.synth.dim(*angle, *visibility),
            Pose::Hidden => self.synth.dropout(),
            Pose::Raw(frame) => frame.clone(),
        }
    }
}

/// Everything observed while running a scenario
#[derive(Clone, Debug)]
pub struct ScenarioResult {
    pub observations: Vec<Observation>,
    /// Signals emitted by the idle tail
    pub idle_signals: Vec<AlertSignal>,
    pub stats: EngineStats,
    pub final_state: PostureState,
    pub pending_auto_hide: Option<MonoTime>,
}

impl ScenarioResult {
    pub fn at(&self, t_ms: u64) -> Option<&Observation> {
        let t = MonoTime::from_millis(t_ms);
        self.observations.iter().find(|o| o.at == t)
    }

    pub fn titles(&self) -> Vec<&str> {
        self.observations
            .iter()
            .map(|o| o.record.title.as_str())
            .collect()
    }

    pub fn qualities(&self) -> Vec<Quality> {
        self.observations.iter().map(|o| o.record.quality).collect()
    }

    pub fn signals(&self) -> impl Iterator<Item = &AlertSignal> {
        self.observations
            .iter()
            .flat_map(|o| o.signals.iter())
            .chain(self.idle_signals.iter())
    }

    pub fn raises(&self) -> usize {
        self.signals().filter(|s| s.is_raise()).count()
    }

    pub fn hides(&self) -> usize {
        self.signals().filter(|s| !s.is_raise()).count()
    }
}

/// Predefined scenarios
pub mod scenarios {
    use super::*;

    /// Steady slouch at `angle`, one frame per second from 0 to `until_ms`
    pub fn sustained_slouch(angle: f64, until_ms: u64) -> Scenario {
        Scenario::new(EngineConfig::default()).every(0, until_ms, 1_000, Pose::Angle(angle))
    }

    /// Slouch with one upright frame at 5 s
    pub fn slouch_with_break() -> Scenario {
        sustained_slouch(150.0, 11_000).at(5_000, Pose::Angle(170.0))
    }

    /// 30 fps slouch with estimator jitter
    pub fn noisy_slouch(seed: u64) -> Scenario {
        Scenario::new(EngineConfig::default())
            .with_noise(NoiseModel::webcam(), seed)
            .every(0, 15_000, 33, Pose::Angle(145.0))
    }

    /// Slouch interrupted by the user leaving the frame for two seconds
    pub fn dropout_mid_slouch() -> Scenario {
        sustained_slouch(150.0, 20_000)
            .at(7_000, Pose::Hidden)
            .at(8_000, Pose::Dim(150.0, 0.3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_scheduled_step() {
        let result = scenarios::slouch_with_break().run();

        assert_eq!(result.observations.len(), 12);
        assert_eq!(result.at(5_000).unwrap().record.quality, Quality::Good);
    }

    #[test]
    fn test_noisy_slouch_still_alerts_once() {
        let result = scenarios::noisy_slouch(42).run();

        assert!(result.qualities().iter().all(|q| *q == Quality::Poor));
        assert_eq!(result.raises(), 1);

        let first_alert = result
            .observations
            .iter()
            .find(|o| o.record.alert_active)
            .unwrap();
        assert!(first_alert.at >= MonoTime::from_millis(10_000));
        assert!(first_alert.at < MonoTime::from_millis(10_033));
    }

    #[test]
    fn test_dropout_restarts_dwell() {
        let result = scenarios::dropout_mid_slouch().run();

        assert_eq!(result.at(7_000).unwrap().record.quality, Quality::Unknown);
        assert_eq!(result.at(8_000).unwrap().record.quality, Quality::Unknown);
        assert_eq!(result.at(9_000).unwrap().dwell, Duration::ZERO);

        // New streak from 9 s alerts at 19 s
        assert!(!result.at(18_000).unwrap().record.alert_active);
        assert!(result.at(19_000).unwrap().record.alert_active);
        assert_eq!(result.raises(), 1);
    }

    #[test]
    fn test_idle_tail_runs_auto_hide_check() {
        let result = scenarios::sustained_slouch(150.0, 10_000)
            .idle_until(20_000)
            .run();

        assert_eq!(result.stats.auto_hide_checks, 1);
        assert!(result.final_state.alert_shown());
        assert!(result.idle_signals.is_empty());
        assert_eq!(result.pending_auto_hide, None);
    }
}
