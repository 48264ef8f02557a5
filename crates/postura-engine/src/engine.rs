//! Posture Engine - classification, dwell timing and alert state

use std::collections::VecDeque;
use std::time::Duration;

use postura_core::{Frame, MonoTime, PosturaResult, Quality};
use postura_time::DeferredTimer;
use tracing::{debug, info, trace};

use crate::{
    AlertNotifier, AlertSignal, AutoHidePolicy, EngineConfig, HideReason, NeckLandmarks,
    PostureState, StatusRecord, TimerDisplay,
};

/// Counters for one engine
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub frames: u64,
    pub unknown_frames: u64,
    pub poor_streaks: u64,
    pub alerts_raised: u64,
    pub alerts_hidden: u64,
    pub auto_hide_checks: u64,
}

/// Payload of the deferred auto-hide re-check
#[derive(Clone, Copy, Debug)]
struct AutoHideCheck {
    deadline: MonoTime,
}

/// Posture Engine - turns per-frame keypoints into a debounced status
///
/// Calls must be sequential with non-decreasing timestamps. A timestamp that
/// goes backwards inside a poor streak reads as zero dwell.
pub struct PostureEngine {
    config: EngineConfig,
    state: PostureState,
    /// At most one pending auto-hide
    auto_hide: DeferredTimer<AutoHideCheck>,
    /// Alert signals not yet handed to a notifier
    signals: VecDeque<AlertSignal>,
    /// Quality of the previous frame, for transition logging
    last_quality: Quality,
    stats: EngineStats,
}

impl PostureEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Create an engine with a validated custom configuration
    pub fn with_config(config: EngineConfig) -> PosturaResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        PostureEngine {
            config,
            state: PostureState::default(),
            auto_hide: DeferredTimer::new(),
            signals: VecDeque::new(),
            last_quality: Quality::Unknown,
            stats: EngineStats::default(),
        }
    }

    /// Process one frame observed at `now`
    ///
    /// Never fails: frames without the four required keypoints yield an
    /// unknown status and end any poor streak.
    pub fn process(&mut self, frame: &Frame, now: MonoTime) -> StatusRecord {
        // Deferred work due before this frame runs first
        self.poll(now);
        self.stats.frames += 1;

        let landmarks =
            NeckLandmarks::extract(frame, self.config.scheme, self.config.min_visibility);
        let Some(landmarks) = landmarks else {
            self.stats.unknown_frames += 1;
            self.note_quality(Quality::Unknown, now);
            self.reset(now, HideReason::KeypointsLost);
            return StatusRecord::unknown(self.state.current_neck_angle);
        };

        let angle = landmarks.neck_angle();
        self.state.current_neck_angle = Some(angle);

        let quality = self.config.thresholds.classify(angle);
        self.note_quality(quality, now);
        trace!(?now, angle, %quality, "frame classified");

        if quality.is_poor() {
            return self.classify_poor(angle, now);
        }

        self.reset(now, HideReason::Recovered);
        if quality == Quality::Good {
            StatusRecord::good(angle)
        } else {
            StatusRecord::fair(angle)
        }
    }

    /// Advance the timeline to `now` without a frame.
    /// Returns true if the auto-hide re-check ran.
    pub fn poll(&mut self, now: MonoTime) -> bool {
        let Some(check) = self.auto_hide.take_due(now) else {
            return false;
        };
        self.stats.auto_hide_checks += 1;

        match self.config.auto_hide_policy {
            AutoHidePolicy::Inert => {
                debug!(at = ?check.deadline, "auto-hide check: nothing to compare, alert kept");
            }
            AutoHidePolicy::AtOrBelowWarning => {
                let warning = self.config.thresholds.warning;
                if self
                    .state
                    .current_neck_angle
                    .is_some_and(|angle| angle <= warning)
                {
                    self.hide_alert(check.deadline, HideReason::AutoHide);
                }
            }
        }
        true
    }

    /// Cancel pending deferred work; call when the frame source stops
    pub fn shutdown(&mut self) {
        if self.auto_hide.cancel() {
            debug!("pending auto-hide canceled on shutdown");
        }
    }

    /// Deadline of the pending auto-hide, if any
    pub fn next_deadline(&self) -> Option<MonoTime> {
        self.auto_hide.deadline()
    }

    /// Take all queued alert signals, oldest first
    pub fn drain_signals(&mut self) -> Vec<AlertSignal> {
        self.signals.drain(..).collect()
    }

    /// Forward queued alert signals to a notifier. Returns how many were sent.
    pub fn dispatch<N: AlertNotifier + ?Sized>(&mut self, notifier: &mut N) -> usize {
        let mut sent = 0;
        while let Some(signal) = self.signals.pop_front() {
            notifier.notify(signal);
            sent += 1;
        }
        sent
    }

    pub fn state(&self) -> &PostureState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    fn classify_poor(&mut self, angle: f64, now: MonoTime) -> StatusRecord {
        let duration = match self.state.poor_posture_start {
            Some(start) => now - start,
            None => {
                self.state.poor_posture_start = Some(now);
                self.stats.poor_streaks += 1;
                info!(at = ?now, angle, "poor posture streak started");
                Duration::ZERO
            }
        };
        self.state.poor_posture_duration = duration;

        let warning = self.config.warning_duration;
        let remaining = warning.saturating_sub(duration);
        let timer = TimerDisplay::for_dwell(duration, warning);

        if duration >= warning {
            self.show_alert(now, angle);
            StatusRecord::poor_alerting(angle, timer, self.state.alert_shown)
        } else {
            // No-op unless an alert is somehow up before the dwell elapsed
            self.hide_alert(now, HideReason::BelowDwell);
            StatusRecord::poor_warming(angle, timer, ceil_secs(remaining))
        }
    }

    /// End any poor streak and take the alert down
    fn reset(&mut self, now: MonoTime, reason: HideReason) {
        if self.state.in_poor_streak() {
            debug!(
                at = ?now,
                dwell = %humanize(self.state.poor_posture_duration),
                "poor posture streak ended"
            );
        }
        self.state.clear_streak();
        self.hide_alert(now, reason);
    }

    /// Idempotent: raises once per streak, schedules the auto-hide re-check
    fn show_alert(&mut self, now: MonoTime, angle: f64) {
        if self.state.alert_shown {
            return;
        }
        self.state.alert_shown = true;
        self.stats.alerts_raised += 1;
        self.signals.push_back(AlertSignal::Raise { at: now, angle });

        let delay = self.config.auto_hide_delay;
        self.auto_hide.schedule(
            now,
            delay,
            AutoHideCheck {
                deadline: now + delay,
            },
        );
        info!(
            at = ?now,
            angle,
            dwell = %humanize(self.state.poor_posture_duration),
            "posture alert raised"
        );
    }

    /// Idempotent: hides only a shown alert
    fn hide_alert(&mut self, now: MonoTime, reason: HideReason) {
        if !self.state.alert_shown {
            return;
        }
        self.state.alert_shown = false;
        self.auto_hide.cancel();
        self.stats.alerts_hidden += 1;
        self.signals.push_back(AlertSignal::Hide { at: now, reason });
        info!(at = ?now, ?reason, "posture alert hidden");
    }

    fn note_quality(&mut self, quality: Quality, now: MonoTime) {
        if quality != self.last_quality {
            debug!(at = ?now, from = %self.last_quality, to = %quality, "posture quality changed");
            self.last_quality = quality;
        }
    }
}

impl Default for PostureEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole seconds, rounded up
fn ceil_secs(d: Duration) -> u64 {
    let millis = d.as_millis();
    ((millis + 999) / 1000) as u64
}

fn humanize(d: Duration) -> String {
    humantime::format_duration(d).to_string()
}
