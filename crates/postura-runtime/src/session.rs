//! Posture Session - one engine driven by a tokio task
//!
//! Frames and the engine's deferred auto-hide share one `select!` loop, so
//! the timer can never run concurrently with `process`. Closing the frame
//! source cancels the pending auto-hide before the task exits.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use postura_core::{Frame, MonoTime, PosturaError, PosturaResult};
use postura_engine::{AlertNotifier, EngineStats, PostureEngine, StatusRecord};
use postura_time::Clock;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::SessionConfig;

/// Clock on tokio's timeline; follows `tokio::time::pause`/`advance` in tests
pub struct TokioClock {
    reference: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        TokioClock {
            reference: tokio::time::Instant::now(),
        }
    }

    /// Tokio instant corresponding to `t`
    pub fn instant_at(&self, t: MonoTime) -> tokio::time::Instant {
        self.reference + Duration::from_millis(t.as_millis())
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> MonoTime {
        MonoTime::ZERO.saturating_add(self.reference.elapsed())
    }
}

enum SessionMsg {
    Frame {
        frame: Frame,
        reply: Option<oneshot::Sender<StatusRecord>>,
    },
}

/// Summary returned when a session ends
#[derive(Clone, Debug, Default)]
pub struct SessionReport {
    pub stats: EngineStats,
    /// An auto-hide was still pending and got canceled
    pub canceled_auto_hide: bool,
    pub uptime: Duration,
}

/// Handle to a running session
pub struct Session {
    frames: mpsc::Sender<SessionMsg>,
    latest: watch::Receiver<Option<StatusRecord>>,
    stats: Arc<Mutex<EngineStats>>,
    task: JoinHandle<SessionReport>,
}

impl Session {
    /// Start a session on the current tokio runtime
    pub fn spawn<N>(config: SessionConfig, notifier: N) -> PosturaResult<Self>
    where
        N: AlertNotifier + Send + 'static,
    {
        config.validate()?;
        let engine = PostureEngine::with_config(config.engine.clone())?;

        let (tx, rx) = mpsc::channel(config.frame_buffer);
        let (latest_tx, latest) = watch::channel(None);
        let stats = Arc::new(Mutex::new(EngineStats::default()));

        let worker = SessionWorker {
            engine,
            notifier,
            clock: TokioClock::new(),
            frames: rx,
            latest: latest_tx,
            stats: Arc::clone(&stats),
        };
        let task = tokio::spawn(worker.run());

        Ok(Session {
            frames: tx,
            latest,
            stats,
            task,
        })
    }

    /// Queue a frame; stamped with the session clock when dequeued
    pub async fn push(&self, frame: Frame) -> PosturaResult<()> {
        self.frames
            .send(SessionMsg::Frame { frame, reply: None })
            .await
            .map_err(|_| PosturaError::SessionClosed)
    }

    /// Process a frame and wait for its status
    pub async fn submit(&self, frame: Frame) -> PosturaResult<StatusRecord> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.frames
            .send(SessionMsg::Frame {
                frame,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| PosturaError::SessionClosed)?;
        reply_rx.await.map_err(|_| PosturaError::SessionClosed)
    }

    /// Latest status, for presentation layers that render on their own cadence
    pub fn latest(&self) -> watch::Receiver<Option<StatusRecord>> {
        self.latest.clone()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats.lock().clone()
    }

    /// Stop the frame source and wait for the loop to wind down
    pub async fn shutdown(self) -> PosturaResult<SessionReport> {
        drop(self.frames);
        self.task.await.map_err(|_| PosturaError::SessionClosed)
    }
}

struct SessionWorker<N> {
    engine: PostureEngine,
    notifier: N,
    clock: TokioClock,
    frames: mpsc::Receiver<SessionMsg>,
    latest: watch::Sender<Option<StatusRecord>>,
    stats: Arc<Mutex<EngineStats>>,
}

impl<N: AlertNotifier> SessionWorker<N> {
    async fn run(mut self) -> SessionReport {
        info!("posture session started");

        loop {
            let wake = self.engine.next_deadline().map(|t| self.clock.instant_at(t));

            tokio::select! {
                msg = self.frames.recv() => match msg {
                    Some(SessionMsg::Frame { frame, reply }) => {
                        let now = self.clock.now();
                        let status = self.engine.process(&frame, now);
                        self.after_step();

                        if let Some(reply) = reply {
                            let _ = reply.send(status.clone());
                        }
                        self.latest.send_replace(Some(status));
                    }
                    None => break,
                },
                _ = sleep_until(wake), if wake.is_some() => {
                    let now = self.clock.now();
                    if self.engine.poll(now) {
                        debug!(at = ?now, "auto-hide wake-up");
                    }
                    self.after_step();
                }
            }
        }

        let canceled_auto_hide = self.engine.next_deadline().is_some();
        self.engine.shutdown();

        let stats = self.engine.stats().clone();
        let uptime = self.clock.reference.elapsed();
        info!(
            frames = stats.frames,
            alerts = stats.alerts_raised,
            uptime = %humantime::format_duration(Duration::from_millis(uptime.as_millis() as u64)),
            "posture session stopped"
        );

        SessionReport {
            stats,
            canceled_auto_hide,
            uptime,
        }
    }

    fn after_step(&mut self) {
        self.engine.dispatch(&mut self.notifier);
        *self.stats.lock() = self.engine.stats().clone();
    }
}

async fn sleep_until(wake: Option<tokio::time::Instant>) {
    match wake {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
