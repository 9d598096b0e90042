//! Tokio-driven playback loop.
//!
//! The driver owns the engine behind a mutex and at most one spawned loop
//! task. Each frame measures elapsed time, ticks the engine with the run's
//! token and publishes a snapshot. Control calls retire the token under the
//! engine lock before aborting the task.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use vigora_core::TelemetryUpdate;

use crate::engine::{LoopToken, SimulationEngine, SimulationState};
use crate::error::SimResult;
use crate::snapshot::SimulationSnapshot;

const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

pub struct SimulationDriver {
    engine: Arc<Mutex<SimulationEngine>>,
    frame_interval: Duration,
    task: Option<JoinHandle<()>>,
    snapshots: broadcast::Sender<SimulationSnapshot>,
}

impl SimulationDriver {
    pub fn new(engine: SimulationEngine) -> Self {
        let frame_interval = engine.config().frame_interval.max(Duration::from_millis(1));
        let (snapshots, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            frame_interval,
            task: None,
            snapshots,
        }
    }

    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval.max(Duration::from_millis(1));
        self
    }

    /// Start or resume playback. Must be called within a Tokio runtime.
    pub fn start(&mut self) {
        let (token, was_running) = {
            let mut engine = lock_engine(&self.engine);
            let was_running = engine.is_running();
            (engine.start(), was_running)
        };

        if was_running && self.task.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }

        self.abort_task();
        self.task = Some(tokio::spawn(run_playback_loop(
            Arc::clone(&self.engine),
            token,
            self.frame_interval,
            self.snapshots.clone(),
        )));
        tracing::debug!(?token, "Spawned playback loop");
    }

    pub fn pause(&mut self) -> bool {
        let paused = lock_engine(&self.engine).pause();
        self.abort_task();
        self.publish();
        paused
    }

    pub fn stop(&mut self) {
        lock_engine(&self.engine).stop();
        self.abort_task();
        self.publish();
    }

    pub fn reset(&mut self) {
        lock_engine(&self.engine).reset();
        self.abort_task();
        self.publish();
    }

    pub fn set_speed(&self, multiplier: f64) -> SimResult<()> {
        lock_engine(&self.engine).set_speed(multiplier)
    }

    pub fn update_telemetry(&self, update: &TelemetryUpdate) {
        lock_engine(&self.engine).update_telemetry(update);
    }

    /// Run `f` against the engine while holding its lock.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut SimulationEngine) -> R) -> R {
        f(&mut lock_engine(&self.engine))
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        lock_engine(&self.engine).snapshot()
    }

    pub fn state(&self) -> SimulationState {
        lock_engine(&self.engine).state()
    }

    pub fn is_running(&self) -> bool {
        lock_engine(&self.engine).is_running()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SimulationSnapshot> {
        self.snapshots.subscribe()
    }

    /// Wait until the current loop exits, by completion or cancellation.
    pub async fn wait_finished(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::error!("Playback loop failed: {}", e);
                }
            }
        }
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn publish(&self) {
        // No subscribers is not an error
        let _ = self.snapshots.send(self.snapshot());
    }
}

impl Drop for SimulationDriver {
    fn drop(&mut self) {
        self.abort_task();
    }
}

fn lock_engine(engine: &Mutex<SimulationEngine>) -> MutexGuard<'_, SimulationEngine> {
    // Engine mutations complete before the guard drops
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_playback_loop(
    engine: Arc<Mutex<SimulationEngine>>,
    token: LoopToken,
    frame_interval: Duration,
    snapshots: broadcast::Sender<SimulationSnapshot>,
) {
    let mut ticker = interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;
    let mut last_frame = Instant::now();

    loop {
        ticker.tick().await;

        let now = Instant::now();
        let delta = now.duration_since(last_frame);
        last_frame = now;

        let snapshot = {
            let mut engine = lock_engine(&engine);
            if !engine.tick_token(token, delta) {
                tracing::debug!(?token, "Playback loop retired");
                return;
            }
            engine.snapshot()
        };

        let completed = snapshot.state == SimulationState::Completed;
        let _ = snapshots.send(snapshot);
        if completed {
            tracing::debug!(?token, "Playback loop finished");
            return;
        }
    }
}
