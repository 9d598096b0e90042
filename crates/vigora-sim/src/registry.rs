//! Concurrent playbacks keyed by drone id.

use dashmap::DashMap;

use crate::driver::SimulationDriver;
use crate::error::{SimError, SimResult};
use crate::snapshot::SimulationSnapshot;

/// Independent playbacks. Engines share no state with each other.
#[derive(Default)]
pub struct TrackRegistry {
    tracks: DashMap<String, SimulationDriver>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a playback, replacing (and cancelling) any previous one.
    pub fn insert(&self, drone_id: impl Into<String>, driver: SimulationDriver) {
        let drone_id = drone_id.into();
        if self.tracks.insert(drone_id.clone(), driver).is_some() {
            tracing::info!("Replaced playback for {}", drone_id);
        }
    }

    pub fn remove(&self, drone_id: &str) -> Option<SimulationDriver> {
        self.tracks.remove(drone_id).map(|(_, driver)| driver)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Registered drone ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tracks.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn start(&self, drone_id: &str) -> SimResult<()> {
        self.with_track(drone_id, |driver| driver.start())
    }

    pub fn start_all(&self) {
        for mut entry in self.tracks.iter_mut() {
            entry.value_mut().start();
        }
    }

    pub fn pause(&self, drone_id: &str) -> SimResult<bool> {
        self.with_track(drone_id, |driver| driver.pause())
    }

    pub fn stop(&self, drone_id: &str) -> SimResult<()> {
        self.with_track(drone_id, |driver| driver.stop())
    }

    pub fn reset(&self, drone_id: &str) -> SimResult<()> {
        self.with_track(drone_id, |driver| driver.reset())
    }

    pub fn set_speed(&self, drone_id: &str, multiplier: f64) -> SimResult<()> {
        self.with_track(drone_id, |driver| driver.set_speed(multiplier))?
    }

    pub fn snapshot(&self, drone_id: &str) -> SimResult<SimulationSnapshot> {
        self.tracks
            .get(drone_id)
            .map(|driver| driver.snapshot())
            .ok_or_else(|| SimError::TrackNotFound(drone_id.to_string()))
    }

    /// Snapshots of every playback, sorted by drone id.
    pub fn snapshots(&self) -> Vec<(String, SimulationSnapshot)> {
        let mut all: Vec<_> = self
            .tracks
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().snapshot()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// True once no playback is running.
    pub fn all_idle(&self) -> bool {
        self.tracks.iter().all(|entry| !entry.value().is_running())
    }

    fn with_track<R>(&self, drone_id: &str, f: impl FnOnce(&mut SimulationDriver) -> R) -> SimResult<R> {
        let mut driver = self
            .tracks
            .get_mut(drone_id)
            .ok_or_else(|| SimError::TrackNotFound(drone_id.to_string()))?;
        Ok(f(driver.value_mut()))
    }
}
