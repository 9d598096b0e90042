//! Read-only playback views handed to renderers and observers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use vigora_core::{CanvasPoint, DroneTelemetry, NoFlyZone, PathSegment, Waypoint};

use crate::engine::SimulationState;

/// Everything a view needs to draw one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub waypoints: Vec<Waypoint>,
    pub paths: Vec<PathSegment>,
    pub no_fly_zones: Vec<NoFlyZone>,
    pub drone: DroneTelemetry,
    /// Drone marker on the primary path, if the route has one
    pub canvas_position: Option<CanvasPoint>,
    pub progress: f64,
    pub running: bool,
    pub state: SimulationState,
    pub speed_multiplier: f64,
    pub metrics: MissionMetrics,
    pub captured_at: DateTime<Utc>,
}

/// Mission progress figures shown beside the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionMetrics {
    /// Mission clock elapsed, `MM:SS`
    pub elapsed_label: String,
    pub total_label: String,
    pub waypoints_reached: usize,
    pub total_waypoints: usize,
    pub distance_covered_km: f64,
    pub total_distance_km: f64,
}

impl MissionMetrics {
    pub fn new(progress: f64, mission_clock: Duration, total_waypoints: usize, route_length_m: f64) -> Self {
        let progress = progress.clamp(0.0, 1.0);
        let total_secs = mission_clock.as_secs();
        let elapsed_secs = (progress * mission_clock.as_secs_f64()).floor() as u64;
        let total_distance_km = route_length_m / 1000.0;

        Self {
            elapsed_label: clock_label(elapsed_secs),
            total_label: clock_label(total_secs),
            waypoints_reached: (progress * total_waypoints as f64).ceil() as usize,
            total_waypoints,
            distance_covered_km: progress * total_distance_km,
            total_distance_km,
        }
    }
}

fn clock_label(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
