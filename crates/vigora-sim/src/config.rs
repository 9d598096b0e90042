//! Playback configuration from environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::SimError;

const DEFAULT_ROUTE_DURATION_MS: u64 = 36_000;
const DEFAULT_FRAME_MS: u64 = 16;
const DEFAULT_MISSION_MINUTES: u64 = 36;

/// How the simulated drone's geographic position follows progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionMode {
    /// Interpolate from the start waypoint towards the end waypoint
    #[default]
    Linear,
    /// Add a fixed per-progress offset to the start waypoint (dashboard parity)
    FixedOffset,
}

impl FromStr for PositionMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(PositionMode::Linear),
            "offset" | "fixed_offset" | "fixed-offset" => Ok(PositionMode::FixedOffset),
            other => Err(SimError::InvalidArgument(format!(
                "unknown position mode {other:?} (expected linear or offset)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Wall-clock time of a full run at 1x
    pub route_duration: Duration,
    /// Driver frame period
    pub frame_interval: Duration,
    pub cruise_speed_kmh: f64,
    pub heading_start_deg: f64,
    /// Heading change over a full run
    pub heading_sweep_deg: f64,
    /// Battery percentage consumed over a full run
    pub battery_drain_percent: f64,
    pub min_speed_multiplier: f64,
    pub max_speed_multiplier: f64,
    /// Accepted multipliers are whole multiples of this; zero disables the check
    pub speed_step: f64,
    /// Mission time shown to operators for a full run
    pub mission_clock: Duration,
    pub position_mode: PositionMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            route_duration: Duration::from_millis(DEFAULT_ROUTE_DURATION_MS),
            frame_interval: Duration::from_millis(DEFAULT_FRAME_MS),
            cruise_speed_kmh: 7.2,
            heading_start_deg: 45.0,
            heading_sweep_deg: 30.0,
            battery_drain_percent: 32.0,
            min_speed_multiplier: 0.5,
            max_speed_multiplier: 10.0,
            speed_step: 0.5,
            mission_clock: Duration::from_secs(DEFAULT_MISSION_MINUTES * 60),
            position_mode: PositionMode::Linear,
        }
    }
}

impl SimulationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            route_duration: env_millis("VIGORA_SIM_DURATION_MS")
                .filter(|d| !d.is_zero())
                .unwrap_or(defaults.route_duration),
            frame_interval: env_millis("VIGORA_SIM_FRAME_MS")
                .filter(|d| !d.is_zero())
                .unwrap_or(defaults.frame_interval),
            mission_clock: env::var("VIGORA_SIM_MISSION_MINUTES")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(|minutes| Duration::from_secs(minutes * 60))
                .unwrap_or(defaults.mission_clock),
            position_mode: env::var("VIGORA_SIM_POSITION_MODE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.position_mode),
            ..defaults
        }
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}
