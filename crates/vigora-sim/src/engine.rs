//! Track playback state machine.
//!
//! The engine never advances on its own. A caller drives it with
//! [`SimulationEngine::tick`] (tests, stepping tools) or through
//! [`SimulationEngine::tick_token`] from a scheduled loop. Every run is owned
//! by a [`LoopToken`]; pausing, stopping or resetting retires the token, so a
//! frame scheduled before the call finds it stale and changes nothing.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use vigora_core::{
    build_route_from_waypoints, demo_drone_seed, demo_route, route_length_m, DroneTelemetry,
    GeoPosition, NoFlyZone, RouteGeometry, RoutePlan, TelemetryUpdate, Waypoint,
};

use crate::config::{PositionMode, SimulationConfig};
use crate::error::{SimError, SimResult};
use crate::snapshot::{MissionMetrics, SimulationSnapshot};

/// Per-progress offset used by [`PositionMode::FixedOffset`].
const FIXED_OFFSET_LAT: f64 = 0.0023;
const FIXED_OFFSET_LON: f64 = 0.0056;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationState {
    /// Progress 0, not running
    Idle,
    /// Progress advancing with each tick
    Running,
    /// Progress frozen mid-route
    Paused,
    /// Progress reached 1
    Completed,
}

/// Identifies the run a scheduled tick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopToken(u64);

#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: SimulationConfig,
    route: RouteGeometry,
    no_fly_zones: Vec<NoFlyZone>,
    route_length_m: f64,
    telemetry: DroneTelemetry,
    state: SimulationState,
    progress: f64,
    /// Elapsed run time already scaled by the speed multiplier, in seconds
    scaled_elapsed_s: f64,
    speed_multiplier: f64,
    generation: u64,
    active: Option<LoopToken>,
}

impl SimulationEngine {
    /// Create an idle engine. A missing seed falls back to placeholder telemetry.
    pub fn new(
        route: RouteGeometry,
        no_fly_zones: Vec<NoFlyZone>,
        seed: Option<DroneTelemetry>,
        config: SimulationConfig,
    ) -> Self {
        let route_length_m = route_length_m(&route.waypoints);
        Self {
            config,
            route,
            no_fly_zones,
            route_length_m,
            telemetry: seed.unwrap_or_default(),
            state: SimulationState::Idle,
            progress: 0.0,
            scaled_elapsed_s: 0.0,
            speed_multiplier: 1.0,
            generation: 0,
            active: None,
        }
    }

    pub fn with_defaults(route: RouteGeometry) -> Self {
        Self::new(route, Vec::new(), None, SimulationConfig::default())
    }

    /// Engine for a parsed route plan, with the demo drone placed on its
    /// first waypoint. Fails if any planned coordinate does not parse.
    pub fn from_route_plan(plan: &RoutePlan, config: SimulationConfig) -> SimResult<Self> {
        let waypoints = plan.to_waypoints()?;
        if waypoints.is_empty() {
            return Err(SimError::InvalidArgument("route plan has no waypoints".to_string()));
        }

        let route = build_route_from_waypoints(&waypoints);
        let seed = route.start().map(|wp| DroneTelemetry {
            position: wp.position,
            ..demo_drone_seed()
        });
        info!(
            waypoints = route.waypoints.len(),
            distance = %plan.distance,
            "Loaded route plan"
        );
        Ok(Self::new(route, Vec::new(), seed, config))
    }

    /// Engine loaded with the Riverside demo route and drone.
    pub fn demo(config: SimulationConfig) -> Self {
        let demo = demo_route();
        let route = RouteGeometry {
            waypoints: demo.waypoints,
            paths: demo.paths,
        };
        Self::new(route, demo.no_fly_zones, Some(demo_drone_seed()), config)
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_running(&self) -> bool {
        self.state == SimulationState::Running
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn telemetry(&self) -> &DroneTelemetry {
        &self.telemetry
    }

    pub fn route(&self) -> &RouteGeometry {
        &self.route
    }

    pub fn no_fly_zones(&self) -> &[NoFlyZone] {
        &self.no_fly_zones
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Token of the current run, if one is active.
    pub fn active_token(&self) -> Option<LoopToken> {
        self.active
    }

    /// Begin or resume a run.
    ///
    /// While already running this returns the existing token so no second
    /// advancement loop is created. From `Completed` a fresh run starts at 0.
    pub fn start(&mut self) -> LoopToken {
        if let (SimulationState::Running, Some(token)) = (self.state, self.active) {
            return token;
        }

        match self.state {
            SimulationState::Completed => {
                self.progress = 0.0;
                self.scaled_elapsed_s = 0.0;
                info!("Restarting completed track playback");
            }
            SimulationState::Paused => {
                debug!(progress = self.progress, "Resuming track playback");
            }
            _ => info!(speed = self.speed_multiplier, "Starting track playback"),
        }

        self.generation += 1;
        let token = LoopToken(self.generation);
        self.active = Some(token);
        self.state = SimulationState::Running;
        token
    }

    /// Freeze progress and telemetry. No-op unless running.
    pub fn pause(&mut self) -> bool {
        if self.state != SimulationState::Running {
            return false;
        }
        self.active = None;
        self.state = SimulationState::Paused;
        debug!(progress = self.progress, "Paused track playback");
        true
    }

    /// Halt and rewind progress to 0. Telemetry is left as-is.
    pub fn stop(&mut self) {
        self.active = None;
        self.progress = 0.0;
        self.scaled_elapsed_s = 0.0;
        self.state = SimulationState::Idle;
        debug!("Stopped track playback");
    }

    /// Halt, rewind, and put the drone back on the start waypoint.
    pub fn reset(&mut self) {
        self.stop();

        let mut update = TelemetryUpdate {
            heading_deg: Some(0.0),
            speed_kmh: Some(0.0),
            battery_percent: Some(100.0),
            ..TelemetryUpdate::default()
        };
        update.position = self.route.start().map(|wp| wp.position);
        if update.position.is_none() {
            warn!("Route has no start waypoint; drone position left unchanged on reset");
        }
        self.telemetry.apply(&update);
    }

    /// Change the speed multiplier; takes effect on the next tick.
    pub fn set_speed(&mut self, multiplier: f64) -> SimResult<()> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            warn!(multiplier, "Rejected non-positive speed multiplier");
            return Err(SimError::InvalidArgument(format!(
                "speed multiplier must be positive, got {multiplier}"
            )));
        }

        let (min, max) = (self.config.min_speed_multiplier, self.config.max_speed_multiplier);
        if multiplier < min || multiplier > max {
            warn!(multiplier, min, max, "Rejected out-of-range speed multiplier");
            return Err(SimError::InvalidArgument(format!(
                "speed multiplier {multiplier} outside {min}..={max}"
            )));
        }

        let step = self.config.speed_step;
        if step > 0.0 {
            let steps = multiplier / step;
            if (steps - steps.round()).abs() > 1e-9 {
                warn!(multiplier, step, "Rejected off-step speed multiplier");
                return Err(SimError::InvalidArgument(format!(
                    "speed multiplier {multiplier} is not a multiple of {step}"
                )));
            }
        }

        self.speed_multiplier = multiplier;
        debug!(multiplier, "Speed multiplier updated");
        Ok(())
    }

    pub fn update_telemetry(&mut self, update: &TelemetryUpdate) {
        self.telemetry.apply(update);
    }

    /// Advance the current run by `delta` of wall-clock time.
    ///
    /// Returns whether any state changed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        match self.active {
            Some(token) => self.tick_token(token, delta),
            None => false,
        }
    }

    /// Advance the run owned by `token`. Stale tokens change nothing.
    pub fn tick_token(&mut self, token: LoopToken, delta: Duration) -> bool {
        if self.state != SimulationState::Running || self.active != Some(token) {
            debug!(?token, "Ignoring tick from stale playback loop");
            return false;
        }

        self.scaled_elapsed_s += delta.as_secs_f64() * self.speed_multiplier;

        let duration_s = self.config.route_duration.as_secs_f64();
        let progress = if duration_s > 0.0 {
            (self.scaled_elapsed_s / duration_s).min(1.0)
        } else {
            1.0
        };
        self.progress = progress.max(self.progress);
        self.commit_telemetry(self.progress);

        if self.progress >= 1.0 {
            self.active = None;
            self.state = SimulationState::Completed;
            info!(
                battery = self.telemetry.battery_percent,
                "Track playback completed"
            );
        }
        true
    }

    fn commit_telemetry(&mut self, progress: f64) {
        let position = self.route.start().map(|start| {
            let start = start.position;
            match self.config.position_mode {
                PositionMode::Linear => {
                    let end = self.route.end().map(|wp| wp.position).unwrap_or(start);
                    start.lerp(&end, progress)
                }
                PositionMode::FixedOffset => {
                    start.offset(progress * FIXED_OFFSET_LAT, progress * FIXED_OFFSET_LON)
                }
            }
        });

        self.telemetry.apply(&TelemetryUpdate {
            position,
            heading_deg: Some(self.config.heading_start_deg + progress * self.config.heading_sweep_deg),
            altitude_m: None,
            speed_kmh: Some(self.config.cruise_speed_kmh),
            battery_percent: Some(100.0 - self.config.battery_drain_percent * progress),
        });
    }

    /// Replace the route; roles are re-tagged and paths rebuilt.
    pub fn set_waypoints(&mut self, waypoints: Vec<Waypoint>) {
        self.route = build_route_from_waypoints(&waypoints);
        self.route_length_m = route_length_m(&self.route.waypoints);
        debug!(count = self.route.waypoints.len(), "Route waypoints replaced");
    }

    pub fn add_waypoint(&mut self, waypoint: Waypoint) {
        let mut waypoints = self.route.waypoints.clone();
        waypoints.push(waypoint);
        self.set_waypoints(waypoints);
    }

    pub fn remove_waypoint(&mut self, id: &str) -> bool {
        let before = self.route.waypoints.len();
        let waypoints: Vec<Waypoint> = self
            .route
            .waypoints
            .iter()
            .filter(|wp| wp.id != id)
            .cloned()
            .collect();
        if waypoints.len() == before {
            return false;
        }
        self.set_waypoints(waypoints);
        true
    }

    pub fn set_no_fly_zones(&mut self, zones: Vec<NoFlyZone>) {
        self.no_fly_zones = zones;
    }

    pub fn start_position(&self) -> Option<GeoPosition> {
        self.route.start().map(|wp| wp.position)
    }

    /// Read-only view for rendering.
    pub fn snapshot(&self) -> SimulationSnapshot {
        let canvas_position = self
            .route
            .primary_path()
            .and_then(|path| path.curve.point_at(self.progress));

        SimulationSnapshot {
            waypoints: self.route.waypoints.clone(),
            paths: self.route.paths.clone(),
            no_fly_zones: self.no_fly_zones.clone(),
            drone: self.telemetry.clone(),
            canvas_position,
            progress: self.progress,
            running: self.is_running(),
            state: self.state,
            speed_multiplier: self.speed_multiplier,
            metrics: MissionMetrics::new(
                self.progress,
                self.config.mission_clock,
                self.route.waypoints.len(),
                self.route_length_m,
            ),
            captured_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigora_core::{GeoPosition, WaypointRole};

    const EPS: f64 = 1e-9;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn demo_engine() -> SimulationEngine {
        SimulationEngine::demo(SimulationConfig::default())
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = demo_engine();
        assert_eq!(engine.state(), SimulationState::Idle);
        assert_eq!(engine.progress(), 0.0);
        assert!(!engine.is_running());
        assert_eq!(engine.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_missing_seed_uses_placeholder() {
        let engine = SimulationEngine::with_defaults(RouteGeometry::default());
        assert_eq!(engine.telemetry(), &DroneTelemetry::default());
    }

    #[test]
    fn test_tick_without_start_does_nothing() {
        let mut engine = demo_engine();
        assert!(!engine.tick(secs(5.0)));
        assert_eq!(engine.progress(), 0.0);
    }

    #[test]
    fn test_start_then_stop_returns_to_idle() {
        let mut engine = demo_engine();
        engine.start();
        for _ in 0..7 {
            engine.tick(secs(1.3));
        }
        assert!(engine.progress() > 0.0);

        engine.stop();
        assert_eq!(engine.progress(), 0.0);
        assert_eq!(engine.state(), SimulationState::Idle);
        assert!(engine.active_token().is_none());
    }

    #[test]
    fn test_stop_keeps_telemetry() {
        let mut engine = demo_engine();
        engine.start();
        engine.tick(secs(18.0));
        let before = engine.telemetry().clone();

        engine.stop();
        assert_eq!(engine.telemetry(), &before);
    }

    #[test]
    fn test_pause_and_resume_continues_from_progress() {
        let mut engine = demo_engine();
        engine.start();
        engine.tick(secs(9.0));
        let paused_at = engine.progress();
        assert!((paused_at - 0.25).abs() < EPS);

        assert!(engine.pause());
        assert_eq!(engine.state(), SimulationState::Paused);
        assert!(!engine.tick(secs(9.0)));
        assert_eq!(engine.progress(), paused_at);

        engine.start();
        engine.tick(secs(0.5));
        assert!(engine.progress() >= paused_at);
        engine.tick(secs(8.5));
        assert!((engine.progress() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_pause_is_noop_unless_running() {
        let mut engine = demo_engine();
        assert!(!engine.pause());
        assert_eq!(engine.state(), SimulationState::Idle);
    }

    #[test]
    fn test_natural_completion() {
        let mut engine = demo_engine();
        engine.start();
        engine.tick(secs(36.0));

        assert_eq!(engine.progress(), 1.0);
        assert!(!engine.is_running());
        assert_eq!(engine.state(), SimulationState::Completed);
        assert_eq!(engine.telemetry().battery_percent, 68.0);
        assert!((engine.telemetry().heading_deg - 75.0).abs() < EPS);

        let end = engine.route().end().map(|wp| wp.position);
        assert_eq!(Some(engine.telemetry().position), end);

        // Completed runs ignore further ticks
        assert!(!engine.tick(secs(1.0)));
    }

    #[test]
    fn test_progress_clamped_on_overshoot() {
        let mut engine = demo_engine();
        engine.start();
        engine.tick(secs(100.0));
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn test_reset_from_every_state() {
        let setups: [fn(&mut SimulationEngine); 4] = [
            |_| {},
            |e| {
                e.start();
                e.tick(Duration::from_secs(10));
            },
            |e| {
                e.start();
                e.tick(Duration::from_secs(10));
                e.pause();
            },
            |e| {
                e.start();
                e.tick(Duration::from_secs(40));
            },
        ];

        for setup in setups {
            let mut engine = demo_engine();
            setup(&mut engine);
            engine.reset();

            assert_eq!(engine.progress(), 0.0);
            assert_eq!(engine.state(), SimulationState::Idle);
            let telemetry = engine.telemetry();
            assert_eq!(Some(telemetry.position), engine.start_position());
            assert_eq!(telemetry.heading_deg, 0.0);
            assert_eq!(telemetry.speed_kmh, 0.0);
            assert_eq!(telemetry.battery_percent, 100.0);
        }
    }

    #[test]
    fn test_double_start_does_not_double_speed() {
        let mut engine = demo_engine();
        let first = engine.start();
        let second = engine.start();
        assert_eq!(first, second);

        engine.tick(secs(3.6));
        assert!((engine.progress() - 0.1).abs() < EPS);
    }

    #[test]
    fn test_stale_token_cannot_mutate() {
        let mut engine = demo_engine();
        let old = engine.start();
        engine.tick_token(old, secs(3.6));
        engine.pause();

        assert!(!engine.tick_token(old, secs(3.6)));
        let fresh = engine.start();
        assert_ne!(old, fresh);
        assert!(!engine.tick_token(old, secs(3.6)));
        assert!(engine.tick_token(fresh, secs(3.6)));
        assert!((engine.progress() - 0.2).abs() < EPS);
    }

    #[test]
    fn test_stale_token_after_stop_and_reset() {
        let controls: [fn(&mut SimulationEngine); 2] = [|e| e.stop(), |e| e.reset()];

        for control in controls {
            let mut engine = demo_engine();
            let old = engine.start();
            assert!(engine.tick_token(old, secs(9.0)));
            control(&mut engine);

            let telemetry = engine.telemetry().clone();
            assert!(!engine.tick_token(old, secs(3.6)));
            assert!(!engine.tick(secs(3.6)));
            assert_eq!(engine.progress(), 0.0);
            assert_eq!(engine.state(), SimulationState::Idle);
            assert_eq!(engine.telemetry(), &telemetry);
            assert_eq!(engine.active_token(), None);

            // A later run does not revive the retired token
            let fresh = engine.start();
            assert_ne!(old, fresh);
            assert!(!engine.tick_token(old, secs(3.6)));
            assert_eq!(engine.progress(), 0.0);
        }
    }

    #[test]
    fn test_speed_step() {
        let mut engine = demo_engine();
        for good in [0.5, 1.5, 7.0, 10.0] {
            engine.set_speed(good).unwrap();
            assert_eq!(engine.speed_multiplier(), good);
        }

        let config = SimulationConfig {
            speed_step: 0.0,
            ..SimulationConfig::default()
        };
        let mut engine = SimulationEngine::demo(config);
        engine.set_speed(0.75).unwrap();
        assert_eq!(engine.speed_multiplier(), 0.75);
    }

    #[test]
    fn test_from_route_plan() {
        let plan = vigora_core::fallback_route_plan("flood survey").route;
        let engine = SimulationEngine::from_route_plan(&plan, SimulationConfig::default()).unwrap();
        assert_eq!(engine.route().waypoints.len(), 5);
        assert_eq!(engine.start_position(), Some(GeoPosition::new(37.7749, -122.4194)));
        assert_eq!(engine.telemetry().position, GeoPosition::new(37.7749, -122.4194));
        assert_eq!(engine.telemetry().altitude_m, 120.0);

        let mut bad = plan.clone();
        bad.waypoints[2].latitude = "north".to_string();
        let err = SimulationEngine::from_route_plan(&bad, SimulationConfig::default()).unwrap_err();
        assert!(matches!(err, SimError::Core(vigora_core::CoreError::InvalidCoordinate { .. })));

        let mut empty = plan;
        empty.waypoints.clear();
        let err = SimulationEngine::from_route_plan(&empty, SimulationConfig::default()).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }

    #[test]
    fn test_set_speed_rejects_invalid() {
        let mut engine = demo_engine();
        engine.set_speed(2.0).unwrap();

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, 0.25, 0.75, 3.3, 11.0] {
            let err = engine.set_speed(bad).unwrap_err();
            assert!(matches!(err, SimError::InvalidArgument(_)));
            assert_eq!(engine.speed_multiplier(), 2.0);
        }
    }

    #[test]
    fn test_speed_change_mid_run() {
        let mut engine = demo_engine();
        engine.start();
        engine.tick(secs(9.0));
        engine.set_speed(2.0).unwrap();
        assert!(engine.is_running());

        engine.tick(secs(4.5));
        assert!((engine.progress() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_demo_half_way_then_stop() {
        let mut engine = demo_engine();
        assert_eq!(engine.route().waypoints.len(), 5);
        assert_eq!(engine.route().waypoints[0].role, WaypointRole::Start);
        assert_eq!(engine.route().waypoints[4].role, WaypointRole::End);

        engine.start();
        engine.tick(secs(18.0));
        assert!((engine.progress() - 0.5).abs() < EPS);
        assert!((engine.telemetry().battery_percent - 84.0).abs() < EPS);
        assert!(engine.is_running());

        engine.stop();
        assert_eq!(engine.progress(), 0.0);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_linear_position_halfway() {
        let mut engine = demo_engine();
        engine.start();
        engine.tick(secs(18.0));

        let pos = engine.telemetry().position;
        assert!((pos.latitude - (37.7749 + 37.7772) / 2.0).abs() < 1e-6);
        assert!((pos.longitude - (-122.4194 + -122.4138) / 2.0).abs() < 1e-6);
        assert_eq!(engine.telemetry().speed_kmh, 7.2);
        assert_eq!(engine.telemetry().altitude_m, 120.0);
    }

    #[test]
    fn test_fixed_offset_position() {
        let config = SimulationConfig {
            position_mode: PositionMode::FixedOffset,
            ..SimulationConfig::default()
        };
        let mut engine = SimulationEngine::demo(config);
        engine.start();
        engine.tick(secs(18.0));

        let pos = engine.telemetry().position;
        assert!((pos.latitude - (37.7749 + 0.00115)).abs() < 1e-9);
        assert!((pos.longitude - (-122.4194 + 0.0028)).abs() < 1e-9);
    }

    #[test]
    fn test_start_after_completion_restarts() {
        let mut engine = demo_engine();
        engine.start();
        engine.tick(secs(40.0));
        assert_eq!(engine.state(), SimulationState::Completed);

        engine.start();
        assert_eq!(engine.state(), SimulationState::Running);
        assert_eq!(engine.progress(), 0.0);
        engine.tick(secs(3.6));
        assert!((engine.progress() - 0.1).abs() < EPS);
    }

    #[test]
    fn test_update_telemetry_merges() {
        let mut engine = SimulationEngine::with_defaults(RouteGeometry::default());
        engine.update_telemetry(&TelemetryUpdate::position(GeoPosition::new(1.0, 2.0)));
        engine.update_telemetry(&TelemetryUpdate {
            altitude_m: Some(80.0),
            ..TelemetryUpdate::default()
        });

        assert_eq!(engine.telemetry().position, GeoPosition::new(1.0, 2.0));
        assert_eq!(engine.telemetry().altitude_m, 80.0);
    }

    #[test]
    fn test_route_edits_retag_and_rebuild() {
        let mut engine = demo_engine();
        engine.add_waypoint(Waypoint::new(
            "wp6",
            GeoPosition::new(37.7780, -122.4120),
            WaypointRole::Start,
        ));

        let roles: Vec<_> = engine.route().waypoints.iter().map(|wp| wp.role).collect();
        assert_eq!(roles[0], WaypointRole::Start);
        assert_eq!(roles[4], WaypointRole::Intermediate);
        assert_eq!(roles[5], WaypointRole::End);
        assert_eq!(engine.route().paths.len(), 1);

        assert!(engine.remove_waypoint("wp1"));
        assert!(!engine.remove_waypoint("missing"));
        assert_eq!(engine.route().start().map(|wp| wp.id.as_str()), Some("wp2"));
    }

    #[test]
    fn test_reset_without_start_waypoint_keeps_position() {
        let mut engine = SimulationEngine::with_defaults(RouteGeometry::default());
        engine.update_telemetry(&TelemetryUpdate::position(GeoPosition::new(5.0, 6.0)));
        engine.reset();
        assert_eq!(engine.telemetry().position, GeoPosition::new(5.0, 6.0));
        assert_eq!(engine.telemetry().battery_percent, 100.0);
    }

    #[test]
    fn test_snapshot_metrics() {
        let mut engine = demo_engine();
        engine.start();
        engine.tick(secs(18.0));
        let snapshot = engine.snapshot();

        assert!(snapshot.running);
        assert_eq!(snapshot.state, SimulationState::Running);
        assert_eq!(snapshot.metrics.elapsed_label, "18:00");
        assert_eq!(snapshot.metrics.total_label, "36:00");
        assert_eq!(snapshot.metrics.waypoints_reached, 3);
        assert_eq!(snapshot.metrics.total_waypoints, 5);
        assert!(
            (snapshot.metrics.distance_covered_km - snapshot.metrics.total_distance_km / 2.0).abs()
                < 1e-9
        );
        assert!(snapshot.canvas_position.is_some());
        assert_eq!(snapshot.no_fly_zones.len(), 1);
    }
}
