//! Demo dataset and random route generation.

use rand::Rng;

use crate::geometry::{
    build_path, project_to_canvas, tag_roles, PathSegment, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH,
};
use crate::models::{DroneTelemetry, GeoPosition, NoFlyZone, Waypoint, WaypointRole};

const RIVERSIDE_START_LAT: f64 = 37.7749;
const RIVERSIDE_START_LON: f64 = -122.4194;

/// The Riverside inspection route shown on the tracks screen.
#[derive(Debug, Clone)]
pub struct DemoRoute {
    pub waypoints: Vec<Waypoint>,
    pub paths: Vec<PathSegment>,
    pub no_fly_zones: Vec<NoFlyZone>,
}

pub fn demo_route() -> DemoRoute {
    let waypoints = vec![
        Waypoint::new("wp1", GeoPosition::new(RIVERSIDE_START_LAT, RIVERSIDE_START_LON), WaypointRole::Start)
            .with_description("Starting point - Riverside park entrance"),
        Waypoint::new("wp2", GeoPosition::new(37.7752, -122.4180), WaypointRole::Intermediate)
            .with_description("North residential area"),
        Waypoint::new("wp3", GeoPosition::new(37.7758, -122.4166), WaypointRole::Intermediate)
            .with_description("Riverbank erosion hotspot"),
        Waypoint::new("wp4", GeoPosition::new(37.7765, -122.4152), WaypointRole::Intermediate)
            .with_description("Damaged bridge infrastructure"),
        Waypoint::new("wp5", GeoPosition::new(37.7772, -122.4138), WaypointRole::End)
            .with_description("Emergency response staging area"),
    ];

    let points = project_to_canvas(&waypoints, DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT);
    let paths = vec![PathSegment {
        curve: build_path(&points),
        animated: true,
        ..PathSegment::default()
    }];

    let no_fly_zones = vec![
        NoFlyZone::new("nfz1", GeoPosition::new(37.7760, -122.4170), 40.0).with_description("No-Fly Zone"),
    ];

    DemoRoute {
        waypoints,
        paths,
        no_fly_zones,
    }
}

/// Telemetry the tracks screen seeds its drone with.
pub fn demo_drone_seed() -> DroneTelemetry {
    DroneTelemetry {
        position: GeoPosition::new(RIVERSIDE_START_LAT, RIVERSIDE_START_LON),
        heading_deg: 75.0,
        altitude_m: 120.0,
        speed_kmh: 7.2,
        battery_percent: 100.0,
    }
}

const MAX_RADIUS_DEG: f64 = 180.0;

/// Generate `count` random waypoints within `radius_deg` of `center`.
///
/// A zero or NaN radius places every waypoint on the centre. Radii are capped
/// at 180 degrees.
pub fn random_route(center: GeoPosition, count: usize, radius_deg: f64) -> Vec<Waypoint> {
    random_route_with(&mut rand::rng(), center, count, radius_deg)
}

/// Same as [`random_route`] with a caller-supplied RNG.
pub fn random_route_with<R: Rng>(
    rng: &mut R,
    center: GeoPosition,
    count: usize,
    radius_deg: f64,
) -> Vec<Waypoint> {
    // Wider offsets are meaningless in degrees and overflow the sampling range
    let radius = if radius_deg.is_nan() {
        0.0
    } else {
        radius_deg.abs().min(MAX_RADIUS_DEG)
    };

    let mut waypoints: Vec<Waypoint> = (0..count)
        .map(|i| {
            let (dlat, dlon) = if radius > 0.0 {
                (rng.random_range(-radius..radius), rng.random_range(-radius..radius))
            } else {
                (0.0, 0.0)
            };
            Waypoint::new(format!("WP{}", i + 1), center.offset(dlat, dlon), WaypointRole::Intermediate)
        })
        .collect();

    tag_roles(&mut waypoints);
    waypoints
}
