//! Vigora Core - route geometry and track data model.
//!
//! Pure, synchronous building blocks shared by the playback engine and
//! the CLI tools: waypoints and telemetry types, canvas layout and curve
//! construction, the demo dataset, and parsing of AI-generated route plans.

pub mod demo;
pub mod error;
pub mod geometry;
pub mod models;
pub mod route_plan;
pub mod spatial;

pub use demo::{demo_drone_seed, demo_route, random_route, random_route_with, DemoRoute};
pub use error::{CoreError, CoreResult};
pub use geometry::{
    build_path, build_route_from_waypoints, project_to_canvas, tag_roles, CanvasLayout,
    CanvasPoint, CurveDescriptor, PathCommand, PathSegment, RouteGeometry,
};
pub use models::{
    DroneTelemetry, GeoPosition, NoFlyZone, TelemetryUpdate, Waypoint, WaypointRole,
};
pub use route_plan::{
    fallback_route_plan, load_route_plan, PlannedRoute, PlannedWaypoint, ProviderResponse,
    RoutePlan,
};
pub use spatial::{haversine_distance, route_length_m};
