//! Human-readable playback output.

use vigora_sim::SimulationSnapshot;

/// One status line per observed frame.
pub fn format_snapshot(label: &str, snapshot: &SimulationSnapshot) -> String {
    let drone = &snapshot.drone;
    format!(
        "[{}] {:>5.1}% {:?} ({:.4}, {:.4}) hdg {:>3.0} alt {:.0}m {:.1}km/h batt {:>3.0}% wp {}/{} t {}",
        label,
        snapshot.progress * 100.0,
        snapshot.state,
        drone.position.latitude,
        drone.position.longitude,
        drone.heading_deg,
        drone.altitude_m,
        drone.speed_kmh,
        drone.battery_percent,
        snapshot.metrics.waypoints_reached,
        snapshot.metrics.total_waypoints,
        snapshot.metrics.elapsed_label,
    )
}

pub fn format_summary(label: &str, snapshot: &SimulationSnapshot) -> String {
    format!(
        "{}: {:?} at {:.0}% | {:.2}/{:.2} km | mission time {}/{} | battery {:.0}%",
        label,
        snapshot.state,
        snapshot.progress * 100.0,
        snapshot.metrics.distance_covered_km,
        snapshot.metrics.total_distance_km,
        snapshot.metrics.elapsed_label,
        snapshot.metrics.total_label,
        snapshot.drone.battery_percent,
    )
}
