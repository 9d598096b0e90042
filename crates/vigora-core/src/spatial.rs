//! Distance helpers for waypoint routes.

use crate::models::Waypoint;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters (Haversine formula).
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Total length of a route in meters, following waypoints in order.
pub fn route_length_m(waypoints: &[Waypoint]) -> f64 {
    waypoints
        .windows(2)
        .map(|leg| {
            let (a, b) = (&leg[0].position, &leg[1].position);
            haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
        })
        .sum()
}
