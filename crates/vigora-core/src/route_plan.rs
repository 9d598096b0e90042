//! Route plans produced by the AI route service.
//!
//! Two JSON shapes are accepted: the stored plan (`RoutePlan`) and the raw
//! provider response, whose route lives under a `route` key with camelCase
//! totals and unnamed waypoints.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::geometry::{build_path, tag_roles, CanvasLayout};
use crate::models::{GeoPosition, RawCoordinate, Waypoint, WaypointRole};

const FALLBACK_PATH: &str = "M100,250 C150,150 250,100 350,200 S450,300 550,250 S650,100 750,180";

/// A waypoint as stored with a route plan; coordinates stay textual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedWaypoint {
    pub id: String,
    #[serde(deserialize_with = "de_coordinate_text")]
    pub latitude: String,
    #[serde(deserialize_with = "de_coordinate_text")]
    pub longitude: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Stored route shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub distance: String,
    pub duration: String,
    pub waypoints: Vec<PlannedWaypoint>,
    /// SVG path data
    #[serde(default)]
    pub path: String,
}

impl RoutePlan {
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::RouteParse(e.to_string()))
    }

    /// Convert to role-tagged waypoints, parsing every coordinate.
    pub fn to_waypoints(&self) -> CoreResult<Vec<Waypoint>> {
        let mut waypoints = self
            .waypoints
            .iter()
            .map(|wp| {
                let position = GeoPosition::parse(&wp.latitude, &wp.longitude)?;
                let mut waypoint = Waypoint::new(wp.id.clone(), position, WaypointRole::Intermediate);
                waypoint.description = wp.description.clone();
                Ok(waypoint)
            })
            .collect::<CoreResult<Vec<_>>>()?;

        tag_roles(&mut waypoints);
        Ok(waypoints)
    }
}

/// A route plan plus the provider's free-text advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    pub route: RoutePlan,
    pub recommendations: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderWaypoint {
    #[serde(deserialize_with = "de_coordinate_text")]
    pub latitude: String,
    #[serde(deserialize_with = "de_coordinate_text")]
    pub longitude: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRoute {
    #[serde(default)]
    pub total_distance: String,
    #[serde(default)]
    pub estimated_duration: String,
    pub waypoints: Vec<ProviderWaypoint>,
}

/// Raw JSON object returned by the route-generation service.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderResponse {
    pub route: ProviderRoute,
    #[serde(default)]
    pub recommendations: String,
}

impl ProviderResponse {
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::RouteParse(e.to_string()))
    }

    /// Assign `WP1..WPn` ids and derive the SVG path for display.
    pub fn into_planned_route(self) -> PlannedRoute {
        let waypoints: Vec<PlannedWaypoint> = self
            .route
            .waypoints
            .into_iter()
            .enumerate()
            .map(|(i, wp)| PlannedWaypoint {
                id: format!("WP{}", i + 1),
                latitude: wp.latitude,
                longitude: wp.longitude,
                description: wp.description,
            })
            .collect();

        let points = CanvasLayout::default().project(waypoints.len());
        let path = build_path(&points).to_svg_path();

        PlannedRoute {
            route: RoutePlan {
                distance: self.route.total_distance,
                duration: self.route.estimated_duration,
                waypoints,
                path,
            },
            recommendations: self.recommendations,
        }
    }
}

/// Parse either a stored route plan or a raw provider response.
pub fn load_route_plan(json: &str) -> CoreResult<RoutePlan> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| CoreError::RouteParse(e.to_string()))?;

    if value.get("route").is_some_and(|route| route.is_object()) {
        let response: ProviderResponse =
            serde_json::from_value(value).map_err(|e| CoreError::RouteParse(e.to_string()))?;
        return Ok(response.into_planned_route().route);
    }

    serde_json::from_value(value).map_err(|e| CoreError::RouteParse(e.to_string()))
}

/// Fixed plan served when no route provider is configured.
pub fn fallback_route_plan(prompt: &str) -> PlannedRoute {
    let waypoints = [
        ("37.7749", "-122.4194", "Starting point - Riverside park entrance"),
        ("37.7752", "-122.4180", "North residential area - focus on apartment buildings"),
        ("37.7758", "-122.4166", "Riverbank erosion hotspot"),
        ("37.7765", "-122.4152", "Damaged bridge infrastructure"),
        ("37.7772", "-122.4138", "End point - Emergency response staging area"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (lat, lon, description))| PlannedWaypoint {
        id: format!("WP{}", i + 1),
        latitude: lat.to_string(),
        longitude: lon.to_string(),
        description: Some(description.to_string()),
    })
    .collect();

    PlannedRoute {
        route: RoutePlan {
            distance: "4.2 km".to_string(),
            duration: "36 minutes".to_string(),
            waypoints,
            path: FALLBACK_PATH.to_string(),
        },
        recommendations: format!(
            "Based on the request \"{prompt}\", we recommend deploying during the morning hours \
             (7-10 AM) for optimal lighting conditions. Use a drone with the higher capacity \
             battery for this mission."
        ),
    }
}

fn de_coordinate_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawCoordinate::deserialize(deserializer)? {
        RawCoordinate::Number(value) => value.to_string(),
        RawCoordinate::Text(text) => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDER_JSON: &str = r#"{
        "route": {
            "totalDistance": "3.1 km",
            "estimatedDuration": "24 minutes",
            "waypoints": [
                {"latitude": "37.7749", "longitude": "-122.4194", "description": "Start"},
                {"latitude": 37.7755, "longitude": -122.4170},
                {"latitude": "37.7770", "longitude": "-122.4140", "description": "End"}
            ]
        },
        "recommendations": "Fly early."
    }"#;

    #[test]
    fn test_provider_response_assigns_ids_and_path() {
        let planned = ProviderResponse::from_json(PROVIDER_JSON).unwrap().into_planned_route();
        let ids: Vec<_> = planned.route.waypoints.iter().map(|wp| wp.id.as_str()).collect();

        assert_eq!(ids, vec!["WP1", "WP2", "WP3"]);
        assert_eq!(planned.route.distance, "3.1 km");
        assert_eq!(planned.route.waypoints[1].latitude, "37.7755");
        assert!(planned.route.path.starts_with("M100,250 C"));
        assert_eq!(planned.recommendations, "Fly early.");
    }

    #[test]
    fn test_load_route_plan_accepts_both_shapes() {
        let from_provider = load_route_plan(PROVIDER_JSON).unwrap();
        assert_eq!(from_provider.waypoints.len(), 3);

        let stored = serde_json::to_string(&from_provider).unwrap();
        let reloaded = load_route_plan(&stored).unwrap();
        assert_eq!(reloaded, from_provider);
    }

    #[test]
    fn test_load_route_plan_rejects_malformed() {
        assert!(matches!(load_route_plan("not json"), Err(CoreError::RouteParse(_))));
        assert!(matches!(load_route_plan(r#"{"distance": "1 km"}"#), Err(CoreError::RouteParse(_))));
    }

    #[test]
    fn test_to_waypoints_tags_roles() {
        let waypoints = fallback_route_plan("flood survey").route.to_waypoints().unwrap();
        assert_eq!(waypoints.len(), 5);
        assert_eq!(waypoints[0].role, WaypointRole::Start);
        assert_eq!(waypoints[2].role, WaypointRole::Intermediate);
        assert_eq!(waypoints[4].role, WaypointRole::End);
        assert!((waypoints[4].position.longitude + 122.4138).abs() < 1e-9);
    }

    #[test]
    fn test_to_waypoints_rejects_bad_coordinate() {
        let mut plan = fallback_route_plan("x").route;
        plan.waypoints[2].latitude = "unknown".to_string();
        assert!(matches!(plan.to_waypoints(), Err(CoreError::InvalidCoordinate { .. })));
    }

    #[test]
    fn test_fallback_mentions_prompt() {
        let planned = fallback_route_plan("bridge inspection");
        assert!(planned.recommendations.contains("bridge inspection"));
        assert_eq!(planned.route.duration, "36 minutes");
    }
}
