//! Core data models for routes and simulated drone telemetry.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, CoreResult};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPosition {
    #[serde(deserialize_with = "de_coordinate")]
    pub latitude: f64,
    #[serde(deserialize_with = "de_coordinate")]
    pub longitude: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Parse a position from decimal-degree strings such as `"37.7749"`.
    pub fn parse(latitude: &str, longitude: &str) -> CoreResult<Self> {
        Ok(Self {
            latitude: parse_coordinate(latitude)?,
            longitude: parse_coordinate(longitude)?,
        })
    }

    /// Linear interpolation towards `other`. `t` is clamped to [0, 1].
    pub fn lerp(&self, other: &GeoPosition, t: f64) -> GeoPosition {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return *other;
        }
        GeoPosition {
            latitude: self.latitude + t * (other.latitude - self.latitude),
            longitude: self.longitude + t * (other.longitude - self.longitude),
        }
    }

    pub fn offset(&self, dlat: f64, dlon: f64) -> GeoPosition {
        GeoPosition {
            latitude: self.latitude + dlat,
            longitude: self.longitude + dlon,
        }
    }
}

pub(crate) fn parse_coordinate(raw: &str) -> CoreResult<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidCoordinate {
            value: raw.to_string(),
            reason: "not a decimal number".to_string(),
        })?;

    if !value.is_finite() {
        return Err(CoreError::InvalidCoordinate {
            value: raw.to_string(),
            reason: "not finite".to_string(),
        });
    }
    Ok(value)
}

/// Coordinates arrive either as JSON numbers or as decimal strings.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum RawCoordinate {
    Number(f64),
    Text(String),
}

fn de_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawCoordinate::deserialize(deserializer)? {
        RawCoordinate::Number(value) if value.is_finite() => Ok(value),
        RawCoordinate::Number(value) => Err(serde::de::Error::custom(format!(
            "coordinate {value} is not finite"
        ))),
        RawCoordinate::Text(text) => parse_coordinate(&text).map_err(serde::de::Error::custom),
    }
}

/// Role of a waypoint within a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointRole {
    /// First point of the route
    Start,
    /// Final point of the route
    End,
    /// Any point in between
    #[serde(alias = "waypoint")]
    Intermediate,
}

/// A named point on a route. Order within a route defines traversal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    #[serde(flatten)]
    pub position: GeoPosition,
    /// Older dashboard payloads carry the role under `type`
    #[serde(alias = "type")]
    pub role: WaypointRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Waypoint {
    pub fn new(id: impl Into<String>, position: GeoPosition, role: WaypointRole) -> Self {
        Self {
            id: id.into(),
            position,
            role,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Static circular exclusion region. Rendered for reference only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoFlyZone {
    pub id: String,
    #[serde(flatten)]
    pub position: GeoPosition,
    /// Radius in canvas units, not meters
    pub radius_canvas_units: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NoFlyZone {
    pub fn new(id: impl Into<String>, position: GeoPosition, radius_canvas_units: f64) -> Self {
        Self {
            id: id.into(),
            position,
            radius_canvas_units,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Instantaneous simulated drone state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneTelemetry {
    pub position: GeoPosition,
    /// Heading in degrees, [0, 360)
    pub heading_deg: f64,
    pub altitude_m: f64,
    pub speed_kmh: f64,
    /// Battery level, [0, 100]
    pub battery_percent: f64,
}

impl Default for DroneTelemetry {
    fn default() -> Self {
        Self {
            position: GeoPosition::default(),
            heading_deg: 0.0,
            altitude_m: 0.0,
            speed_kmh: 0.0,
            battery_percent: 100.0,
        }
    }
}

impl DroneTelemetry {
    /// Merge a partial update into this telemetry.
    ///
    /// Non-finite values are ignored. Heading wraps into [0, 360), altitude
    /// and speed floor at zero, battery clamps to [0, 100].
    pub fn apply(&mut self, update: &TelemetryUpdate) {
        if let Some(position) = update.position {
            if position.latitude.is_finite() && position.longitude.is_finite() {
                self.position = position;
            }
        }
        if let Some(heading) = update.heading_deg.filter(|v| v.is_finite()) {
            self.heading_deg = heading.rem_euclid(360.0);
        }
        if let Some(altitude) = update.altitude_m.filter(|v| v.is_finite()) {
            self.altitude_m = altitude.max(0.0);
        }
        if let Some(speed) = update.speed_kmh.filter(|v| v.is_finite()) {
            self.speed_kmh = speed.max(0.0);
        }
        if let Some(battery) = update.battery_percent.filter(|v| v.is_finite()) {
            self.battery_percent = battery.clamp(0.0, 100.0);
        }
    }
}

/// Partial telemetry; `None` fields leave the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryUpdate {
    #[serde(default)]
    pub position: Option<GeoPosition>,
    #[serde(default)]
    pub heading_deg: Option<f64>,
    #[serde(default)]
    pub altitude_m: Option<f64>,
    #[serde(default)]
    pub speed_kmh: Option<f64>,
    #[serde(default)]
    pub battery_percent: Option<f64>,
}

impl TelemetryUpdate {
    pub fn position(position: GeoPosition) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }
}
