//! Route geometry: canvas layout and smoothed path construction.
//!
//! Waypoints are laid out on a fixed-size canvas with an even horizontal
//! spread and a sinusoidal vertical offset. This is a display heuristic,
//! not a map projection. Paths through the laid-out points are built from
//! cubic segments whose control points follow fixed ratios so the output
//! matches the SVG paths the dashboard already renders.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::models::{Waypoint, WaypointRole};

pub const DEFAULT_CANVAS_WIDTH: f64 = 1000.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 500.0;
const DEFAULT_MARGIN: f64 = 100.0;
const DEFAULT_AMPLITUDE: f64 = 100.0;

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn lerp(self, other: CanvasPoint, t: f64) -> CanvasPoint {
        if t >= 1.0 {
            return other;
        }
        CanvasPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Canvas dimensions and layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasLayout {
    pub width: f64,
    pub height: f64,
    /// Horizontal inset on both sides
    pub margin: f64,
    /// Peak vertical offset from the centre line
    pub amplitude: f64,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            margin: DEFAULT_MARGIN,
            amplitude: DEFAULT_AMPLITUDE,
        }
    }
}

impl CanvasLayout {
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Lay out `count` points left to right.
    pub fn project(&self, count: usize) -> Vec<CanvasPoint> {
        let spacing = (self.width - 2.0 * self.margin) / count.saturating_sub(1).max(1) as f64;

        (0..count)
            .map(|i| {
                let index = i as f64;
                let x = self.margin + index * spacing;
                let y = (index * PI / 4.0).sin() * self.amplitude + self.height / 2.0;
                CanvasPoint { x, y }
            })
            .collect()
    }
}

/// Map each waypoint to canvas coordinates by its index in the route.
pub fn project_to_canvas(waypoints: &[Waypoint], width: f64, height: f64) -> Vec<CanvasPoint> {
    CanvasLayout::with_size(width, height).project(waypoints.len())
}

/// A single drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { to: CanvasPoint },
    LineTo { to: CanvasPoint },
    CubicTo {
        c1: CanvasPoint,
        c2: CanvasPoint,
        to: CanvasPoint,
    },
}

impl PathCommand {
    fn target(&self) -> CanvasPoint {
        match *self {
            PathCommand::MoveTo { to } | PathCommand::LineTo { to } => to,
            PathCommand::CubicTo { to, .. } => to,
        }
    }
}

/// Ordered drawing instructions for one path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveDescriptor {
    pub commands: Vec<PathCommand>,
}

impl CurveDescriptor {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn start_point(&self) -> Option<CanvasPoint> {
        self.commands.first().map(PathCommand::target)
    }

    pub fn end_point(&self) -> Option<CanvasPoint> {
        self.commands.last().map(PathCommand::target)
    }

    /// Drawn segments as `(from, command)` pairs, in the form the SVG output
    /// renders them. A cubic that follows another cubic is written with `S`,
    /// so its first control point is the reflection of the previous second
    /// control point about the shared endpoint.
    fn drawn_segments(&self) -> Vec<(CanvasPoint, PathCommand)> {
        let mut segments = Vec::with_capacity(self.commands.len());
        let mut cursor = match self.start_point() {
            Some(point) => point,
            None => return segments,
        };
        let mut prev_c2: Option<CanvasPoint> = None;

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo { to } => {
                    cursor = to;
                    prev_c2 = None;
                }
                PathCommand::LineTo { to } => {
                    segments.push((cursor, *command));
                    cursor = to;
                    prev_c2 = None;
                }
                PathCommand::CubicTo { c1, c2, to } => {
                    let c1 = match prev_c2 {
                        Some(prev) => CanvasPoint::new(2.0 * cursor.x - prev.x, 2.0 * cursor.y - prev.y),
                        None => c1,
                    };
                    segments.push((cursor, PathCommand::CubicTo { c1, c2, to }));
                    cursor = to;
                    prev_c2 = Some(c2);
                }
            }
        }
        segments
    }

    /// Sample the drawn curve at `t` in [0, 1]. Each segment takes an equal
    /// share of `t`, so `point_at(1.0)` is always the end point.
    pub fn point_at(&self, t: f64) -> Option<CanvasPoint> {
        let start = self.start_point()?;
        let segments = self.drawn_segments();
        if segments.is_empty() {
            return Some(self.end_point().unwrap_or(start));
        }

        let count = segments.len();
        let scaled = t.clamp(0.0, 1.0) * count as f64;
        let index = (scaled.floor() as usize).min(count - 1);
        let local = scaled - index as f64;
        let (from, command) = segments[index];

        let point = match command {
            PathCommand::LineTo { to } => from.lerp(to, local),
            PathCommand::CubicTo { c1, c2, to } => cubic_point(from, c1, c2, to, local),
            PathCommand::MoveTo { to } => to,
        };
        Some(point)
    }

    /// Render as an SVG path string. A cubic directly after another cubic uses
    /// the smooth shorthand (`S`); any other cubic is written in full (`C`).
    pub fn to_svg_path(&self) -> String {
        let mut out = String::new();
        let mut after_cubic = false;

        for command in &self.commands {
            if !out.is_empty() {
                out.push(' ');
            }
            match command {
                PathCommand::MoveTo { to } => out.push_str(&format!("M{},{}", to.x, to.y)),
                PathCommand::LineTo { to } => out.push_str(&format!("L{},{}", to.x, to.y)),
                PathCommand::CubicTo { c1, c2, to } if !after_cubic => {
                    out.push_str(&format!(
                        "C{},{} {},{} {},{}",
                        c1.x, c1.y, c2.x, c2.y, to.x, to.y
                    ));
                }
                PathCommand::CubicTo { c2, to, .. } => {
                    out.push_str(&format!("S{},{} {},{}", c2.x, c2.y, to.x, to.y));
                }
            }
            after_cubic = matches!(command, PathCommand::CubicTo { .. });
        }
        out
    }
}

fn cubic_point(p0: CanvasPoint, c1: CanvasPoint, c2: CanvasPoint, p3: CanvasPoint, u: f64) -> CanvasPoint {
    let v = 1.0 - u;
    let (a, b, c, d) = (v * v * v, 3.0 * v * v * u, 3.0 * v * u * u, u * u * u);
    CanvasPoint {
        x: a * p0.x + b * c1.x + c * c2.x + d * p3.x,
        y: a * p0.y + b * c1.y + c * c2.y + d * p3.y,
    }
}

/// Build a path through canvas points.
///
/// Fewer than two points yield an empty path, two points a straight line,
/// more a chain of cubic segments.
pub fn build_path(points: &[CanvasPoint]) -> CurveDescriptor {
    if points.len() < 2 {
        return CurveDescriptor::default();
    }

    let first = points[0];
    let mut commands = Vec::with_capacity(points.len());
    commands.push(PathCommand::MoveTo { to: first });

    if points.len() == 2 {
        commands.push(PathCommand::LineTo { to: points[1] });
        return CurveDescriptor { commands };
    }

    for i in 1..points.len() {
        let prev = points[i - 1];
        let cur = points[i];

        let command = if i == 1 {
            let mid_x = prev.x + (cur.x - prev.x) / 2.0;
            PathCommand::CubicTo {
                c1: CanvasPoint::new(mid_x, prev.y),
                c2: CanvasPoint::new(mid_x, cur.y),
                to: cur,
            }
        } else {
            PathCommand::CubicTo {
                c1: CanvasPoint::new(prev.x + (cur.x - prev.x) / 3.0, prev.y + (cur.y - prev.y) / 6.0),
                c2: CanvasPoint::new(prev.x + 2.0 * (cur.x - prev.x) / 3.0, cur.y - (cur.y - prev.y) / 6.0),
                to: cur,
            }
        };
        commands.push(command);
    }

    CurveDescriptor { commands }
}

/// A drawable path with its display flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub curve: CurveDescriptor,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub dashed: bool,
}

/// Tagged waypoints together with the paths derived from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub waypoints: Vec<Waypoint>,
    pub paths: Vec<PathSegment>,
}

impl RouteGeometry {
    pub fn start(&self) -> Option<&Waypoint> {
        self.waypoints.iter().find(|wp| wp.role == WaypointRole::Start)
    }

    pub fn end(&self) -> Option<&Waypoint> {
        self.waypoints.iter().rev().find(|wp| wp.role == WaypointRole::End)
    }

    /// The path the drone marker follows.
    pub fn primary_path(&self) -> Option<&PathSegment> {
        self.paths.first()
    }
}

/// Tag the first waypoint as start, the last as end, the rest intermediate.
pub fn tag_roles(waypoints: &mut [Waypoint]) {
    let last = waypoints.len().saturating_sub(1);
    for (i, wp) in waypoints.iter_mut().enumerate() {
        wp.role = if i == 0 {
            WaypointRole::Start
        } else if i == last {
            WaypointRole::End
        } else {
            WaypointRole::Intermediate
        };
    }
}

/// Tag a copy of `waypoints` and derive a single completed, animated path.
pub fn build_route_from_waypoints(waypoints: &[Waypoint]) -> RouteGeometry {
    if waypoints.is_empty() {
        return RouteGeometry::default();
    }

    let mut tagged = waypoints.to_vec();
    tag_roles(&mut tagged);

    let points = project_to_canvas(&tagged, DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT);
    let path = PathSegment {
        curve: build_path(&points),
        animated: true,
        completed: true,
        dashed: false,
    };

    RouteGeometry {
        waypoints: tagged,
        paths: vec![path],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPosition;

    fn waypoints(n: usize) -> Vec<Waypoint> {
        (0..n)
            .map(|i| {
                Waypoint::new(
                    format!("wp{}", i + 1),
                    GeoPosition::new(37.0 + i as f64 * 0.001, -122.0),
                    WaypointRole::Intermediate,
                )
            })
            .collect()
    }

    #[test]
    fn test_project_empty_and_single() {
        assert!(project_to_canvas(&[], 1000.0, 500.0).is_empty());

        let single = project_to_canvas(&waypoints(1), 1000.0, 500.0);
        assert_eq!(single, vec![CanvasPoint::new(100.0, 250.0)]);
    }

    #[test]
    fn test_project_spreads_points_horizontally() {
        for n in 2..12 {
            let points = project_to_canvas(&waypoints(n), 1000.0, 500.0);
            assert_eq!(points.len(), n);
            assert!(points.windows(2).all(|w| w[1].x > w[0].x));
            assert!((points[0].x - 100.0).abs() < 1e-9);
            assert!((points[n - 1].x - 900.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_project_vertical_offset() {
        let points = project_to_canvas(&waypoints(5), 1000.0, 500.0);
        // sin(pi/2) peak at index 2
        assert!((points[2].y - 350.0).abs() < 1e-9);
        assert!((points[0].y - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_path_degenerate() {
        assert!(build_path(&[]).is_empty());
        assert!(build_path(&[CanvasPoint::new(1.0, 2.0)]).is_empty());
    }

    #[test]
    fn test_build_path_two_points_is_line() {
        let path = build_path(&[CanvasPoint::new(100.0, 250.0), CanvasPoint::new(900.0, 320.0)]);
        assert_eq!(
            path.commands,
            vec![
                PathCommand::MoveTo { to: CanvasPoint::new(100.0, 250.0) },
                PathCommand::LineTo { to: CanvasPoint::new(900.0, 320.0) },
            ]
        );
        assert_eq!(path.to_svg_path(), "M100,250 L900,320");
    }

    #[test]
    fn test_build_path_control_point_ratios() {
        let points = [
            CanvasPoint::new(0.0, 0.0),
            CanvasPoint::new(60.0, 30.0),
            CanvasPoint::new(120.0, 90.0),
        ];
        let path = build_path(&points);
        assert_eq!(path.commands.len(), 3);

        match path.commands[1] {
            PathCommand::CubicTo { c1, c2, to } => {
                assert_eq!(c1, CanvasPoint::new(30.0, 0.0));
                assert_eq!(c2, CanvasPoint::new(30.0, 30.0));
                assert_eq!(to, points[1]);
            }
            other => panic!("unexpected {:?}", other),
        }
        match path.commands[2] {
            PathCommand::CubicTo { c1, c2, to } => {
                assert_eq!(c1, CanvasPoint::new(80.0, 40.0));
                assert_eq!(c2, CanvasPoint::new(100.0, 80.0));
                assert_eq!(to, points[2]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(path.to_svg_path(), "M0,0 C30,0 30,30 60,30 S100,80 120,90");
    }

    #[test]
    fn test_smooth_segment_samples_reflected_control_point() {
        let points = [
            CanvasPoint::new(0.0, 0.0),
            CanvasPoint::new(60.0, 30.0),
            CanvasPoint::new(120.0, 90.0),
        ];
        let path = build_path(&points);
        let segments = path.drawn_segments();
        assert_eq!(segments.len(), 2);

        let prev_c2 = match segments[0].1 {
            PathCommand::CubicTo { c2, .. } => c2,
            other => panic!("unexpected {:?}", other),
        };
        match segments[1] {
            (from, PathCommand::CubicTo { c1, c2, to }) => {
                assert_eq!(from, points[1]);
                assert_eq!(c1, CanvasPoint::new(2.0 * from.x - prev_c2.x, 2.0 * from.y - prev_c2.y));
                assert_eq!(c1, CanvasPoint::new(90.0, 30.0));
                assert_eq!(c2, CanvasPoint::new(100.0, 80.0));
                assert_eq!(to, points[2]);

                let sampled = path.point_at(0.75);
                assert_eq!(sampled, Some(cubic_point(from, c1, c2, to, 0.5)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_curve_ends_on_last_point() {
        for n in 3..10 {
            let points = project_to_canvas(&waypoints(n), 1000.0, 500.0);
            let path = build_path(&points);
            assert_eq!(path.end_point(), points.last().copied());
            assert_eq!(path.point_at(1.0), points.last().copied());
            assert_eq!(path.point_at(0.0), points.first().copied());
        }
    }

    #[test]
    fn test_point_at_line_midpoint() {
        let path = build_path(&[CanvasPoint::new(0.0, 0.0), CanvasPoint::new(10.0, 20.0)]);
        assert_eq!(path.point_at(0.5), Some(CanvasPoint::new(5.0, 10.0)));
        assert_eq!(CurveDescriptor::default().point_at(0.5), None);
    }

    #[test]
    fn test_build_route_tags_roles() {
        let route = build_route_from_waypoints(&waypoints(4));
        let roles: Vec<_> = route.waypoints.iter().map(|wp| wp.role).collect();
        assert_eq!(
            roles,
            vec![
                WaypointRole::Start,
                WaypointRole::Intermediate,
                WaypointRole::Intermediate,
                WaypointRole::End,
            ]
        );
        assert_eq!(route.paths.len(), 1);
        assert!(route.paths[0].animated);
        assert!(route.paths[0].completed);
        assert!(!route.paths[0].dashed);
        assert_eq!(route.start().map(|wp| wp.id.as_str()), Some("wp1"));
        assert_eq!(route.end().map(|wp| wp.id.as_str()), Some("wp4"));
    }

    #[test]
    fn test_build_route_degenerate_inputs() {
        let empty = build_route_from_waypoints(&[]);
        assert!(empty.waypoints.is_empty());
        assert!(empty.paths.is_empty());

        let single = build_route_from_waypoints(&waypoints(1));
        assert_eq!(single.waypoints[0].role, WaypointRole::Start);
        assert_eq!(single.paths.len(), 1);
        assert!(single.paths[0].curve.is_empty());
    }
}
