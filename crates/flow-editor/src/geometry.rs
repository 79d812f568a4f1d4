//! Edge path geometry and render classification
//!
//! Source handles sit on the right of a node and target handles on the
//! left, so edges read left to right. Each [`LineType`] maps to one path
//! function producing an SVG path and a label anchor; switching line type
//! never touches node or edge data.

use serde::Serialize;

use crate::types::{FlowEdge, LineType, MarkerType, Position};

/// Corner radius used by smoothstep paths
pub const SMOOTHSTEP_RADIUS: f64 = 8.0;

/// Bezier control point curvature
pub const BEZIER_CURVATURE: f64 = 0.25;

/// Distance a step path travels out of a handle before turning
pub const STEP_OFFSET: f64 = 20.0;

/// Stroke for edges running right to left
pub const BACKWARD_STROKE: &str = "#f59e0b";

/// Dash pattern for edges running right to left
pub const BACKWARD_DASH: &str = "6 4";

/// Handle coordinates of an edge's two ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEndpoints {
    pub source: Position,
    pub target: Position,
}

impl EdgeEndpoints {
    pub fn new(source: Position, target: Position) -> Self {
        Self { source, target }
    }
}

/// A computed edge path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgePath {
    /// SVG path data
    pub path: String,
    /// Label anchor x
    pub label_x: f64,
    /// Label anchor y
    pub label_y: f64,
}

/// Compute the path for `line_type`
pub fn edge_path(line_type: LineType, endpoints: EdgeEndpoints) -> EdgePath {
    match line_type {
        LineType::Bezier => bezier_path(endpoints),
        LineType::Straight => straight_path(endpoints),
        LineType::Step => step_path(endpoints, 0.0),
        LineType::Smoothstep => step_path(endpoints, SMOOTHSTEP_RADIUS),
    }
}

fn control_offset(distance: f64) -> f64 {
    if distance >= 0.0 {
        0.5 * distance
    } else {
        BEZIER_CURVATURE * 25.0 * (-distance).sqrt()
    }
}

/// Cubic bezier leaving the source horizontally and entering the target horizontally
pub fn bezier_path(endpoints: EdgeEndpoints) -> EdgePath {
    let EdgeEndpoints { source: s, target: t } = endpoints;
    let offset = control_offset(t.x - s.x);
    let source_control = Position::new(s.x + offset, s.y);
    let target_control = Position::new(t.x - offset, t.y);

    // Point at t = 0.5 on the curve
    let label_x = s.x * 0.125 + source_control.x * 0.375 + target_control.x * 0.375 + t.x * 0.125;
    let label_y = s.y * 0.125 + source_control.y * 0.375 + target_control.y * 0.375 + t.y * 0.125;

    EdgePath {
        path: format!(
            "M{},{} C{},{} {},{} {},{}",
            s.x, s.y, source_control.x, source_control.y, target_control.x, target_control.y, t.x, t.y
        ),
        label_x,
        label_y,
    }
}

/// Straight segment between the handles
pub fn straight_path(endpoints: EdgeEndpoints) -> EdgePath {
    let EdgeEndpoints { source: s, target: t } = endpoints;
    EdgePath {
        path: format!("M{},{} L{},{}", s.x, s.y, t.x, t.y),
        label_x: (s.x + t.x) / 2.0,
        label_y: (s.y + t.y) / 2.0,
    }
}

/// Orthogonal path; `radius` rounds the corners (0 gives sharp steps)
pub fn step_path(endpoints: EdgeEndpoints, radius: f64) -> EdgePath {
    let EdgeEndpoints { source: s, target: t } = endpoints;
    let mid_x = (s.x + t.x) / 2.0;
    let mid_y = (s.y + t.y) / 2.0;

    let corners = if t.x - s.x >= 2.0 * STEP_OFFSET {
        vec![Position::new(mid_x, s.y), Position::new(mid_x, t.y)]
    } else {
        // Not enough room to turn once: leave the source, run back
        // along the midline and enter the target from its left.
        let out_x = s.x + STEP_OFFSET;
        let in_x = t.x - STEP_OFFSET;
        vec![
            Position::new(out_x, s.y),
            Position::new(out_x, mid_y),
            Position::new(in_x, mid_y),
            Position::new(in_x, t.y),
        ]
    };

    let mut points = Vec::with_capacity(corners.len() + 2);
    points.push(s);
    points.extend(corners);
    points.push(t);

    let mut path = format!("M{},{}", s.x, s.y);
    for window in points.windows(3) {
        path.push_str(&bend(window[0], window[1], window[2], radius));
    }
    path.push_str(&format!(" L{},{}", t.x, t.y));

    EdgePath {
        path,
        label_x: mid_x,
        label_y: mid_y,
    }
}

fn distance(a: Position, b: Position) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Path segment turning at `b` on the way from `a` to `c`
fn bend(a: Position, b: Position, c: Position, radius: f64) -> String {
    let size = (distance(a, b) / 2.0).min(distance(b, c) / 2.0).min(radius);
    let collinear = (a.x == b.x && b.x == c.x) || (a.y == b.y && b.y == c.y);
    if size <= 0.0 || collinear {
        return format!(" L{},{}", b.x, b.y);
    }

    if a.y == b.y {
        let x_dir = if a.x < c.x { -1.0 } else { 1.0 };
        let y_dir = if a.y < c.y { 1.0 } else { -1.0 };
        format!(
            " L{},{} Q{},{} {},{}",
            b.x + size * x_dir,
            b.y,
            b.x,
            b.y,
            b.x,
            b.y + size * y_dir
        )
    } else {
        let x_dir = if a.x < c.x { 1.0 } else { -1.0 };
        let y_dir = if a.y < c.y { -1.0 } else { 1.0 };
        format!(
            " L{},{} Q{},{} {},{}",
            b.x,
            b.y + size * y_dir,
            b.x,
            b.y,
            b.x + size * x_dir,
            b.y
        )
    }
}

/// Whether an edge follows the left-to-right reading order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    Forward,
    Backward,
}

impl EdgeDirection {
    /// `Forward` when the source node sits strictly left of the target node
    pub fn classify(source: Position, target: Position) -> Self {
        if source.x < target.x {
            EdgeDirection::Forward
        } else {
            EdgeDirection::Backward
        }
    }
}

/// Resolved stroke for drawing an edge
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeVisual {
    pub stroke: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<&'static str>,
    pub animated: bool,
    pub stroke_width: f32,
    pub marker_end: MarkerType,
}

/// Stroke for `edge` given its direction
///
/// Backward edges are amber and dashed and never animate, whatever their
/// `animated` flag says.
pub fn edge_visual(edge: &FlowEdge, direction: EdgeDirection) -> EdgeVisual {
    match direction {
        EdgeDirection::Forward => EdgeVisual {
            stroke: edge.data.data_type.color(),
            dash_array: None,
            animated: edge.data.animated,
            stroke_width: edge.data.stroke_width,
            marker_end: edge.data.marker_end,
        },
        EdgeDirection::Backward => EdgeVisual {
            stroke: BACKWARD_STROKE,
            dash_array: Some(BACKWARD_DASH),
            animated: false,
            stroke_width: edge.data.stroke_width,
            marker_end: edge.data.marker_end,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EdgeData, FlowDataType};

    fn ends(sx: f64, sy: f64, tx: f64, ty: f64) -> EdgeEndpoints {
        EdgeEndpoints::new(Position::new(sx, sy), Position::new(tx, ty))
    }

    fn animated_edge() -> FlowEdge {
        FlowEdge {
            id: "e1".to_string(),
            source: "a".to_string(),
            target: "b".to_string(),
            source_handle: None,
            target_handle: None,
            data: EdgeData {
                data_type: FlowDataType::Json,
                animated: true,
                line_type: LineType::Bezier,
                stroke_width: 2.0,
                marker_end: MarkerType::ArrowClosed,
                label: None,
            },
        }
    }

    #[test]
    fn test_bezier_forward() {
        let path = bezier_path(ends(0.0, 0.0, 100.0, 50.0));
        assert_eq!(path.path, "M0,0 C50,0 50,50 100,50");
        assert_eq!(path.label_x, 50.0);
        assert_eq!(path.label_y, 25.0);
    }

    #[test]
    fn test_bezier_backward_bulges_outward() {
        let path = bezier_path(ends(100.0, 0.0, 0.0, 0.0));
        // offset = 0.25 * 25 * sqrt(100) = 62.5
        assert_eq!(path.path, "M100,0 C162.5,0 -62.5,0 0,0");
    }

    #[test]
    fn test_straight() {
        let path = straight_path(ends(0.0, 10.0, 40.0, 30.0));
        assert_eq!(path.path, "M0,10 L40,30");
        assert_eq!((path.label_x, path.label_y), (20.0, 20.0));
    }

    #[test]
    fn test_step_has_sharp_corners() {
        let path = step_path(ends(0.0, 0.0, 100.0, 60.0), 0.0);
        assert_eq!(path.path, "M0,0 L50,0 L50,60 L100,60");
        assert_eq!((path.label_x, path.label_y), (50.0, 30.0));
    }

    #[test]
    fn test_smoothstep_rounds_corners() {
        let path = edge_path(LineType::Smoothstep, ends(0.0, 0.0, 100.0, 60.0));
        assert_eq!(path.path, "M0,0 L42,0 Q50,0 50,8 L50,52 Q50,60 58,60 L100,60");

        let step = edge_path(LineType::Step, ends(0.0, 0.0, 100.0, 60.0));
        assert_eq!((path.label_x, path.label_y), (step.label_x, step.label_y));
        assert!(!step.path.contains('Q'));
    }

    #[test]
    fn test_step_routes_around_backward_edge() {
        let path = step_path(ends(100.0, 0.0, 0.0, 40.0), 0.0);
        assert_eq!(path.path, "M100,0 L120,0 L120,20 L-20,20 L-20,40 L0,40");
    }

    #[test]
    fn test_straight_horizontal_step_has_no_bends() {
        let path = step_path(ends(0.0, 0.0, 100.0, 0.0), SMOOTHSTEP_RADIUS);
        assert!(!path.path.contains('Q'));
        assert!(path.path.starts_with("M0,0"));
        assert!(path.path.ends_with("L100,0"));
    }

    #[test]
    fn test_classify_direction() {
        let left = Position::new(0.0, 0.0);
        let right = Position::new(200.0, 0.0);
        assert_eq!(EdgeDirection::classify(left, right), EdgeDirection::Forward);
        assert_eq!(EdgeDirection::classify(right, left), EdgeDirection::Backward);
        // Vertically stacked nodes count as backward
        assert_eq!(
            EdgeDirection::classify(left, Position::new(0.0, 100.0)),
            EdgeDirection::Backward
        );
    }

    #[test]
    fn test_backward_edges_never_animate() {
        let edge = animated_edge();

        let forward = edge_visual(&edge, EdgeDirection::Forward);
        assert!(forward.animated);
        assert_eq!(forward.stroke, FlowDataType::Json.color());
        assert!(forward.dash_array.is_none());

        let backward = edge_visual(&edge, EdgeDirection::Backward);
        assert!(!backward.animated);
        assert_eq!(backward.stroke, BACKWARD_STROKE);
        assert_eq!(backward.dash_array, Some(BACKWARD_DASH));
    }
}
