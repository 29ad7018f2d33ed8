//! Line-segment geometry used by the range scanner.
//!
//! Everything here works in arena units with the screen convention
//! (`y` grows downward).

use serde::{Deserialize, Serialize};

use crate::core::Position;

/// Cross products below this magnitude are treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-9;

/// A directed line segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint
    pub start: Position,
    /// Second endpoint
    pub end: Position,
}

impl Segment {
    /// Create a segment from two endpoints
    #[inline]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Direction vector `end - start`
    #[inline]
    pub fn delta(&self) -> Position {
        self.end - self.start
    }

    /// Heading of the segment, `atan2(dy, dx)` in degrees.
    pub fn angle_degrees(&self) -> f32 {
        let d = self.delta();
        d.y.atan2(d.x).to_degrees()
    }

    /// Length of the segment
    pub fn length(&self) -> f32 {
        self.start.distance(&self.end)
    }

    /// True when `point` lies on the outward side of this edge.
    ///
    /// Edges from [`rectangle_edges`] wind clockwise on screen, so the outward
    /// normal of `(dx, dy)` is `(dy, -dx)`. Points on the edge line count as
    /// outside.
    pub fn faces(&self, point: Position) -> bool {
        let d = self.delta();
        let rel = point - self.start;
        rel.x * d.y - rel.y * d.x >= 0.0
    }
}

#[inline]
fn cross(a: Position, b: Position) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Parametric segment intersection test.
///
/// Endpoints are inclusive. Parallel and colinear segments never intersect.
pub fn segments_intersect(a: &Segment, b: &Segment) -> bool {
    let r = a.delta();
    let s = b.delta();
    let denom = cross(r, s);
    if denom.abs() < PARALLEL_EPSILON {
        return false;
    }

    let qp = b.start - a.start;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;

    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Perpendicular distance from `point` to the infinite line through
/// `start` and `end`.
///
/// A degenerate line (coincident endpoints) falls back to the point distance.
pub fn distance_to_line(start: Position, end: Position, point: Position) -> f32 {
    let d = end - start;
    let len = d.x.hypot(d.y);
    if len < PARALLEL_EPSILON {
        return start.distance(&point);
    }
    cross(d, point - start).abs() / len
}

/// Edges of an axis-aligned rectangle: top, right, bottom, left.
///
/// Wound clockwise on screen, giving edge angles of 0°, 90°, 180° and -90°.
pub fn rectangle_edges(origin: Position, width: f32, height: f32) -> [Segment; 4] {
    let tl = origin;
    let tr = Position::new(origin.x + width, origin.y);
    let br = Position::new(origin.x + width, origin.y + height);
    let bl = Position::new(origin.x, origin.y + height);
    [
        Segment::new(tl, tr),
        Segment::new(tr, br),
        Segment::new(br, bl),
        Segment::new(bl, tl),
    ]
}
