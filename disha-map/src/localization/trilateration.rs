//! Closed-form trilateration from three anchor ranges.

use rand::Rng;

use super::{AnchorSet, LocalizationError, TagBearing, UwbTag};
use crate::core::Position;

/// Determinants below this magnitude mean the anchors are colinear.
pub const DEGENERATE_DETERMINANT: f64 = 1e-6;

/// Round-off allowed below an integer before flooring drops a whole unit.
const FLOOR_TOLERANCE: f64 = 1e-3;

/// Determinant of the circle-difference system for anchors `p1`, `p2`, `p3`.
pub(crate) fn determinant(p1: Position, p2: Position, p3: Position) -> f64 {
    let a = 2.0 * (p2.x as f64 - p1.x as f64);
    let b = 2.0 * (p2.y as f64 - p1.y as f64);
    let d = 2.0 * (p3.x as f64 - p2.x as f64);
    let e = 2.0 * (p3.y as f64 - p2.y as f64);
    a * e - b * d
}

/// Solve for the tag position from exactly three bearings.
///
/// Subtracting the circle equations of anchors 1−2 and 2−3 gives a linear
/// 2×2 system solved with Cramer's rule.
pub fn trilaterate(bearings: &[TagBearing]) -> Result<Position, LocalizationError> {
    let [b1, b2, b3] = bearings else {
        return Err(LocalizationError::InvalidReadingCount {
            count: bearings.len(),
        });
    };

    let (x1, y1) = (b1.anchor_position.x as f64, b1.anchor_position.y as f64);
    let (x2, y2) = (b2.anchor_position.x as f64, b2.anchor_position.y as f64);
    let (x3, y3) = (b3.anchor_position.x as f64, b3.anchor_position.y as f64);
    let (r1, r2, r3) = (b1.distance as f64, b2.distance as f64, b3.distance as f64);

    let a = 2.0 * (x2 - x1);
    let b = 2.0 * (y2 - y1);
    let c = r1 * r1 - r2 * r2 - x1 * x1 + x2 * x2 - y1 * y1 + y2 * y2;
    let d = 2.0 * (x3 - x2);
    let e = 2.0 * (y3 - y2);
    let f = r2 * r2 - r3 * r3 - x2 * x2 + x3 * x3 - y2 * y2 + y3 * y3;

    let det = a * e - b * d;
    if det.abs() < DEGENERATE_DETERMINANT {
        return Err(LocalizationError::DegenerateAnchorGeometry { determinant: det });
    }

    let x = (c * e - f * b) / det;
    let y = (a * f - c * d) / det;
    Ok(Position::new(x as f32, y as f32))
}

/// Mean of `samples` independent noisy fixes, floored on each axis.
///
/// Stateless: every call draws fresh readings.
pub fn averaged_estimate<R: Rng + ?Sized>(
    tag: &UwbTag,
    position: Position,
    anchors: &AnchorSet,
    samples: usize,
    rng: &mut R,
) -> Result<Position, LocalizationError> {
    if samples == 0 {
        return Err(LocalizationError::InvalidReadingCount { count: 0 });
    }
    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    for _ in 0..samples {
        let fix = trilaterate(&tag.bearing(position, anchors, rng))?;
        sum_x += fix.x as f64;
        sum_y += fix.y as f64;
    }
    let n = samples as f64;
    Ok(Position::new(
        (sum_x / n + FLOOR_TOLERANCE).floor() as f32,
        (sum_y / n + FLOOR_TOLERANCE).floor() as f32,
    ))
}
