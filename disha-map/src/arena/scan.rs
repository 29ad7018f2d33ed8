//! Four-direction range scan against obstacle edges and the arena boundary.

use log::{trace, warn};
use serde::{Deserialize, Serialize};

use super::Rect;
use crate::core::{Direction, Position};
use crate::geometry::{Segment, distance_to_line, segments_intersect};

/// Range readings in the four cardinal directions.
///
/// A reading of 0 means nothing was detected within the scan radius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurroundingDistances {
    pub up: f32,
    pub down: f32,
    pub left: f32,
    pub right: f32,
}

impl SurroundingDistances {
    /// Reading in `direction`
    #[inline]
    pub fn get(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    fn slot(&mut self, direction: Direction) -> &mut f32 {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Record `distance` unless a nearer reading already exists.
    fn keep_nearest(&mut self, direction: Direction, distance: f32) {
        let slot = self.slot(direction);
        if *slot == 0.0 || distance < *slot {
            *slot = distance;
        }
    }

    /// True when every direction is clear
    pub fn is_clear(&self) -> bool {
        Direction::ALL.iter().all(|d| self.get(*d) == 0.0)
    }
}

/// Bucket an obstacle edge by its heading.
///
/// `[-45°, 45°]` is down, `(45°, 135°]` is left, `(135°, 180°] ∪ [-180°, -135°]`
/// is up and the rest is right. Ties at ±45° go down, 135° goes left and -135°
/// goes up.
pub fn bucket_for_angle(angle_degrees: f32) -> Direction {
    if (-45.0..=45.0).contains(&angle_degrees) {
        Direction::Down
    } else if angle_degrees > 45.0 && angle_degrees <= 135.0 {
        Direction::Left
    } else if angle_degrees > 135.0 || angle_degrees <= -135.0 {
        Direction::Up
    } else {
        Direction::Right
    }
}

/// Result of a scan, with the edges that contributed for debug drawing.
#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    pub distances: SurroundingDistances,
    pub considered: Vec<Segment>,
}

/// Range scanner bound to the arena extent and scan margin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scanner {
    pub width: f32,
    pub height: f32,
    /// Inflation applied to every obstacle before scanning
    pub margin: f32,
}

impl Scanner {
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Cast four probes of length `radius` from `origin`.
    ///
    /// Only obstacle edges that cross a probe and whose outward face looks
    /// toward `origin` count. Boundary walls nearer than `radius` override
    /// their bucket when they are the nearest reading.
    pub fn scan<'a>(
        &self,
        obstacles: impl IntoIterator<Item = &'a Rect>,
        origin: Position,
        radius: f32,
    ) -> ScanReport {
        let mut report = ScanReport::default();
        if radius <= 0.0 {
            warn!("[Scan] Non-positive radius {:.2}, reporting nothing", radius);
            return report;
        }

        let probes = Direction::ALL.map(|d| Segment::new(origin, origin + d.offset(radius)));

        for rect in obstacles {
            for edge in rect.inflate(self.margin).edges() {
                if !edge.faces(origin) {
                    continue;
                }
                if !probes.iter().any(|probe| segments_intersect(probe, &edge)) {
                    continue;
                }
                let distance = distance_to_line(edge.start, edge.end, origin);
                let bucket = bucket_for_angle(edge.angle_degrees());
                report.distances.keep_nearest(bucket, distance);
                report.considered.push(edge);
            }
        }

        let walls = [
            (Direction::Up, origin.y),
            (Direction::Down, self.height - origin.y),
            (Direction::Left, origin.x),
            (Direction::Right, self.width - origin.x),
        ];
        for (direction, distance) in walls {
            if distance < radius {
                report.distances.keep_nearest(direction, distance);
            }
        }

        trace!(
            "[Scan] ({:.1},{:.1}) r={:.1}: up={:.2} down={:.2} left={:.2} right={:.2} edges={}",
            origin.x,
            origin.y,
            radius,
            report.distances.up,
            report.distances.down,
            report.distances.left,
            report.distances.right,
            report.considered.len()
        );
        report
    }
}
