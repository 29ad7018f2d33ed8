//! Fusing four-direction scans into the discovered map.
//!
//! Each reading is walked outward from the robot cell along its axis:
//!
//! ```text
//!   reading r > 0:   [robot] F F F ... F O        O holds the point just past the edge
//!   reading 0:       [robot] F F F ... F          up to floor(scan_radius)
//! ```
//!
//! Later observations overwrite earlier ones, so a cell once marked occupied
//! can be freed by a scan that sees past it.

use disha_map::{
    CellState, Direction, DiscoveredMap, GridCoord, GridFrame, Position, SurroundingDistances,
};
use tracing::trace;

/// Writes scan readings into a [`DiscoveredMap`].
#[derive(Clone, Copy, Debug)]
pub struct ScanMapper {
    frame: GridFrame,
    scan_radius: f32,
}

impl ScanMapper {
    pub fn new(frame: GridFrame, scan_radius: f32) -> Self {
        Self { frame, scan_radius }
    }

    /// Fuse one scan taken at `origin`.
    ///
    /// Cells that fall outside the grid are skipped.
    pub fn fuse(&self, map: &mut DiscoveredMap, origin: Position, readings: &SurroundingDistances) {
        let center = self.frame.to_cell(origin);
        map.set(center, CellState::Free);

        for direction in Direction::ALL {
            let horizontal = matches!(direction, Direction::Left | Direction::Right);
            let reading = readings.get(direction);
            let delta = direction.grid_delta();
            let along = |k: i32| GridCoord::new(center.x + delta.x * k, center.y + delta.y * k);

            if reading > 0.0 {
                let cell = if horizontal {
                    self.frame.cell_width
                } else {
                    self.frame.cell_height
                };
                // Half a cell past the edge lands inside the obstacle on both sides
                let beyond = self.frame.to_cell(origin + direction.offset(reading + 0.5 * cell));
                let hit = center.manhattan_distance(&beyond).max(1);
                for k in 1..hit {
                    map.set(along(k), CellState::Free);
                }
                map.set(along(hit), CellState::Occupied);
            } else {
                let reach = self.frame.cells_along(horizontal, self.scan_radius).floor() as i32;
                for k in 1..=reach {
                    map.set(along(k), CellState::Free);
                }
            }
        }

        trace!(
            "Fused scan at ({}, {}): up={:.1} down={:.1} left={:.1} right={:.1}",
            center.x, center.y, readings.up, readings.down, readings.left, readings.right
        );
    }
}
