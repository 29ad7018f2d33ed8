//! Configuration sections owned by the map library.
//!
//! Each section deserializes with per-field defaults, so a partial TOML
//! table (or none at all) is always valid.

pub(crate) mod defaults;

use serde::{Deserialize, Serialize};

use crate::arena::Rect;
use crate::core::{GridCoord, Position};
use crate::grid::GRID_SIZE;

/// Obstacle layout of the reference arena as `[x, y, width, height]`.
const REFERENCE_LAYOUT: [[f32; 4]; 11] = [
    [0.0, 0.0, 25.0, 10.0],
    [10.0, 20.0, 15.0, 15.0],
    [10.0, 45.0, 20.0, 15.0],
    [0.0, 70.0, 30.0, 20.0],
    [40.0, 85.0, 25.0, 15.0],
    [40.0, 70.0, 10.0, 15.0],
    [75.0, 85.0, 25.0, 15.0],
    [60.0, 40.0, 30.0, 35.0],
    [40.0, 40.0, 20.0, 20.0],
    [70.0, 10.0, 20.0, 20.0],
    [35.0, 10.0, 25.0, 20.0],
];

/// The eleven-rectangle reference layout for a 100×100 arena.
pub fn reference_obstacles() -> Vec<Rect> {
    REFERENCE_LAYOUT
        .iter()
        .map(|&[x, y, w, h]| Rect::new(x, y, w, h))
        .collect()
}

/// Arena geometry and occupancy-grid settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Arena width in logical units
    #[serde(default = "defaults::arena_extent")]
    pub width: f32,

    /// Arena height in logical units
    #[serde(default = "defaults::arena_extent")]
    pub height: f32,

    /// Chebyshev inflation radius applied to occupied cells
    #[serde(default = "defaults::inflation_factor")]
    pub inflation_factor: usize,

    /// Extra margin added around every obstacle when scanning
    #[serde(default)]
    pub scan_margin: f32,

    /// Radius (cells) carved free around each agent in the occupancy grid
    #[serde(default = "defaults::footprint_clearance")]
    pub footprint_clearance: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: defaults::arena_extent(),
            height: defaults::arena_extent(),
            inflation_factor: defaults::inflation_factor(),
            scan_margin: 0.0,
            footprint_clearance: defaults::footprint_clearance(),
        }
    }
}

impl ArenaConfig {
    /// Mapping between arena units and occupancy-grid cells
    pub fn grid_frame(&self) -> GridFrame {
        GridFrame::new(
            self.width / GRID_SIZE as f32,
            self.height / GRID_SIZE as f32,
        )
    }
}

/// Scale between arena units and the fixed 100×100 grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridFrame {
    /// Arena units per cell along x
    pub cell_width: f32,
    /// Arena units per cell along y
    pub cell_height: f32,
}

impl Default for GridFrame {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl GridFrame {
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Cell containing `position`
    #[inline]
    pub fn to_cell(&self, position: Position) -> GridCoord {
        GridCoord::new(
            (position.x / self.cell_width).floor() as i32,
            (position.y / self.cell_height).floor() as i32,
        )
    }

    /// Top-left corner of `cell` in arena units
    #[inline]
    pub fn to_position(&self, cell: GridCoord) -> Position {
        Position::new(
            cell.x as f32 * self.cell_width,
            cell.y as f32 * self.cell_height,
        )
    }

    /// Convert an arena distance along x or y into cells
    #[inline]
    pub fn cells_along(&self, horizontal: bool, distance: f32) -> f32 {
        if horizontal {
            distance / self.cell_width
        } else {
            distance / self.cell_height
        }
    }
}

/// UWB localization settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalizationConfig {
    /// Upper bound of the one-sided multiplicative range error (0.1 = +10%)
    #[serde(default = "defaults::error_percentage")]
    pub error_percentage: f32,

    /// Smoothing factor for the exponential moving average
    #[serde(default = "defaults::ema_alpha")]
    pub ema_alpha: f32,

    /// Trilaterations averaged per localization query
    #[serde(default = "defaults::averaging_samples")]
    pub averaging_samples: usize,

    /// Period of the background sampling task
    #[serde(default = "defaults::sample_interval_ms")]
    pub sample_interval_ms: u64,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            error_percentage: defaults::error_percentage(),
            ema_alpha: defaults::ema_alpha(),
            averaging_samples: defaults::averaging_samples(),
            sample_interval_ms: defaults::sample_interval_ms(),
        }
    }
}
