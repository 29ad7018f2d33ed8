//! Grid representations.
//!
//! - [`OccupancyGrid`]: binary ground-truth grid rebuilt from the arena
//! - [`DiscoveredMap`]: tri-state grid filled in by exploration
//!
//! Both are fixed at [`GRID_SIZE`]×[`GRID_SIZE`] cells regardless of arena
//! scale; see [`crate::config::GridFrame`] for the conversion.

mod discovered;
mod occupancy;

/// Cells per side of every grid
pub const GRID_SIZE: usize = 100;

pub use discovered::{CellCounts, CellState, DiscoveredMap};
pub use occupancy::{FREE, OCCUPIED, OccupancyGrid, OccupancyGridBuilder};
