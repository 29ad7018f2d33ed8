//! Incrementally discovered map used when the arena is not known up front.

use serde::{Deserialize, Serialize};

use super::GRID_SIZE;
use super::occupancy::{FREE, OCCUPIED, OccupancyGrid};
use crate::core::GridCoord;

/// Knowledge about a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Unknown,
    Free,
    Occupied,
}

/// Per-cell counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellCounts {
    pub unknown: usize,
    pub free: usize,
    pub occupied: usize,
}

/// 100×100 grid of [`CellState`], indexed `[y][x]`.
///
/// Planning treats unknown cells as occupied: free space must be observed
/// before a path may use it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredMap {
    cells: Vec<CellState>,
}

impl Default for DiscoveredMap {
    fn default() -> Self {
        Self::unknown()
    }
}

impl DiscoveredMap {
    /// Nothing known yet
    pub fn unknown() -> Self {
        Self {
            cells: vec![CellState::Unknown; GRID_SIZE * GRID_SIZE],
        }
    }

    /// Fully known map mirroring a ground-truth grid
    pub fn from_occupancy(grid: &OccupancyGrid) -> Self {
        let cells = grid
            .cells()
            .iter()
            .map(|&c| {
                if c == FREE {
                    CellState::Free
                } else {
                    CellState::Occupied
                }
            })
            .collect();
        Self { cells }
    }

    #[inline]
    pub fn is_valid_coord(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < GRID_SIZE
            && (coord.y as usize) < GRID_SIZE
    }

    #[inline]
    fn index(&self, coord: GridCoord) -> Option<usize> {
        if self.is_valid_coord(coord) {
            Some(coord.y as usize * GRID_SIZE + coord.x as usize)
        } else {
            None
        }
    }

    /// Cell state; cells outside the grid read as occupied.
    #[inline]
    pub fn get(&self, coord: GridCoord) -> CellState {
        self.index(coord)
            .map_or(CellState::Occupied, |i| self.cells[i])
    }

    /// Overwrite a cell. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, coord: GridCoord, state: CellState) {
        if let Some(i) = self.index(coord) {
            self.cells[i] = state;
        }
    }

    #[inline]
    pub fn is_free(&self, coord: GridCoord) -> bool {
        self.get(coord) == CellState::Free
    }

    /// True when at least one in-bounds 4-neighbour is still unknown.
    pub fn has_unknown_neighbor(&self, coord: GridCoord) -> bool {
        coord
            .neighbors_4()
            .iter()
            .any(|n| self.is_valid_coord(*n) && self.get(*n) == CellState::Unknown)
    }

    /// Iterate `(coord, state)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, CellState)> + '_ {
        self.cells.iter().enumerate().map(|(i, &state)| {
            let coord = GridCoord::new((i % GRID_SIZE) as i32, (i / GRID_SIZE) as i32);
            (coord, state)
        })
    }

    pub fn counts(&self) -> CellCounts {
        let mut counts = CellCounts::default();
        for state in &self.cells {
            match state {
                CellState::Unknown => counts.unknown += 1,
                CellState::Free => counts.free += 1,
                CellState::Occupied => counts.occupied += 1,
            }
        }
        counts
    }

    /// Collapse to a binary planning grid.
    ///
    /// Unknown and the outer ring become occupied; `passable` cells (usually
    /// the planner's start and goal) are forced free.
    pub fn to_planning_grid(&self, passable: &[GridCoord]) -> OccupancyGrid {
        let mut grid = OccupancyGrid::free();
        let last = GRID_SIZE as i32 - 1;
        for (coord, state) in self.iter() {
            let ring = coord.x == 0 || coord.y == 0 || coord.x == last || coord.y == last;
            let value = if ring || state != CellState::Free {
                OCCUPIED
            } else {
                FREE
            };
            grid.set(coord, value);
        }
        for &coord in passable {
            grid.set(coord, FREE);
        }
        grid
    }
}
