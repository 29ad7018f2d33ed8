//! Binary occupancy grid and its layered builder.

use log::trace;

use super::GRID_SIZE;
use crate::arena::Rect;
use crate::config::GridFrame;
use crate::core::{GridCoord, Position};

/// Cell value for free space
pub const FREE: u8 = 0;
/// Cell value for an obstacle, inflation or boundary
pub const OCCUPIED: u8 = 1;

/// Fixed 100×100 binary grid indexed `[y][x]`, stored row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    cells: Vec<u8>,
}

impl std::fmt::Debug for OccupancyGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OccupancyGrid")
            .field("size", &GRID_SIZE)
            .field("occupied", &self.count_occupied())
            .finish()
    }
}

impl Default for OccupancyGrid {
    fn default() -> Self {
        Self::free()
    }
}

impl OccupancyGrid {
    /// All-free grid
    pub fn free() -> Self {
        Self {
            cells: vec![FREE; GRID_SIZE * GRID_SIZE],
        }
    }

    /// All-occupied grid
    pub fn occupied() -> Self {
        Self {
            cells: vec![OCCUPIED; GRID_SIZE * GRID_SIZE],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        GRID_SIZE
    }

    #[inline]
    pub fn height(&self) -> usize {
        GRID_SIZE
    }

    /// True when `coord` is inside the grid
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

    /// Cell value, `None` outside the grid
    #[inline]
    pub fn get(&self, coord: GridCoord) -> Option<u8> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// In bounds and free
    #[inline]
    pub fn is_free(&self, coord: GridCoord) -> bool {
        self.get(coord) == Some(FREE)
    }

    /// Set a cell; out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, coord: GridCoord, value: u8) {
        if let Some(i) = self.index(coord) {
            self.cells[i] = if value == FREE { FREE } else { OCCUPIED };
        }
    }

    /// Number of occupied cells
    pub fn count_occupied(&self) -> usize {
        self.cells.iter().filter(|&&c| c != FREE).count()
    }

    /// Raw row-major cells
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}

/// Builds an [`OccupancyGrid`] in layers: rectangles, boundary, inflation,
/// then agent footprints carved back to free.
#[derive(Clone, Debug)]
pub struct OccupancyGridBuilder {
    grid: OccupancyGrid,
    frame: GridFrame,
}

impl OccupancyGridBuilder {
    pub fn new(frame: GridFrame) -> Self {
        Self {
            grid: OccupancyGrid::free(),
            frame,
        }
    }

    /// Mark a single cell occupied.
    pub fn mark(mut self, coord: GridCoord) -> Self {
        self.grid.set(coord, OCCUPIED);
        self
    }

    /// Rasterize a rectangle given in arena units over cells
    /// `[x, x+w) × [y, y+h)`, clipped to the grid.
    pub fn rect(mut self, rect: &Rect) -> Self {
        let x0 = (rect.x / self.frame.cell_width).floor() as i32;
        let y0 = (rect.y / self.frame.cell_height).floor() as i32;
        let x1 = ((rect.x + rect.width) / self.frame.cell_width).ceil() as i32;
        let y1 = ((rect.y + rect.height) / self.frame.cell_height).ceil() as i32;

        let limit = GRID_SIZE as i32;
        for y in y0.max(0)..y1.min(limit) {
            for x in x0.max(0)..x1.min(limit) {
                self.grid.set(GridCoord::new(x, y), OCCUPIED);
            }
        }
        self
    }

    /// Mark the outermost ring of cells.
    pub fn boundary(mut self) -> Self {
        let last = GRID_SIZE as i32 - 1;
        for i in 0..GRID_SIZE as i32 {
            self.grid.set(GridCoord::new(i, 0), OCCUPIED);
            self.grid.set(GridCoord::new(i, last), OCCUPIED);
            self.grid.set(GridCoord::new(0, i), OCCUPIED);
            self.grid.set(GridCoord::new(last, i), OCCUPIED);
        }
        self
    }

    /// Grow every occupied cell by a Chebyshev radius of `k` cells.
    ///
    /// Reads from a snapshot so inflation does not cascade. Radii beyond the
    /// grid size are clamped.
    pub fn inflate(mut self, k: usize) -> Self {
        if k == 0 {
            return self;
        }
        let k = k.min(GRID_SIZE) as i32;
        let snapshot = self.grid.clone();
        let limit = GRID_SIZE as i32;

        for y in 0..limit {
            for x in 0..limit {
                if snapshot.is_free(GridCoord::new(x, y)) {
                    continue;
                }
                for ny in (y - k).max(0)..=(y + k).min(limit - 1) {
                    for nx in (x - k).max(0)..=(x + k).min(limit - 1) {
                        self.grid.set(GridCoord::new(nx, ny), OCCUPIED);
                    }
                }
            }
        }
        self
    }

    /// Free every cell within `clearance` cells (Euclidean) of the cell
    /// containing `center`.
    pub fn carve(mut self, center: Position, clearance: f32) -> Self {
        if clearance < 0.0 {
            return self;
        }
        let c = self.frame.to_cell(center);
        let reach = clearance.ceil() as i32;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                if dist <= clearance {
                    self.grid.set(GridCoord::new(c.x + dx, c.y + dy), FREE);
                }
            }
        }
        self
    }

    pub fn build(self) -> OccupancyGrid {
        trace!(
            "[Grid] built occupancy grid: {} occupied cells",
            self.grid.count_occupied()
        );
        self.grid
    }
}
