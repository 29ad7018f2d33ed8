//! Axis-aligned rectangular obstacles.

use serde::{Deserialize, Serialize};

use super::ArenaError;
use crate::core::Position;
use crate::geometry::{Segment, rectangle_edges};
use crate::ids::ObstacleId;

/// Axis-aligned rectangle in arena units (`x`, `y` is the top-left corner).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner
    #[inline]
    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Edges in top, right, bottom, left order
    pub fn edges(&self) -> [Segment; 4] {
        rectangle_edges(self.origin(), self.width, self.height)
    }

    /// Check the rectangle has positive size and fits in the arena.
    pub fn validate(&self, arena_width: f32, arena_height: f32) -> Result<(), ArenaError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ArenaError::InvalidObstacleSize {
                width: self.width,
                height: self.height,
            });
        }
        let inside = self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= arena_width
            && self.y + self.height <= arena_height;
        if !inside {
            return Err(ArenaError::ObstacleOutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                arena_width,
                arena_height,
            });
        }
        Ok(())
    }
}

/// A placed obstacle. Immutable once added to the arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub bounds: Rect,
}

impl Obstacle {
    pub fn new(id: ObstacleId, bounds: Rect) -> Self {
        Self { id, bounds }
    }
}
