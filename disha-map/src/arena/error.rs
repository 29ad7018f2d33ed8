//! Arena and motion error types.

use thiserror::Error;

use crate::core::Direction;
use crate::ids::{AgentId, ObstacleId};

/// Errors raised while editing the arena
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArenaError {
    #[error(
        "Obstacle ({x}, {y}, {width}x{height}) exceeds arena {arena_width}x{arena_height}"
    )]
    ObstacleOutOfBounds {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        arena_width: f32,
        arena_height: f32,
    },

    #[error("Obstacle size must be positive, got {width}x{height}")]
    InvalidObstacleSize { width: f32, height: f32 },

    #[error("Unknown obstacle: {0}")]
    UnknownObstacle(ObstacleId),

    #[error("Unknown agent: {0}")]
    UnknownAgent(AgentId),
}

/// Errors raised by the motion primitive
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoveError {
    #[error("Move {direction} by {distance} blocked: obstacle at {reading}")]
    Blocked {
        direction: Direction,
        distance: f32,
        reading: f32,
    },

    #[error("Unknown agent: {0}")]
    UnknownAgent(AgentId),
}
