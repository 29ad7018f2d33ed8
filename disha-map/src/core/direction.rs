//! Cardinal movement directions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{GridCoord, Position};

/// Cardinal direction in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards smaller `y`
    Up,
    /// Towards larger `y`
    Down,
    /// Towards smaller `x`
    Left,
    /// Towards larger `x`
    Right,
}

impl Direction {
    /// All directions in scan order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step on the grid
    #[inline]
    pub fn grid_delta(self) -> GridCoord {
        match self {
            Direction::Up => GridCoord::new(0, -1),
            Direction::Down => GridCoord::new(0, 1),
            Direction::Left => GridCoord::new(-1, 0),
            Direction::Right => GridCoord::new(1, 0),
        }
    }

    /// Position offset for a move of `distance` units
    #[inline]
    pub fn offset(self, distance: f32) -> Position {
        let d = self.grid_delta();
        Position::new(d.x as f32 * distance, d.y as f32 * distance)
    }

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction: {0}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "w" => Ok(Direction::Up),
            "down" | "d" | "s" => Ok(Direction::Down),
            "left" | "l" | "a" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_follow_screen_convention() {
        assert_eq!(Direction::Up.offset(3.0), Position::new(0.0, -3.0));
        assert_eq!(Direction::Down.offset(3.0), Position::new(0.0, 3.0));
        assert_eq!(Direction::Left.offset(2.0), Position::new(-2.0, 0.0));
        assert_eq!(Direction::Right.offset(2.0), Position::new(2.0, 0.0));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Up".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!(" right ".parse::<Direction>(), Ok(Direction::Right));
        assert!("north".parse::<Direction>().is_err());
    }
}
