//! Capability traits the navigation code drives a robot through.
//!
//! The exploration controller never touches the arena directly. Anything
//! that can report a position estimate, scan its surroundings and move
//! along one axis can be navigated, whether it is [`crate::world::AgentHandle`]
//! in the simulator or a test double.

use disha_map::{Direction, LocalizationError, MoveError, Position, SurroundingDistances};

/// Produces a position estimate.
pub trait Localizable {
    /// Averaged UWB estimate, floored to whole units.
    fn localize(&mut self) -> Result<Position, LocalizationError>;
}

/// Reports range readings around the true position.
pub trait Scannable {
    /// Four-direction scan with the given radius.
    fn scan(&mut self, radius: f32) -> SurroundingDistances;
}

/// Moves along one axis at a time.
pub trait Movable {
    /// True when a move of `distance` in `direction` would not be blocked.
    fn can_move(&self, direction: Direction, distance: f32) -> bool;

    /// Move and return the new true position.
    fn move_by(&mut self, direction: Direction, distance: f32) -> Result<Position, MoveError>;
}

/// Everything the exploration controller needs from a robot.
pub trait NavigationSource: Localizable + Scannable + Movable {}

impl<T: Localizable + Scannable + Movable> NavigationSource for T {}
