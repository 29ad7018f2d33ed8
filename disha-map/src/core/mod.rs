//! Core types shared by every Disha module.
//!
//! - [`Position`]: real-valued arena coordinates
//! - [`GridCoord`]: integer cell indices
//! - [`Direction`]: cardinal movement/scan directions

mod direction;
mod point;

pub use direction::{Direction, ParseDirectionError};
pub use point::{GridCoord, Position};
