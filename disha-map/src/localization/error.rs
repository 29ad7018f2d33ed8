//! Localization error types.

use thiserror::Error;

use crate::ids::AgentId;

/// Errors raised while estimating a position from UWB ranges
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocalizationError {
    #[error("Expected exactly 3 readings, got {count}")]
    InvalidReadingCount { count: usize },

    #[error("Anchors are colinear (determinant {determinant:.3e})")]
    DegenerateAnchorGeometry { determinant: f64 },

    #[error("Smoothing factor must be in (0, 1), got {alpha}")]
    InvalidAlpha { alpha: f32 },

    #[error("No estimate tracked for {0}")]
    UnknownTarget(AgentId),
}
