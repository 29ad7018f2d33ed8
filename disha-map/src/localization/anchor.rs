//! Fixed UWB anchors.

use serde::{Deserialize, Serialize};

use super::LocalizationError;
use super::trilateration::{DEGENERATE_DETERMINANT, determinant};
use crate::core::Position;

/// A fixed ranging beacon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub name: String,
    pub position: Position,
}

impl Anchor {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Three non-colinear anchors forming the localization basis.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorSet {
    anchors: [Anchor; 3],
}

impl AnchorSet {
    /// Validate and wrap exactly three anchors.
    pub fn new(anchors: Vec<Anchor>) -> Result<Self, LocalizationError> {
        let anchors: [Anchor; 3] = anchors
            .try_into()
            .map_err(|v: Vec<Anchor>| LocalizationError::InvalidReadingCount { count: v.len() })?;

        let det = determinant(
            anchors[0].position,
            anchors[1].position,
            anchors[2].position,
        );
        if det.abs() < DEGENERATE_DETERMINANT {
            return Err(LocalizationError::DegenerateAnchorGeometry { determinant: det });
        }
        Ok(Self { anchors })
    }

    /// The default triangle: `anchor_a` (0,0), `anchor_b` (99,0), `anchor_c` (99,99).
    pub fn default_triangle() -> Self {
        Self {
            anchors: [
                Anchor::new("anchor_a", Position::new(0.0, 0.0)),
                Anchor::new("anchor_b", Position::new(99.0, 0.0)),
                Anchor::new("anchor_c", Position::new(99.0, 99.0)),
            ],
        }
    }

    pub fn anchors(&self) -> &[Anchor; 3] {
        &self.anchors
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }
}
