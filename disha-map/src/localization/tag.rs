//! Simulated UWB tag producing noisy ranges to each anchor.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::AnchorSet;
use crate::core::Position;
use crate::ids::TagId;

/// Range from a tag to one anchor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagBearing {
    pub anchor_name: String,
    pub anchor_position: Position,
    pub distance: f32,
}

/// A ranging tag attached to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UwbTag {
    pub id: TagId,
    /// Upper bound of the multiplicative range error
    pub error_percentage: f32,
}

impl UwbTag {
    pub fn new(id: TagId, error_percentage: f32) -> Self {
        Self {
            id,
            error_percentage,
        }
    }

    /// Range to every anchor from `tag_position`.
    ///
    /// Each true distance is scaled by `1 + U[0, error_percentage)`. The error
    /// is one-sided, so ranges are never shorter than the truth.
    pub fn bearing<R: Rng + ?Sized>(
        &self,
        tag_position: Position,
        anchors: &AnchorSet,
        rng: &mut R,
    ) -> Vec<TagBearing> {
        let max_error = self.error_percentage.max(0.0);
        anchors
            .iter()
            .map(|anchor| {
                let noise = if max_error > 0.0 {
                    rng.gen_range(0.0..max_error)
                } else {
                    0.0
                };
                TagBearing {
                    anchor_name: anchor.name.clone(),
                    anchor_position: anchor.position,
                    distance: tag_position.distance(&anchor.position) * (1.0 + noise),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_noise_is_one_sided_and_bounded() {
        let anchors = AnchorSet::default_triangle();
        let tag = UwbTag::new(TagId(1), 0.1);
        let mut rng = SmallRng::seed_from_u64(7);
        let position = Position::new(20.0, 95.0);

        for _ in 0..200 {
            for b in tag.bearing(position, &anchors, &mut rng) {
                let truth = position.distance(&b.anchor_position);
                assert!(b.distance >= truth);
                assert!(b.distance <= truth * 1.1 + 1e-3);
            }
        }
    }

    #[test]
    fn test_zero_error_is_exact() {
        let anchors = AnchorSet::default_triangle();
        let tag = UwbTag::new(TagId(1), 0.0);
        let mut rng = SmallRng::seed_from_u64(1);
        let bearings = tag.bearing(Position::new(3.0, 4.0), &anchors, &mut rng);
        assert_eq!(bearings.len(), 3);
        assert_eq!(bearings[0].anchor_name, "anchor_a");
        assert!((bearings[0].distance - 5.0).abs() < 1e-5);
    }
}
