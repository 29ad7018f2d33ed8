//! Exponential moving average over position fixes.

use std::collections::HashMap;

use super::LocalizationError;
use crate::core::Position;
use crate::ids::AgentId;

/// `alpha * new + (1 - alpha) * previous`, per axis.
#[inline]
pub fn smooth(new: Position, previous: Position, alpha: f32) -> Position {
    Position::new(
        alpha * new.x + (1.0 - alpha) * previous.x,
        alpha * new.y + (1.0 - alpha) * previous.y,
    )
}

fn check_alpha(alpha: f32) -> Result<f32, LocalizationError> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(alpha)
    } else {
        Err(LocalizationError::InvalidAlpha { alpha })
    }
}

/// Smoothed position per tracked agent.
///
/// State is created on seed or first observation and is never reset while
/// the tracker lives.
#[derive(Clone, Debug)]
pub struct EmaTracker {
    alpha: f32,
    estimates: HashMap<AgentId, Position>,
}

impl EmaTracker {
    pub fn new(alpha: f32) -> Result<Self, LocalizationError> {
        Ok(Self {
            alpha: check_alpha(alpha)?,
            estimates: HashMap::new(),
        })
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Change the smoothing factor. Must lie in `(0, 1)`.
    pub fn set_alpha(&mut self, alpha: f32) -> Result<(), LocalizationError> {
        self.alpha = check_alpha(alpha)?;
        Ok(())
    }

    /// Start tracking `id` at a known position.
    pub fn seed(&mut self, id: AgentId, start: Position) {
        self.estimates.insert(id, start);
    }

    /// Fold a new fix into the estimate and return the result.
    ///
    /// An unseen target is seeded with the measurement itself.
    pub fn observe(&mut self, id: AgentId, measurement: Position) -> Position {
        let alpha = self.alpha;
        let estimate = self
            .estimates
            .entry(id)
            .and_modify(|prev| *prev = smooth(measurement, *prev, alpha))
            .or_insert(measurement);
        *estimate
    }

    pub fn estimate(&self, id: AgentId) -> Result<Position, LocalizationError> {
        self.estimates
            .get(&id)
            .copied()
            .ok_or(LocalizationError::UnknownTarget(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smooth() {
        let p = smooth(Position::new(10.0, 0.0), Position::new(0.0, 10.0), 0.25);
        assert_relative_eq!(p.x, 2.5);
        assert_relative_eq!(p.y, 7.5);
    }

    #[test]
    fn test_alpha_bounds() {
        assert!(EmaTracker::new(0.0).is_err());
        assert!(EmaTracker::new(1.0).is_err());
        assert!(EmaTracker::new(-0.3).is_err());
        let mut tracker = EmaTracker::new(0.1).unwrap();
        assert_eq!(
            tracker.set_alpha(1.5),
            Err(LocalizationError::InvalidAlpha { alpha: 1.5 })
        );
        assert_relative_eq!(tracker.alpha(), 0.1);
    }

    #[test]
    fn test_converges_within_bound() {
        let alpha = 0.1f32;
        let eps = 0.01f32;
        let mut tracker = EmaTracker::new(alpha).unwrap();
        let id = AgentId(1);
        let start = Position::new(0.0, 0.0);
        let target = Position::new(10.0, 0.0);
        tracker.seed(id, start);

        let bound = (eps.ln() / (1.0 - alpha).ln()).ceil() as usize;
        let mut estimate = start;
        for _ in 0..bound {
            estimate = tracker.observe(id, target);
        }
        let initial_gap = start.distance(&target);
        assert!(estimate.distance(&target) <= eps * initial_gap + 1e-4);
    }

    #[test]
    fn test_first_observation_seeds() {
        let mut tracker = EmaTracker::new(0.5).unwrap();
        let id = AgentId(3);
        assert!(tracker.estimate(id).is_err());
        let p = tracker.observe(id, Position::new(4.0, 4.0));
        assert_eq!(p, Position::new(4.0, 4.0));
        assert_eq!(tracker.estimate(id), Ok(Position::new(4.0, 4.0)));
    }
}
