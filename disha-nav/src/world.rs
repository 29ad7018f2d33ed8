//! Simulated world: arena, anchors, tags and the smoothed estimates.
//!
//! `World` owns everything an agent needs to localize and move. Navigation
//! code borrows a single agent through [`AgentHandle`], which implements the
//! capability traits from [`crate::source`].

use std::collections::HashMap;

use disha_map::{
    AgentId, AgentKind, AnchorSet, Arena, Direction, EmaTracker, IdGenerator, LocalizationConfig,
    LocalizationError, MoveError, Position, SequentialIds, SurroundingDistances, TagId, UwbTag,
    averaged_estimate, trilaterate,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, trace};

use crate::source::{Localizable, Movable, Scannable};

/// Arena plus localization state for every tagged agent.
pub struct World {
    arena: Arena,
    anchors: AnchorSet,
    tags: HashMap<AgentId, UwbTag>,
    tag_ids: SequentialIds,
    tracker: EmaTracker,
    rng: SmallRng,
    error_percentage: f32,
    averaging_samples: usize,
}

impl World {
    /// Build a world over `arena`.
    ///
    /// A `seed` of 0 draws the noise generator from entropy.
    pub fn new(
        arena: Arena,
        anchors: AnchorSet,
        localization: &LocalizationConfig,
        seed: u64,
    ) -> Result<Self, LocalizationError> {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Ok(Self {
            arena,
            anchors,
            tags: HashMap::new(),
            tag_ids: SequentialIds::new(),
            tracker: EmaTracker::new(localization.ema_alpha)?,
            rng,
            error_percentage: localization.error_percentage,
            averaging_samples: localization.averaging_samples,
        })
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    /// Place a tagged agent and start tracking it at its true position.
    pub fn spawn(&mut self, kind: AgentKind, position: Position, radius: f32) -> AgentId {
        let id = self.arena.add_agent(kind, position, radius);
        let tag = UwbTag::new(TagId(self.tag_ids.next_id()), self.error_percentage);
        // The agent was just added, so attaching cannot fail
        if self.arena.attach_tag(id, tag.id).is_ok() {
            self.tags.insert(id, tag);
        }
        self.tracker.seed(id, position);
        debug!("Spawned {} {} at ({:.1}, {:.1})", kind, id, position.x, position.y);
        id
    }

    /// True position, bypassing localization.
    pub fn true_position(&self, id: AgentId) -> Option<Position> {
        self.arena.agent(id).map(|a| a.position)
    }

    fn tagged(&self, id: AgentId) -> Result<(UwbTag, Position), LocalizationError> {
        let tag = self
            .tags
            .get(&id)
            .copied()
            .ok_or(LocalizationError::UnknownTarget(id))?;
        let position = self
            .true_position(id)
            .ok_or(LocalizationError::UnknownTarget(id))?;
        Ok((tag, position))
    }

    /// Averaged estimate over `averaging_samples` fresh fixes.
    pub fn localize(&mut self, id: AgentId) -> Result<Position, LocalizationError> {
        let (tag, position) = self.tagged(id)?;
        averaged_estimate(
            &tag,
            position,
            &self.anchors,
            self.averaging_samples,
            &mut self.rng,
        )
    }

    /// One noisy fix folded into the smoothed track; returns the new estimate.
    pub fn sample(&mut self, id: AgentId) -> Result<Position, LocalizationError> {
        let (tag, position) = self.tagged(id)?;
        let fix = trilaterate(&tag.bearing(position, &self.anchors, &mut self.rng))?;
        let smoothed = self.tracker.observe(id, fix);
        trace!(
            "Sample {}: fix ({:.2}, {:.2}) smoothed ({:.2}, {:.2})",
            id, fix.x, fix.y, smoothed.x, smoothed.y
        );
        Ok(smoothed)
    }

    /// Latest smoothed estimate.
    pub fn smoothed(&self, id: AgentId) -> Result<Position, LocalizationError> {
        self.tracker.estimate(id)
    }

    pub fn set_error_percentage(&mut self, error_percentage: f32) {
        self.error_percentage = error_percentage;
        for tag in self.tags.values_mut() {
            tag.error_percentage = error_percentage;
        }
    }

    pub fn set_ema_alpha(&mut self, alpha: f32) -> Result<(), LocalizationError> {
        self.tracker.set_alpha(alpha)
    }

    pub fn set_averaging_samples(&mut self, samples: usize) {
        self.averaging_samples = samples;
    }

    /// Borrow one agent through the capability traits.
    pub fn handle(&mut self, id: AgentId) -> AgentHandle<'_> {
        AgentHandle { world: self, id }
    }
}

/// A single agent of a [`World`].
pub struct AgentHandle<'w> {
    world: &'w mut World,
    id: AgentId,
}

impl AgentHandle<'_> {
    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn true_position(&self) -> Option<Position> {
        self.world.true_position(self.id)
    }
}

impl Localizable for AgentHandle<'_> {
    fn localize(&mut self) -> Result<Position, LocalizationError> {
        self.world.localize(self.id)
    }
}

impl Scannable for AgentHandle<'_> {
    fn scan(&mut self, radius: f32) -> SurroundingDistances {
        match self.world.true_position(self.id) {
            Some(origin) => self.world.arena.surrounding_distances(origin, radius),
            None => SurroundingDistances::default(),
        }
    }
}

impl Movable for AgentHandle<'_> {
    fn can_move(&self, direction: Direction, distance: f32) -> bool {
        self.world.arena.can_move(self.id, direction, distance)
    }

    fn move_by(&mut self, direction: Direction, distance: f32) -> Result<Position, MoveError> {
        self.world.arena.try_move(self.id, direction, distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use disha_map::ArenaConfig;

    fn noiseless_world() -> World {
        let localization = LocalizationConfig {
            error_percentage: 0.0,
            ..Default::default()
        };
        World::new(
            Arena::new(ArenaConfig::default()),
            AnchorSet::default_triangle(),
            &localization,
            42,
        )
        .unwrap()
    }

    #[test]
    fn test_spawn_attaches_tag_and_seeds_tracker() {
        let mut world = noiseless_world();
        let id = world.spawn(AgentKind::Robot, Position::new(5.0, 95.0), 1.0);
        assert!(world.arena().agent(id).unwrap().tag.is_some());
        assert_eq!(world.smoothed(id).unwrap(), Position::new(5.0, 95.0));
    }

    #[test]
    fn test_noiseless_localize_is_exact() {
        let mut world = noiseless_world();
        let id = world.spawn(AgentKind::Human, Position::new(20.0, 95.0), 1.0);
        assert_eq!(world.localize(id).unwrap(), Position::new(20.0, 95.0));
    }

    #[test]
    fn test_sample_tracks_moved_agent() {
        let mut world = noiseless_world();
        let id = world.spawn(AgentKind::Human, Position::new(20.0, 95.0), 1.0);
        world.arena_mut().place_agent(id, Position::new(50.0, 50.0)).unwrap();
        let mut last = Position::ZERO;
        for _ in 0..100 {
            last = world.sample(id).unwrap();
        }
        assert_relative_eq!(last.x, 50.0, epsilon = 0.1);
        assert_relative_eq!(last.y, 50.0, epsilon = 0.1);
    }

    #[test]
    fn test_untagged_agent_is_unknown_target() {
        let mut world = noiseless_world();
        let bogus = AgentId(99);
        assert_eq!(
            world.localize(bogus),
            Err(LocalizationError::UnknownTarget(bogus))
        );
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        let localization = LocalizationConfig {
            ema_alpha: 1.5,
            ..Default::default()
        };
        let result = World::new(
            Arena::new(ArenaConfig::default()),
            AnchorSet::default_triangle(),
            &localization,
            1,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_handle_moves_agent() {
        let mut world = noiseless_world();
        let id = world.spawn(AgentKind::Robot, Position::new(50.0, 50.0), 1.0);
        let mut robot = world.handle(id);
        assert!(robot.can_move(Direction::Left, 5.0));
        let pos = robot.move_by(Direction::Left, 5.0).unwrap();
        assert_eq!(pos, Position::new(45.0, 50.0));
        assert_eq!(robot.localize().unwrap(), Position::new(45.0, 50.0));
        assert!(robot.scan(10.0).is_clear());
    }
}
