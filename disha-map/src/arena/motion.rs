//! Motion primitive: translate an agent along one axis when the scan allows it.

use log::debug;

use super::{Arena, MoveError};
use crate::core::{Direction, Position};
use crate::ids::AgentId;

impl Arena {
    /// Scan reading that would block `agent` moving `distance` in `direction`.
    ///
    /// The scan runs from the agent's true position with a radius of
    /// `distance + radius`, so the body cannot clip an edge at the end of the
    /// move. Returns `Ok(None)` when the way is clear.
    fn blocking_reading(
        &self,
        agent: AgentId,
        direction: Direction,
        distance: f32,
    ) -> Result<Option<f32>, MoveError> {
        let a = self.agent(agent).ok_or(MoveError::UnknownAgent(agent))?;
        if distance <= 0.0 {
            return Ok(None);
        }
        let reading = self
            .probe(a.position, distance + a.radius)
            .distances
            .get(direction);
        Ok((reading > 0.0).then_some(reading))
    }

    /// True when `agent` may move `distance` in `direction`.
    ///
    /// Unknown agents can never move. Non-positive distances are always
    /// allowed since they do nothing.
    pub fn can_move(&self, agent: AgentId, direction: Direction, distance: f32) -> bool {
        matches!(self.blocking_reading(agent, direction, distance), Ok(None))
    }

    /// Move `agent` by `distance` in `direction`.
    ///
    /// A non-positive distance is a no-op that returns the current position.
    pub fn try_move(
        &mut self,
        agent: AgentId,
        direction: Direction,
        distance: f32,
    ) -> Result<Position, MoveError> {
        if let Some(reading) = self.blocking_reading(agent, direction, distance)? {
            debug!(
                "[Motion] {} blocked moving {} by {:.1}: obstacle at {:.2}",
                agent, direction, distance, reading
            );
            return Err(MoveError::Blocked {
                direction,
                distance,
                reading,
            });
        }

        let a = self
            .agent_mut(agent)
            .ok_or(MoveError::UnknownAgent(agent))?;
        if distance <= 0.0 {
            return Ok(a.position);
        }
        let origin = a.position;
        let radius = distance + a.radius;
        a.position = origin + direction.offset(distance);
        let position = a.position;

        if self.observer.debug_scan_enabled() {
            let report = self.probe(origin, radius);
            self.observer.on_debug_scan(&report.considered);
        }
        self.observer.on_agent_moved(agent, position);
        Ok(position)
    }

    /// Teleport an agent, bypassing the scan. Used for scenario setup.
    pub fn place_agent(&mut self, agent: AgentId, position: Position) -> Result<(), MoveError> {
        let a = self
            .agent_mut(agent)
            .ok_or(MoveError::UnknownAgent(agent))?;
        a.position = position;
        self.observer.on_agent_moved(agent, position);
        Ok(())
    }
}
