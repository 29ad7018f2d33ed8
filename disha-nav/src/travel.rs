//! Per-agent travel tracks built from smoothed position estimates.

use std::collections::HashMap;

use disha_map::{AgentId, Position};

/// Points within this distance of the last recorded one are dropped.
pub const MIN_SPACING: f32 = 2.0;

/// Sparse track of where each agent has been.
#[derive(Clone, Debug)]
pub struct TravelMap {
    min_spacing: f32,
    tracks: HashMap<AgentId, Vec<Position>>,
}

impl Default for TravelMap {
    fn default() -> Self {
        Self::new(MIN_SPACING)
    }
}

impl TravelMap {
    pub fn new(min_spacing: f32) -> Self {
        Self {
            min_spacing,
            tracks: HashMap::new(),
        }
    }

    /// Append `position` to the agent's track. Returns true if it was kept.
    pub fn record(&mut self, id: AgentId, position: Position) -> bool {
        let track = self.tracks.entry(id).or_default();
        if let Some(last) = track.last() {
            if *last == position || last.distance(&position) <= self.min_spacing {
                return false;
            }
        }
        track.push(position);
        true
    }

    pub fn track(&self, id: AgentId) -> &[Position] {
        self.tracks.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total length of the track.
    pub fn distance_travelled(&self, id: AgentId) -> f32 {
        self.track(id)
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }

    pub fn clear(&mut self, id: AgentId) {
        self.tracks.remove(&id);
    }
}
