//! Mobile agents: the robot and the human it navigates toward.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::Position;
use crate::ids::{AgentId, TagId};

/// Role of an agent in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Robot,
    Human,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Robot => f.write_str("robot"),
            AgentKind::Human => f.write_str("human"),
        }
    }
}

/// Agent state. Positions change only through the arena's motion primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    pub kind: AgentKind,
    pub position: Position,
    /// Body radius used to extend motion checks
    pub radius: f32,
    /// Attached UWB tag, if any
    pub tag: Option<TagId>,
}

impl Agent {
    pub fn new(id: AgentId, kind: AgentKind, position: Position, radius: f32) -> Self {
        Self {
            id,
            kind,
            position,
            radius,
            tag: None,
        }
    }
}
