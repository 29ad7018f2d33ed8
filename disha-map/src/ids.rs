//! Typed identifiers and the injectable id source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source of unique numeric ids.
///
/// Injected into [`crate::arena::Arena`] so tests and replays get stable ids.
pub trait IdGenerator: Send {
    /// Return an id never returned before by this generator.
    fn next_id(&mut self) -> u64;
}

/// Monotonic counter starting at 1.
#[derive(Clone, Debug)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Counter starting at 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Counter starting at `first`
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

typed_id!(
    /// Identifier of a placed obstacle
    ObstacleId,
    "obstacle"
);
typed_id!(
    /// Identifier of a robot or human
    AgentId,
    "agent"
);
typed_id!(
    /// Identifier of a UWB tag
    TagId,
    "tag"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_are_unique() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(SequentialIds::starting_at(40).next_id(), 40);
    }

    #[test]
    fn test_display() {
        assert_eq!(ObstacleId(3).to_string(), "obstacle-3");
        assert_eq!(AgentId(1).to_string(), "agent-1");
    }
}
