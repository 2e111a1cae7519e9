//! Identifier source - hands out entity ids that are never reused

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a person, a food item or a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Placeholder used in log lines for handles that lost their id component.
    /// Never issued by an [`IdSource`].
    pub const UNASSIGNED: Self = Self(u64::MAX);
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id counter.
///
/// Deliberately not `Clone`: two copies of the same counter would issue
/// duplicate ids. The bootstrap loop moves a single source from one world
/// to the next so ids stay unique for the whole process.
#[derive(Debug, Default)]
pub struct IdSource {
    next: u64,
}

impl IdSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start issuing at `first`. Useful for tests that want readable ids.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Issue the next id
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// How many ids this source has issued so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let mut ids = IdSource::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();

        assert!(a < b && b < c);
        assert_eq!(ids.issued(), 3);
    }

    #[test]
    fn test_starting_at() {
        let mut ids = IdSource::starting_at(100);
        assert_eq!(ids.next_id(), EntityId(100));
        assert_eq!(ids.next_id().to_string(), "#101");
    }
}
