//! Sequential entity IDs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A sequential entity ID assigned by the store.
///
/// IDs grow with creation order, so comparing two IDs of the same entity
/// type also compares when the entities were created.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Create a new EntityId from a raw value.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// The ID that follows the highest of `existing` (1 for an empty store).
    pub fn next_after<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = EntityId>,
    {
        let max = existing.into_iter().map(|id| id.0).max().unwrap_or(0);
        Self(max + 1)
    }

    /// Get the raw value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Type alias for player IDs
pub type PlayerId = EntityId;

/// Type alias for season IDs
pub type SeasonId = EntityId;

/// Type alias for game IDs
pub type GameId = EntityId;

/// Type alias for attendance IDs
pub type AttendanceId = EntityId;
