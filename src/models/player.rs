//! League player model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PlayerId;

/// A league player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Internal sequential identifier
    pub id: PlayerId,

    /// Stable external identifier
    pub uuid: Uuid,

    /// Display name (unique within the league)
    pub name: String,

    /// When this player was registered
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a new Player with a fresh external UUID.
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            uuid: Uuid::new_v4(),
            name,
            created_at: Utc::now(),
        }
    }
}
