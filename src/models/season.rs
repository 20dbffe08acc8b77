//! Seasons and the games played in them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GameId, SeasonId};

/// A named period of play. At most one season is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: SeasonId,
    pub uuid: Uuid,

    /// Unique season name
    pub name: String,

    /// Whether new games are recorded into this season
    pub active: bool,

    pub created_at: DateTime<Utc>,
}

impl Season {
    /// Create a new, inactive season.
    pub fn new(id: SeasonId, name: String) -> Self {
        Self {
            id,
            uuid: Uuid::new_v4(),
            name,
            active: false,
            created_at: Utc::now(),
        }
    }
}

/// A single played game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    pub uuid: Uuid,

    /// Season this game belongs to
    pub season_id: SeasonId,

    /// When the game was played
    pub played_at: DateTime<Utc>,
}

impl Game {
    pub fn new(id: GameId, season_id: SeasonId, played_at: DateTime<Utc>) -> Self {
        Self {
            id,
            uuid: Uuid::new_v4(),
            season_id,
            played_at,
        }
    }
}

/// A season together with the number of games recorded in it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonSummary {
    #[serde(flatten)]
    pub season: Season,
    pub games_count: u32,
}
