//! Derived statistics models.
//!
//! None of these are persisted; they are rebuilt from attendance facts on
//! every request.

use serde::{Deserialize, Serialize};

use super::{Attendance, Outcome, Player};

/// Games played and won by one player within a scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAttendance {
    pub player: Player,
    pub games: u32,
    pub wins: u32,
}

impl PlayerAttendance {
    /// Games not won.
    pub fn losses(&self) -> u32 {
        self.games - self.wins
    }
}

/// Per-player metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub player: Player,

    /// Games played in scope
    pub games: u32,

    /// Games won in scope
    pub wins: u32,

    /// Three per win
    pub points: u32,

    /// Points over max(games, half of the busiest player's games)
    pub points_ratio: f64,

    /// Wins over games (0.0 to 1.0)
    pub win_ratio: f64,

    /// Games over all games in scope
    pub games_ratio: f64,
}

/// A ranked table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    /// 1-based competition rank; tied rows share it
    pub position: u32,

    #[serde(flatten)]
    pub stats: PlayerStats,
}

/// A run of consecutive games with the same outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub player: Player,
    pub length: u32,
    pub outcome: Outcome,
}

/// League-wide record holders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongestStreaks {
    pub winning: Option<Streak>,
    pub losing: Option<Streak>,
}

/// Streak card for a single player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStreaks {
    pub longest_winning: u32,
    pub longest_losing: u32,
    pub current_winning: u32,
    pub current_losing: u32,
}

/// One player's attendances, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerHistory {
    pub player: Player,
    pub attendances: Vec<Attendance>,
}
