//! Attendance facts: which player played which game, and whether they won.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AttendanceId, GameId, Player, PlayerId};

/// Game outcome from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    /// Outcome for a `win` flag.
    pub fn from_win(win: bool) -> Self {
        if win {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }

    /// Whether a `win` flag matches this outcome.
    pub fn matches(&self, win: bool) -> bool {
        Outcome::from_win(win) == *self
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Loss => write!(f, "loss"),
        }
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "win" | "wins" | "winning" => Ok(Outcome::Win),
            "loss" | "losses" | "losing" => Ok(Outcome::Loss),
            other => Err(format!("unknown outcome '{}', expected win or loss", other)),
        }
    }
}

/// Stored attendance row, as persisted in `attendances.jsonl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub player_id: PlayerId,
    pub game_id: GameId,
    pub win: bool,
}

/// An attendance joined with its player and game time.
///
/// This is the only input the statistics engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub player: Player,
    pub game_id: GameId,
    pub win: bool,
    pub played_at: DateTime<Utc>,
}

impl Attendance {
    pub fn outcome(&self) -> Outcome {
        Outcome::from_win(self.win)
    }

    /// Same fact with the outcome seen from the other side of the table.
    pub fn flipped(mut self) -> Self {
        self.win = !self.win;
        self
    }
}
