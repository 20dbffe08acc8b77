//! Points and ratio metrics.

use super::{aggregate::max_games, CalculateError};
use crate::models::{PlayerAttendance, PlayerStats};

/// Points awarded for a win. Losses score nothing.
pub const POINTS_PER_WIN: u32 = 3;

/// Scope-wide constants every row is normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalization {
    /// Games played in the scope, independent of any one player
    pub total_games: u32,

    /// Highest games count of any player in the scope
    pub max_games: u32,
}

impl Normalization {
    /// Derive `max_games` from the rows themselves.
    pub fn for_rows(rows: &[PlayerAttendance], total_games: u32) -> Self {
        Self {
            total_games,
            max_games: max_games(rows),
        }
    }

    /// Smallest divisor used for the points ratio.
    pub fn min_points_divisor(&self) -> u32 {
        self.max_games / 2
    }
}

/// Calculate points from wins.
pub fn calculate_points(wins: u32) -> u32 {
    wins * POINTS_PER_WIN
}

/// Points over max(games, floor(max_games / 2)).
///
/// `games` must be non-zero.
pub fn calculate_points_ratio(points: u32, games: u32, normalization: Normalization) -> f64 {
    let divisor = games.max(normalization.min_points_divisor());
    points as f64 / divisor as f64
}

/// Promote aggregates to full stats.
///
/// Fails on the first row with zero games, and on any row when the scope
/// has zero games, instead of producing NaN or infinite ratios.
pub fn calculate_stats(
    rows: &[PlayerAttendance],
    normalization: Normalization,
) -> Result<Vec<PlayerStats>, CalculateError> {
    rows.iter()
        .map(|row| player_stats(row, normalization))
        .collect()
}

fn player_stats(
    row: &PlayerAttendance,
    normalization: Normalization,
) -> Result<PlayerStats, CalculateError> {
    if row.games == 0 {
        return Err(CalculateError::DegenerateMetric {
            player: row.player.name.clone(),
            reason: "player has no games in scope".to_string(),
        });
    }
    if normalization.total_games == 0 {
        return Err(CalculateError::DegenerateMetric {
            player: row.player.name.clone(),
            reason: "scope has no games".to_string(),
        });
    }

    let points = calculate_points(row.wins);

    Ok(PlayerStats {
        player: row.player.clone(),
        games: row.games,
        wins: row.wins,
        points,
        points_ratio: calculate_points_ratio(points, row.games, normalization),
        win_ratio: row.wins as f64 / row.games as f64,
        games_ratio: row.games as f64 / normalization.total_games as f64,
    })
}
