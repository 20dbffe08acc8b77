//! Statistics calculation engine.
//!
//! Computes derived metrics from attendance facts:
//! - Per-player games and wins (aggregate)
//! - Points and ratios (metrics)
//! - Sorted tables with competition positions (ranking)
//! - Win and loss streaks (streaks)
//!
//! Everything here is pure: inputs are request-scoped snapshots and every
//! output is freshly allocated.

pub mod aggregate;
pub mod metrics;
pub mod ranking;
pub mod streaks;

use thiserror::Error;
use tracing::debug;

use crate::models::{Attendance, Standing};

pub use aggregate::{aggregate_attendances, max_games};
pub use metrics::{calculate_points, calculate_stats, Normalization, POINTS_PER_WIN};
pub use ranking::{competition_positions, rank_players, SortKey};
pub use streaks::{
    current_streak, current_streaks, group_histories, longest_streak, longest_streaks,
    player_streaks,
};

/// Errors raised by the engine.
#[derive(Debug, Error)]
pub enum CalculateError {
    #[error("Degenerate metric for {player}: {reason}")]
    DegenerateMetric { player: String, reason: String },

    #[error("Unknown sort key '{0}', expected one of pointsRatio, wins, games, winRatio")]
    UnknownSortKey(String),
}

/// Build a ranked table from the attendances of one scope.
///
/// `total_games` is the number of games in the scope, which may exceed the
/// number of distinct games in `attendances` for player-relative scopes.
pub fn build_table(
    attendances: &[Attendance],
    total_games: u32,
    key: SortKey,
) -> Result<Vec<Standing>, CalculateError> {
    let rows = aggregate_attendances(attendances);
    let normalization = Normalization::for_rows(&rows, total_games);
    let stats = calculate_stats(&rows, normalization)?;
    let table = rank_players(&stats, key);

    debug!(
        "Built table of {} players from {} attendances (total games {}, max games {}, sort {})",
        table.len(),
        attendances.len(),
        normalization.total_games,
        normalization.max_games,
        key
    );

    Ok(table)
}
