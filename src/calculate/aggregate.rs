//! Folding attendance facts into per-player game and win counts.

use std::collections::BTreeMap;

use crate::models::{Attendance, PlayerAttendance, PlayerId};

/// Count games and wins per player.
///
/// Only players with at least one attendance appear. Rows come out in
/// ascending player id regardless of input order.
pub fn aggregate_attendances(attendances: &[Attendance]) -> Vec<PlayerAttendance> {
    let mut by_player: BTreeMap<PlayerId, PlayerAttendance> = BTreeMap::new();

    for attendance in attendances {
        let row = by_player
            .entry(attendance.player.id)
            .or_insert_with(|| PlayerAttendance {
                player: attendance.player.clone(),
                games: 0,
                wins: 0,
            });

        row.games += 1;
        if attendance.win {
            row.wins += 1;
        }
    }

    by_player.into_values().collect()
}

/// Highest games count among the rows, 0 when there are none.
pub fn max_games(rows: &[PlayerAttendance]) -> u32 {
    rows.iter().map(|row| row.games).max().unwrap_or(0)
}
