//! Win and loss streak detection.
//!
//! Every history passed in here must be ordered oldest game first.

use std::collections::BTreeMap;

use crate::models::{
    Attendance, LongestStreaks, Outcome, PlayerHistory, PlayerId, PlayerStreaks, Streak,
};

/// Longest run of `outcome` anywhere in the history.
pub fn longest_streak(history: &[Attendance], outcome: Outcome) -> u32 {
    let mut best = 0;
    let mut current = 0;

    for attendance in history {
        if outcome.matches(attendance.win) {
            current += 1;
        } else {
            best = best.max(current);
            current = 0;
        }
    }

    best.max(current)
}

/// Run of `outcome` ending at the most recent game.
pub fn current_streak(history: &[Attendance], outcome: Outcome) -> u32 {
    history
        .iter()
        .rev()
        .take_while(|attendance| outcome.matches(attendance.win))
        .count() as u32
}

/// Longest and current streaks for both outcomes.
pub fn player_streaks(history: &[Attendance]) -> PlayerStreaks {
    PlayerStreaks {
        longest_winning: longest_streak(history, Outcome::Win),
        longest_losing: longest_streak(history, Outcome::Loss),
        current_winning: current_streak(history, Outcome::Win),
        current_losing: current_streak(history, Outcome::Loss),
    }
}

/// Split facts into per-player chronological histories.
///
/// Histories are sorted by `played_at` with the game id breaking ties, and
/// returned in ascending player id.
pub fn group_histories(attendances: Vec<Attendance>) -> Vec<PlayerHistory> {
    let mut by_player: BTreeMap<PlayerId, PlayerHistory> = BTreeMap::new();

    for attendance in attendances {
        by_player
            .entry(attendance.player.id)
            .or_insert_with(|| PlayerHistory {
                player: attendance.player.clone(),
                attendances: Vec::new(),
            })
            .attendances
            .push(attendance);
    }

    by_player
        .into_values()
        .map(|mut history| {
            history
                .attendances
                .sort_by(|a, b| a.played_at.cmp(&b.played_at).then(a.game_id.cmp(&b.game_id)));
            history
        })
        .collect()
}

/// Current streak of every player, longest first.
///
/// Equal lengths are ordered by ascending player id, i.e. the player who
/// joined the league first is listed first. Players with no current streak
/// stay in the list with length 0.
pub fn current_streaks(histories: &[PlayerHistory], outcome: Outcome) -> Vec<Streak> {
    let mut streaks: Vec<Streak> = histories
        .iter()
        .map(|history| Streak {
            player: history.player.clone(),
            length: current_streak(&history.attendances, outcome),
            outcome,
        })
        .collect();

    streaks.sort_by(|a, b| {
        b.length
            .cmp(&a.length)
            .then_with(|| a.player.id.cmp(&b.player.id))
    });

    streaks
}

/// League record holders for the longest winning and losing streaks.
///
/// The lowest player id holds a shared record. A record of length 0 is
/// reported as absent.
pub fn longest_streaks(histories: &[PlayerHistory]) -> LongestStreaks {
    LongestStreaks {
        winning: record_holder(histories, Outcome::Win),
        losing: record_holder(histories, Outcome::Loss),
    }
}

fn record_holder(histories: &[PlayerHistory], outcome: Outcome) -> Option<Streak> {
    let mut sorted: Vec<&PlayerHistory> = histories.iter().collect();
    sorted.sort_by_key(|history| history.player.id);

    let mut holder: Option<Streak> = None;
    for history in sorted {
        let length = longest_streak(&history.attendances, outcome);
        let best = holder.as_ref().map_or(0, |streak| streak.length);
        if length > best {
            holder = Some(Streak {
                player: history.player.clone(),
                length,
                outcome,
            });
        }
    }

    holder
}
