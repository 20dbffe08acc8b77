//! Selecting the attendance facts of a scope.

use std::collections::{HashMap, HashSet};

use super::ScopedAttendances;
use crate::models::{Attendance, Game, GameId, PlayerId, SeasonId};

/// Which slice of the league a table is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every game ever recorded
    AllTime,

    /// Games of one season
    Season(SeasonId),

    /// Players who shared a side with the given player
    Fellows(PlayerId),

    /// Players who faced the given player, scored from that player's side
    Opponents(PlayerId),
}

/// Narrow the full league history to one scope.
///
/// `attendances` and `games` must be the complete league data. For the
/// player-relative scopes the game count is the number of games the
/// reference player attended, and opponent outcomes are flipped so that a
/// row's wins are the games the reference player won against that opponent.
pub fn resolve_scope(
    attendances: Vec<Attendance>,
    games: &[Game],
    scope: &Scope,
) -> ScopedAttendances {
    match *scope {
        Scope::AllTime => ScopedAttendances {
            attendances,
            total_games: games.len() as u32,
        },
        Scope::Season(season_id) => {
            let season_games: HashSet<GameId> = games
                .iter()
                .filter(|game| game.season_id == season_id)
                .map(|game| game.id)
                .collect();

            ScopedAttendances {
                attendances: attendances
                    .into_iter()
                    .filter(|a| season_games.contains(&a.game_id))
                    .collect(),
                total_games: season_games.len() as u32,
            }
        }
        Scope::Fellows(player_id) => player_relative(attendances, player_id, true),
        Scope::Opponents(player_id) => player_relative(attendances, player_id, false),
    }
}

fn player_relative(
    attendances: Vec<Attendance>,
    player_id: PlayerId,
    same_side: bool,
) -> ScopedAttendances {
    let sides: HashMap<GameId, bool> = attendances
        .iter()
        .filter(|a| a.player.id == player_id)
        .map(|a| (a.game_id, a.win))
        .collect();

    let selected = attendances
        .into_iter()
        .filter(|a| a.player.id != player_id)
        .filter_map(|a| {
            let reference_won = *sides.get(&a.game_id)?;
            match (same_side, a.win == reference_won) {
                (true, true) => Some(a),
                (false, false) => Some(a.flipped()),
                _ => None,
            }
        })
        .collect();

    ScopedAttendances {
        attendances: selected,
        total_games: sides.len() as u32,
    }
}
