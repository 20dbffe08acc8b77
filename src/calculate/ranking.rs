//! Sorting stats tables and assigning competition positions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CalculateError;
use crate::models::{PlayerStats, Standing};

/// Metric a table is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    PointsRatio,
    Wins,
    Games,
    WinRatio,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::PointsRatio,
        SortKey::Wins,
        SortKey::Games,
        SortKey::WinRatio,
    ];

    /// External name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            SortKey::PointsRatio => "pointsRatio",
            SortKey::Wins => "wins",
            SortKey::Games => "games",
            SortKey::WinRatio => "winRatio",
        }
    }

    /// Permissive lookup: unknown names fall back to the default key.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Primary metric of a row.
    pub fn metric(&self, stats: &PlayerStats) -> f64 {
        match self {
            SortKey::PointsRatio => stats.points_ratio,
            SortKey::Wins => stats.wins as f64,
            SortKey::Games => stats.games as f64,
            SortKey::WinRatio => stats.win_ratio,
        }
    }

    /// Secondary metric used when primary metrics are equal.
    fn tie_break(&self, stats: &PlayerStats) -> u32 {
        match self {
            SortKey::Games => stats.wins,
            _ => stats.games,
        }
    }

    /// Descending by metric, then by tie-break, then ascending player id.
    fn compare(&self, a: &PlayerStats, b: &PlayerStats) -> Ordering {
        self.metric(b)
            .total_cmp(&self.metric(a))
            .then_with(|| self.tie_break(b).cmp(&self.tie_break(a)))
            .then_with(|| a.player.id.cmp(&b.player.id))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SortKey {
    type Err = CalculateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| CalculateError::UnknownSortKey(s.to_string()))
    }
}

/// Standard competition positions for metric values already sorted
/// descending: equal values share a position, and the next lower value is
/// placed at its 1-based index (`1, 1, 3`).
pub fn competition_positions(sorted_values: &[f64]) -> Vec<u32> {
    let mut positions = Vec::with_capacity(sorted_values.len());
    let Some(&first) = sorted_values.first() else {
        return positions;
    };

    let mut active_value = first;
    let mut position = 1;

    for (index, &value) in sorted_values.iter().enumerate() {
        if value < active_value {
            position = index as u32 + 1;
            active_value = value;
        }
        positions.push(position);
    }

    positions
}

/// Rank stats rows by `key`.
///
/// Returns a new table; the input is left untouched.
pub fn rank_players(stats: &[PlayerStats], key: SortKey) -> Vec<Standing> {
    let mut sorted: Vec<PlayerStats> = stats.to_vec();
    sorted.sort_by(|a, b| key.compare(a, b));

    let values: Vec<f64> = sorted.iter().map(|s| key.metric(s)).collect();

    competition_positions(&values)
        .into_iter()
        .zip(sorted)
        .map(|(position, stats)| Standing { position, stats })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, PlayerId};
    use pretty_assertions::assert_eq;

    fn stats(id: u32, games: u32, wins: u32, points_ratio: f64) -> PlayerStats {
        PlayerStats {
            player: Player::new(PlayerId::new(id), format!("P{}", id)),
            games,
            wins,
            points: wins * 3,
            points_ratio,
            win_ratio: wins as f64 / games as f64,
            games_ratio: 0.5,
        }
    }

    fn names(table: &[Standing]) -> Vec<String> {
        table.iter().map(|s| s.stats.player.name.clone()).collect()
    }

    fn positions(table: &[Standing]) -> Vec<u32> {
        table.iter().map(|s| s.position).collect()
    }

    #[test]
    fn test_competition_positions_shape() {
        let values = [10.0, 10.0, 7.0, 5.0, 5.0, 3.0];
        assert_eq!(competition_positions(&values), vec![1, 1, 3, 4, 4, 6]);
    }

    #[test]
    fn test_competition_positions_all_tied() {
        assert_eq!(competition_positions(&[2.0, 2.0, 2.0]), vec![1, 1, 1]);
    }

    #[test]
    fn test_competition_positions_empty() {
        assert!(competition_positions(&[]).is_empty());
    }

    #[test]
    fn test_rank_empty_table() {
        assert!(rank_players(&[], SortKey::PointsRatio).is_empty());
        assert!(rank_players(&[], SortKey::Games).is_empty());
    }

    #[test]
    fn test_rank_simple_table() {
        let table = vec![stats(3, 2, 1, 1.5), stats(2, 4, 2, 1.5), stats(1, 4, 4, 3.0)];

        let ranked = rank_players(&table, SortKey::PointsRatio);

        assert_eq!(names(&ranked), vec!["P1", "P2", "P3"]);
        assert_eq!(positions(&ranked), vec![1, 2, 2]);
    }

    #[test]
    fn test_rank_does_not_touch_input() {
        let table = vec![stats(2, 4, 1, 0.75), stats(1, 4, 4, 3.0)];
        let before = table.clone();

        let _ = rank_players(&table, SortKey::Wins);
        assert_eq!(table, before);
    }

    #[test]
    fn test_rank_by_wins_ties_prefer_more_games() {
        let table = vec![stats(1, 5, 3, 1.8), stats(2, 8, 3, 1.1), stats(3, 4, 4, 3.0)];

        let ranked = rank_players(&table, SortKey::Wins);

        assert_eq!(names(&ranked), vec!["P3", "P2", "P1"]);
        assert_eq!(positions(&ranked), vec![1, 2, 2]);
    }

    #[test]
    fn test_rank_by_games_ties_prefer_more_wins() {
        let table = vec![stats(1, 6, 1, 0.5), stats(2, 6, 4, 2.0), stats(3, 2, 2, 2.0)];

        let ranked = rank_players(&table, SortKey::Games);

        assert_eq!(names(&ranked), vec!["P2", "P1", "P3"]);
        assert_eq!(positions(&ranked), vec![1, 1, 3]);
    }

    #[test]
    fn test_rank_by_win_ratio() {
        let table = vec![stats(1, 4, 2, 1.5), stats(2, 2, 2, 1.5), stats(3, 8, 4, 1.5)];

        let ranked = rank_players(&table, SortKey::WinRatio);

        assert_eq!(names(&ranked), vec!["P2", "P3", "P1"]);
        assert_eq!(positions(&ranked), vec![1, 2, 2]);
    }

    #[test]
    fn test_full_ties_fall_back_to_player_id() {
        let table = vec![stats(9, 4, 2, 1.5), stats(4, 4, 2, 1.5)];

        let ranked = rank_players(&table, SortKey::PointsRatio);
        assert_eq!(names(&ranked), vec!["P4", "P9"]);
        assert_eq!(positions(&ranked), vec![1, 1]);
    }

    #[test]
    fn test_ranked_metric_is_non_increasing() {
        let table = vec![
            stats(1, 3, 1, 1.0),
            stats(2, 7, 5, 2.1),
            stats(3, 5, 5, 3.0),
            stats(4, 7, 2, 0.9),
            stats(5, 1, 0, 0.0),
        ];

        for key in SortKey::ALL {
            let ranked = rank_players(&table, key);
            for pair in ranked.windows(2) {
                let (a, b) = (key.metric(&pair[0].stats), key.metric(&pair[1].stats));
                assert!(a >= b, "{} not sorted: {} < {}", key, a, b);
                if a == b {
                    assert_eq!(pair[0].position, pair[1].position);
                }
            }
        }
    }

    #[test]
    fn test_sort_key_parse_strict() {
        assert_eq!("wins".parse::<SortKey>().unwrap(), SortKey::Wins);
        assert_eq!("winRatio".parse::<SortKey>().unwrap(), SortKey::WinRatio);
        assert!(matches!(
            "wint".parse::<SortKey>(),
            Err(CalculateError::UnknownSortKey(name)) if name == "wint"
        ));
    }

    #[test]
    fn test_sort_key_permissive_fallback() {
        assert_eq!(SortKey::from_name_or_default("games"), SortKey::Games);
        assert_eq!(SortKey::from_name_or_default("bogus"), SortKey::PointsRatio);
        assert_eq!(SortKey::from_name_or_default(""), SortKey::PointsRatio);
    }

    #[test]
    fn test_sort_key_names_round_trip() {
        for key in SortKey::ALL {
            assert_eq!(key.name().parse::<SortKey>().unwrap(), key);
            assert_eq!(
                serde_json::to_string(&key).unwrap(),
                format!("\"{}\"", key.name())
            );
        }
    }
}
