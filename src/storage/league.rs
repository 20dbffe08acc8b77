//! League store backed by JSONL files.

use std::collections::{HashMap, HashSet};
use std::slice;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    resolve_scope, AttendanceSource, EntityType, JsonlFile, Scope, ScopedAttendances,
    StorageConfig, StorageError,
};
use crate::models::{
    Attendance, AttendanceId, AttendanceRecord, EntityId, Game, GameId, Player, PlayerId, Season,
    SeasonId, SeasonSummary,
};

/// Season name that selects whichever season is active.
pub const ACTIVE_SEASON_ALIAS: &str = "active";

/// A recorded game with the players on each side.
#[derive(Debug, Clone)]
pub struct RecordedGame {
    pub game: Game,
    pub season: Season,
    pub winners: Vec<Player>,
    pub losers: Vec<Player>,
}

/// Players, seasons, games and attendances under one data directory.
#[derive(Debug, Clone)]
pub struct LeagueStore {
    config: StorageConfig,
}

impl LeagueStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn players(&self) -> Result<Vec<Player>, StorageError> {
        JsonlFile::for_entity(&self.config, EntityType::Player).read_all()
    }

    pub fn seasons(&self) -> Result<Vec<Season>, StorageError> {
        JsonlFile::for_entity(&self.config, EntityType::Season).read_all()
    }

    pub fn games(&self) -> Result<Vec<Game>, StorageError> {
        JsonlFile::for_entity(&self.config, EntityType::Game).read_all()
    }

    pub fn attendance_records(&self) -> Result<Vec<AttendanceRecord>, StorageError> {
        JsonlFile::for_entity(&self.config, EntityType::Attendance).read_all()
    }

    /// All attendances joined with their player and game, oldest game first.
    ///
    /// Records pointing at unknown players or games are skipped.
    pub fn attendances(&self) -> Result<Vec<Attendance>, StorageError> {
        let players: HashMap<PlayerId, Player> =
            self.players()?.into_iter().map(|p| (p.id, p)).collect();
        let games: HashMap<GameId, Game> = self.games()?.into_iter().map(|g| (g.id, g)).collect();

        let mut attendances = Vec::new();
        for record in self.attendance_records()? {
            let (Some(player), Some(game)) =
                (players.get(&record.player_id), games.get(&record.game_id))
            else {
                warn!(
                    "Skipping attendance {} with unknown player {} or game {}",
                    record.id, record.player_id, record.game_id
                );
                continue;
            };

            attendances.push(Attendance {
                player: player.clone(),
                game_id: game.id,
                win: record.win,
                played_at: game.played_at,
            });
        }

        attendances.sort_by(|a, b| a.played_at.cmp(&b.played_at).then(a.game_id.cmp(&b.game_id)));
        Ok(attendances)
    }

    pub fn find_player_by_name(&self, name: &str) -> Result<Player, StorageError> {
        self.players()?
            .into_iter()
            .find(|p| p.name == name.trim())
            .ok_or_else(|| StorageError::NotFound(format!("player '{}'", name)))
    }

    pub fn find_player_by_uuid(&self, uuid: &Uuid) -> Result<Player, StorageError> {
        self.players()?
            .into_iter()
            .find(|p| p.uuid == *uuid)
            .ok_or_else(|| StorageError::NotFound(format!("player {}", uuid)))
    }

    pub fn find_season_by_name(&self, name: &str) -> Result<Season, StorageError> {
        self.seasons()?
            .into_iter()
            .find(|s| s.name == name.trim())
            .ok_or_else(|| StorageError::NotFound(format!("season '{}'", name)))
    }

    pub fn find_season_by_uuid(&self, uuid: &Uuid) -> Result<Season, StorageError> {
        self.seasons()?
            .into_iter()
            .find(|s| s.uuid == *uuid)
            .ok_or_else(|| StorageError::NotFound(format!("season {}", uuid)))
    }

    pub fn active_season(&self) -> Result<Season, StorageError> {
        self.seasons()?
            .into_iter()
            .find(|s| s.active)
            .ok_or_else(|| StorageError::NotFound("active season".to_string()))
    }

    /// Seasons in creation order with their game counts.
    pub fn season_summaries(&self) -> Result<Vec<SeasonSummary>, StorageError> {
        let mut counts: HashMap<SeasonId, u32> = HashMap::new();
        for game in self.games()? {
            *counts.entry(game.season_id).or_default() += 1;
        }

        let mut seasons = self.seasons()?;
        seasons.sort_by_key(|s| s.id);

        Ok(seasons
            .into_iter()
            .map(|season| SeasonSummary {
                games_count: counts.get(&season.id).copied().unwrap_or(0),
                season,
            })
            .collect())
    }

    pub fn create_player(&self, name: &str) -> Result<Player, StorageError> {
        let name = validate_name(name, "player")?;
        let players = self.players()?;
        if players.iter().any(|p| p.name == name) {
            return Err(StorageError::Conflict(format!("player '{}'", name)));
        }

        let id = EntityId::next_after(players.iter().map(|p| p.id));
        let player = Player::new(id, name);
        JsonlFile::for_entity(&self.config, EntityType::Player).append(slice::from_ref(&player))?;

        info!("Created player {} ({})", player.name, player.uuid);
        Ok(player)
    }

    pub fn create_season(&self, name: &str) -> Result<Season, StorageError> {
        let name = validate_name(name, "season")?;
        if name.eq_ignore_ascii_case(ACTIVE_SEASON_ALIAS) {
            return Err(StorageError::Invalid(format!(
                "'{}' is reserved for the active season",
                ACTIVE_SEASON_ALIAS
            )));
        }
        let seasons = self.seasons()?;
        if seasons.iter().any(|s| s.name == name) {
            return Err(StorageError::Conflict(format!("season '{}'", name)));
        }

        let id = EntityId::next_after(seasons.iter().map(|s| s.id));
        let season = Season::new(id, name);
        JsonlFile::for_entity(&self.config, EntityType::Season).append(slice::from_ref(&season))?;

        info!("Created season {} ({})", season.name, season.uuid);
        Ok(season)
    }

    /// Make the named season the only active one.
    pub fn activate_season(&self, name: &str) -> Result<Season, StorageError> {
        let mut seasons = self.seasons()?;
        let Some(index) = seasons.iter().position(|s| s.name == name.trim()) else {
            return Err(StorageError::NotFound(format!("season '{}'", name)));
        };

        for (i, season) in seasons.iter_mut().enumerate() {
            season.active = i == index;
        }
        JsonlFile::for_entity(&self.config, EntityType::Season).replace(&seasons)?;

        let activated = seasons.swap_remove(index);
        info!("Activated season {}", activated.name);
        Ok(activated)
    }

    /// Record a game in the active season.
    pub fn create_game(
        &self,
        winner_names: &[String],
        loser_names: &[String],
        played_at: Option<DateTime<Utc>>,
    ) -> Result<RecordedGame, StorageError> {
        if winner_names.is_empty() || loser_names.is_empty() {
            return Err(StorageError::Invalid(
                "a game needs at least one winner and one loser".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in winner_names.iter().chain(loser_names) {
            if !seen.insert(name.trim()) {
                return Err(StorageError::Invalid(format!(
                    "player '{}' is listed more than once",
                    name.trim()
                )));
            }
        }

        let season = self.active_season()?;

        let players = self.players()?;
        let winners = resolve_team(&players, winner_names);
        let losers = resolve_team(&players, loser_names);
        let unknown: Vec<&str> = winners
            .iter()
            .chain(&losers)
            .filter_map(|r| r.as_ref().err().map(String::as_str))
            .collect();
        if !unknown.is_empty() {
            return Err(StorageError::NotFound(format!(
                "players: {}",
                unknown.join(", ")
            )));
        }
        let winners: Vec<Player> = winners.into_iter().flatten().collect();
        let losers: Vec<Player> = losers.into_iter().flatten().collect();

        // Attendances are written first, so ids they reference are taken too.
        let existing = self.attendance_records()?;
        let game_id = EntityId::next_after(
            self.games()?
                .iter()
                .map(|g| g.id)
                .chain(existing.iter().map(|a| a.game_id)),
        );
        let game = Game::new(game_id, season.id, played_at.unwrap_or_else(Utc::now));

        let mut next_attendance: AttendanceId =
            EntityId::next_after(existing.iter().map(|a| a.id));
        let mut records = Vec::with_capacity(winners.len() + losers.len());
        for (team, win) in [(&winners, true), (&losers, false)] {
            for player in team {
                records.push(AttendanceRecord {
                    id: next_attendance,
                    player_id: player.id,
                    game_id: game.id,
                    win,
                });
                next_attendance = EntityId::new(next_attendance.value() + 1);
            }
        }

        JsonlFile::for_entity(&self.config, EntityType::Attendance).append(&records)?;
        JsonlFile::for_entity(&self.config, EntityType::Game).append(slice::from_ref(&game))?;

        info!(
            "Recorded game {} in season {}: {} beat {}",
            game.id,
            season.name,
            team_names(&winners),
            team_names(&losers)
        );

        Ok(RecordedGame {
            game,
            season,
            winners,
            losers,
        })
    }
}

impl AttendanceSource for LeagueStore {
    fn scoped_attendances(&self, scope: &Scope) -> Result<ScopedAttendances, StorageError> {
        let games = self.games()?;
        Ok(resolve_scope(self.attendances()?, &games, scope))
    }
}

fn validate_name(name: &str, kind: &str) -> Result<String, StorageError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StorageError::Invalid(format!("{} name must not be empty", kind)));
    }
    Ok(name.to_string())
}

/// Look up each name, keeping unknown names as errors.
fn resolve_team(players: &[Player], names: &[String]) -> Vec<Result<Player, String>> {
    names
        .iter()
        .map(|name| {
            let name = name.trim();
            players
                .iter()
                .find(|p| p.name == name)
                .cloned()
                .ok_or_else(|| name.to_string())
        })
        .collect()
}

fn team_names(team: &[Player]) -> String {
    team.iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(" & ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn store(temp_dir: &TempDir) -> LeagueStore {
        LeagueStore::new(StorageConfig::new(temp_dir.path().to_path_buf()))
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn seeded(temp_dir: &TempDir) -> LeagueStore {
        let store = store(temp_dir);
        for name in ["Alice", "Bob", "Carol", "Dave"] {
            store.create_player(name).unwrap();
        }
        store.create_season("Spring").unwrap();
        store.activate_season("Spring").unwrap();
        store
    }

    #[test]
    fn test_create_player_assigns_sequential_ids() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let alice = store.create_player("Alice").unwrap();
        let bob = store.create_player("  Bob ").unwrap();

        assert_eq!(alice.id, PlayerId::new(1));
        assert_eq!(bob.id, PlayerId::new(2));
        assert_eq!(bob.name, "Bob");
        assert_eq!(store.players().unwrap().len(), 2);
    }

    #[test]
    fn test_create_player_rejects_duplicates_and_blanks() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        store.create_player("Alice").unwrap();
        assert!(matches!(
            store.create_player("Alice"),
            Err(StorageError::Conflict(_))
        ));
        assert!(matches!(store.create_player("   "), Err(StorageError::Invalid(_))));
    }

    #[test]
    fn test_find_player() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let alice = store.create_player("Alice").unwrap();

        assert_eq!(store.find_player_by_name("Alice").unwrap(), alice);
        assert_eq!(store.find_player_by_uuid(&alice.uuid).unwrap(), alice);
        assert!(matches!(
            store.find_player_by_name("Zed"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_damaged_player_row_fails_instead_of_reusing_id() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded(&temp_dir);
        store
            .create_game(&names(&["Alice"]), &names(&["Bob"]), None)
            .unwrap();

        let path = store.config().entity_path(EntityType::Player);
        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines: Vec<&str> = contents.lines().collect();
        let bob = lines[1].to_string();
        lines[1] = &bob[..bob.len() / 2];
        std::fs::write(&path, lines.join("\n") + "\n").unwrap();

        match store.create_player("Eve") {
            Err(StorageError::Corrupt { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            store.scoped_attendances(&Scope::AllTime),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_create_season_rejects_active_alias() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        for name in ["active", " Active ", "ACTIVE"] {
            assert!(matches!(
                store.create_season(name),
                Err(StorageError::Invalid(_))
            ));
        }
        assert!(store.seasons().unwrap().is_empty());
        assert!(store.create_season("Active Summer").is_ok());
    }

    #[test]
    fn test_only_one_active_season() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        store.create_season("Spring").unwrap();
        store.create_season("Summer").unwrap();
        assert!(store.active_season().is_err());

        store.activate_season("Spring").unwrap();
        let summer = store.activate_season("Summer").unwrap();

        assert!(summer.active);
        let active: Vec<String> = store
            .seasons()
            .unwrap()
            .into_iter()
            .filter(|s| s.active)
            .map(|s| s.name)
            .collect();
        assert_eq!(active, vec!["Summer".to_string()]);
        assert!(matches!(
            store.activate_season("Winter"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_game_requires_active_season() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        store.create_player("Alice").unwrap();
        store.create_player("Bob").unwrap();

        let result = store.create_game(&names(&["Alice"]), &names(&["Bob"]), None);
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_create_game_writes_attendances() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded(&temp_dir);
        let played_at = Utc.with_ymd_and_hms(2024, 4, 2, 12, 30, 0).unwrap();

        let recorded = store
            .create_game(
                &names(&["Alice", "Bob"]),
                &names(&["Carol", "Dave"]),
                Some(played_at),
            )
            .unwrap();

        assert_eq!(recorded.season.name, "Spring");
        assert_eq!(recorded.game.played_at, played_at);
        assert_eq!(recorded.winners.len(), 2);

        let records = store.attendance_records().unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records.iter().filter(|r| r.win).count(), 2);
        let ids: HashSet<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_create_game_validation() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded(&temp_dir);

        assert!(matches!(
            store.create_game(&names(&["Alice"]), &[], None),
            Err(StorageError::Invalid(_))
        ));
        assert!(matches!(
            store.create_game(&names(&["Alice"]), &names(&["Alice"]), None),
            Err(StorageError::Invalid(_))
        ));

        match store.create_game(&names(&["Alice", "Zed"]), &names(&["Yan"]), None) {
            Err(StorageError::NotFound(msg)) => {
                assert!(msg.contains("Zed"));
                assert!(msg.contains("Yan"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(store.games().unwrap().is_empty());
    }

    #[test]
    fn test_orphan_attendances_keep_their_game_id() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded(&temp_dir);
        let alice = store.find_player_by_name("Alice").unwrap();

        // Rows left behind by a game whose own row never got written.
        let orphan = AttendanceRecord {
            id: AttendanceId::new(1),
            player_id: alice.id,
            game_id: GameId::new(1),
            win: true,
        };
        JsonlFile::for_entity(store.config(), EntityType::Attendance)
            .append(&[orphan])
            .unwrap();

        let recorded = store
            .create_game(&names(&["Bob"]), &names(&["Carol"]), None)
            .unwrap();
        assert_eq!(recorded.game.id, GameId::new(2));

        let attendances = store.attendances().unwrap();
        assert_eq!(attendances.len(), 2);
        assert!(attendances.iter().all(|a| a.player.id != alice.id));
        assert_eq!(store.attendance_records().unwrap().len(), 3);
    }

    #[test]
    fn test_attendances_are_chronological() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded(&temp_dir);
        let late = Utc.with_ymd_and_hms(2024, 4, 9, 12, 0, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap();

        store
            .create_game(&names(&["Alice"]), &names(&["Bob"]), Some(late))
            .unwrap();
        store
            .create_game(&names(&["Bob"]), &names(&["Alice"]), Some(early))
            .unwrap();

        let attendances = store.attendances().unwrap();
        assert_eq!(attendances.len(), 4);
        assert_eq!(attendances[0].played_at, early);
        assert_eq!(attendances[3].played_at, late);
    }

    #[test]
    fn test_season_summaries_count_games() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded(&temp_dir);
        store.create_season("Summer").unwrap();

        store
            .create_game(&names(&["Alice"]), &names(&["Bob"]), None)
            .unwrap();
        store
            .create_game(&names(&["Carol"]), &names(&["Dave"]), None)
            .unwrap();

        let summaries = store.season_summaries().unwrap();
        let counts: Vec<(String, u32)> = summaries
            .into_iter()
            .map(|s| (s.season.name, s.games_count))
            .collect();
        assert_eq!(
            counts,
            vec![("Spring".to_string(), 2), ("Summer".to_string(), 0)]
        );
    }

    #[test]
    fn test_scoped_attendances_for_season() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded(&temp_dir);
        store
            .create_game(&names(&["Alice"]), &names(&["Bob"]), None)
            .unwrap();

        store.create_season("Summer").unwrap();
        let summer = store.activate_season("Summer").unwrap();
        store
            .create_game(&names(&["Carol", "Alice"]), &names(&["Dave"]), None)
            .unwrap();

        let all = store.scoped_attendances(&Scope::AllTime).unwrap();
        assert_eq!(all.total_games, 2);
        assert_eq!(all.attendances.len(), 5);

        let season = store.scoped_attendances(&Scope::Season(summer.id)).unwrap();
        assert_eq!(season.total_games, 1);
        assert_eq!(season.attendances.len(), 3);
    }
}
