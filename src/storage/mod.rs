//! Filesystem league storage.
//!
//! Handles reading and writing the local data lake:
//! - JSONL files for players, seasons, games and attendances
//! - Scope resolution into attendance facts for the engine

pub mod jsonl;
pub mod league;
pub mod scope;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::Attendance;

pub use jsonl::{EntityType, JsonlFile};
pub use league::{LeagueStore, ACTIVE_SEASON_ALIAS};
pub use scope::{resolve_scope, Scope};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt row in {path:?} at line {line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Invalid(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Path of the JSONL file holding one entity type.
    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        self.data_dir.join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Attendance facts of one scope plus the number of games in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopedAttendances {
    pub attendances: Vec<Attendance>,
    pub total_games: u32,
}

/// The one capability the statistics engine needs from storage.
pub trait AttendanceSource {
    /// Resolve a scope into its attendance facts, oldest game first.
    fn scoped_attendances(&self, scope: &Scope) -> Result<ScopedAttendances, StorageError>;
}
