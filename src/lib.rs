//! # Kicker League
//!
//! A local kicker (table football) league tracker with player tables and
//! streak reports.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, seasons, games, attendances, stats)
//! - **calculate**: Aggregation, metrics, ranking and streak detection
//! - **storage**: Filesystem data lake operations (JSONL) and scope resolution
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;

/// Split a comma-separated team list (e.g., "Alice, Bob") into names.
///
/// Blank entries are dropped.
pub fn parse_team(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
