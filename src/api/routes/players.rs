use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{parse_uuid, resolve_sort, ApiError};
use crate::calculate::{build_table, group_histories, player_streaks};
use crate::models::{Player, PlayerId, PlayerStreaks, Standing};
use crate::storage::{AttendanceSource, Scope};

use super::SortParams;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse {
    pub games_count: u32,
    pub standings: Vec<Standing>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetailResponse {
    pub player: Player,
    pub standing: Option<Standing>,
    pub streaks: PlayerStreaks,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeTableResponse {
    pub player: Player,
    pub games_count: u32,
    pub standings: Vec<Standing>,
}

/// All-time table.
pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Result<Json<TableResponse>, ApiError> {
    let key = resolve_sort(params.sort.as_deref(), state.default_sort)?;
    let scoped = state.store.scoped_attendances(&Scope::AllTime)?;
    let standings = build_table(&scoped.attendances, scoped.total_games, key)?;

    Ok(Json(TableResponse {
        games_count: scoped.total_games,
        standings,
    }))
}

pub async fn player_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SortParams>,
) -> Result<Json<PlayerDetailResponse>, ApiError> {
    let key = resolve_sort(params.sort.as_deref(), state.default_sort)?;
    let player = state.store.find_player_by_uuid(&parse_uuid(&id)?)?;

    let scoped = state.store.scoped_attendances(&Scope::AllTime)?;
    let standing = build_table(&scoped.attendances, scoped.total_games, key)?
        .into_iter()
        .find(|s| s.stats.player.id == player.id);

    let streaks = group_histories(scoped.attendances)
        .into_iter()
        .find(|h| h.player.id == player.id)
        .map(|h| player_streaks(&h.attendances))
        .unwrap_or_default();

    Ok(Json(PlayerDetailResponse {
        player,
        standing,
        streaks,
    }))
}

/// Table of everyone who played on the same side as the player.
pub async fn fellows(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SortParams>,
) -> Result<Json<RelativeTableResponse>, ApiError> {
    relative_table(&state, &id, params, Scope::Fellows).map(Json)
}

/// Table of everyone who played against the player, scored from the player's side.
pub async fn opponents(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SortParams>,
) -> Result<Json<RelativeTableResponse>, ApiError> {
    relative_table(&state, &id, params, Scope::Opponents).map(Json)
}

fn relative_table(
    state: &AppState,
    id: &str,
    params: SortParams,
    scope: fn(PlayerId) -> Scope,
) -> Result<RelativeTableResponse, ApiError> {
    let key = resolve_sort(params.sort.as_deref(), state.default_sort)?;
    let player = state.store.find_player_by_uuid(&parse_uuid(id)?)?;

    let scoped = state.store.scoped_attendances(&scope(player.id))?;
    let standings = build_table(&scoped.attendances, scoped.total_games, key)?;

    Ok(RelativeTableResponse {
        player,
        games_count: scoped.total_games,
        standings,
    })
}
