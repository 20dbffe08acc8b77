use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{parse_uuid, resolve_sort, ApiError};
use crate::calculate::build_table;
use crate::models::{Season, SeasonSummary, Standing};
use crate::storage::{AttendanceSource, Scope, ACTIVE_SEASON_ALIAS};

use super::SortParams;

#[derive(Debug, Serialize)]
pub struct SeasonListResponse {
    pub seasons: Vec<SeasonSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonTableResponse {
    pub season: Season,
    pub games_count: u32,
    pub standings: Vec<Standing>,
}

pub async fn list_seasons(
    State(state): State<AppState>,
) -> Result<Json<SeasonListResponse>, ApiError> {
    let seasons = state.store.season_summaries()?;
    Ok(Json(SeasonListResponse { seasons }))
}

/// Table of one season; `active` selects the active season.
pub async fn season_table(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SortParams>,
) -> Result<Json<SeasonTableResponse>, ApiError> {
    let key = resolve_sort(params.sort.as_deref(), state.default_sort)?;
    let season = if id == ACTIVE_SEASON_ALIAS {
        state.store.active_season()?
    } else {
        state.store.find_season_by_uuid(&parse_uuid(&id)?)?
    };

    let scoped = state.store.scoped_attendances(&Scope::Season(season.id))?;
    let standings = build_table(&scoped.attendances, scoped.total_games, key)?;

    Ok(Json(SeasonTableResponse {
        season,
        games_count: scoped.total_games,
        standings,
    }))
}
