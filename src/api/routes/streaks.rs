use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{current_streaks, group_histories, longest_streaks};
use crate::models::{Outcome, Streak};
use crate::storage::{AttendanceSource, Scope};

#[derive(Debug, Deserialize)]
pub struct StreakParams {
    pub outcome: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreaksResponse {
    pub longest_winning: Option<Streak>,
    pub longest_losing: Option<Streak>,
    pub current: Vec<Streak>,
}

/// League record holders plus everyone's current streak.
pub async fn streaks(
    State(state): State<AppState>,
    Query(params): Query<StreakParams>,
) -> Result<Json<StreaksResponse>, ApiError> {
    let outcome = match params.outcome.as_deref() {
        Some(raw) => raw.parse::<Outcome>().map_err(ApiError::BadRequest)?,
        None => Outcome::Win,
    };

    let scoped = state.store.scoped_attendances(&Scope::AllTime)?;
    let histories = group_histories(scoped.attendances);
    let longest = longest_streaks(&histories);

    Ok(Json(StreaksResponse {
        longest_winning: longest.winning,
        longest_losing: longest.losing,
        current: current_streaks(&histories, outcome),
    }))
}
