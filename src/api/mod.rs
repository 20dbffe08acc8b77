//! REST API endpoints.
//!
//! Axum-based HTTP API for league tables, player
//! breakdowns and streak reports.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::calculate::{CalculateError, SortKey};
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => ApiError::NotFound(what),
            StorageError::Invalid(_) | StorageError::Conflict(_) => {
                ApiError::BadRequest(err.to_string())
            }
            StorageError::Io(_) | StorageError::Json(_) | StorageError::Corrupt { .. } => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<CalculateError> for ApiError {
    fn from(err: CalculateError) -> Self {
        match err {
            CalculateError::UnknownSortKey(_) => ApiError::BadRequest(err.to_string()),
            CalculateError::DegenerateMetric { .. } => ApiError::Internal(err.to_string()),
        }
    }
}

/// Strict sort key lookup; a missing key means the configured default.
pub fn resolve_sort(sort: Option<&str>, default: SortKey) -> Result<SortKey, ApiError> {
    match sort {
        Some(name) => Ok(name.parse::<SortKey>()?),
        None => Ok(default),
    }
}

pub fn parse_uuid(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid id: {}", raw)))
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/players", get(routes::players::list_players))
        .route("/api/players/:id", get(routes::players::player_detail))
        .route("/api/players/:id/fellows", get(routes::players::fellows))
        .route("/api/players/:id/opponents", get(routes::players::opponents))
        .route("/api/seasons", get(routes::seasons::list_seasons))
        .route("/api/seasons/:id/table", get(routes::seasons::season_table))
        .route("/api/streaks", get(routes::streaks::streaks))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// CORS layer for a single configured origin, `*` allowing any.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match origin.parse::<HeaderValue>() {
        Ok(value) if origin != "*" => AllowOrigin::exact(value),
        Ok(_) => AllowOrigin::any(),
        Err(_) => {
            tracing::warn!("Invalid CORS origin '{}', allowing any", origin);
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}
