//! Log retrieval routes.
//!
//! Detached pipeline runs report only through the log stream; these routes
//! are how a caller observes their outcome.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::error;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/error-log", get(error_log))
        .route("/force-error", get(force_error))
}

#[derive(Debug, Deserialize)]
struct LogQuery {
    lines: Option<usize>,
    minutes: Option<i64>,
}

/// GET /error-log?lines=N&minutes=M — recent log lines (default last 20).
async fn error_log(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogQuery>,
) -> Json<serde_json::Value> {
    let log = state.logs.tail(query.lines, query.minutes);
    Json(serde_json::json!({ "log": log }))
}

/// GET /force-error — emits an error line so log plumbing can be verified.
async fn force_error() -> impl IntoResponse {
    error!("Intentional error raised from /force-error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "Forced test error for logging" })),
    )
}
