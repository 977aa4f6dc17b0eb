//! Embedding upload routes.
//!
//! Both endpoints validate configuration synchronously, spawn the pipeline
//! detached, and acknowledge immediately with a task id; outcomes are
//! observed via `/error-log`.

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use fieldloom_core::config::RawEmbedRequest;
use fieldloom_pipeline::{run_detached, PipelineKind};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload-flexible", post(upload_flexible))
        .route("/upload-flexible-smart", post(upload_flexible_smart))
}

/// POST /upload-flexible — legacy fixed content field pipeline.
async fn upload_flexible(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<RawEmbedRequest>,
) -> impl IntoResponse {
    submit(&state, &headers, form, PipelineKind::Simple)
}

/// POST /upload-flexible-smart — per-field classification pipeline.
async fn upload_flexible_smart(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<RawEmbedRequest>,
) -> impl IntoResponse {
    submit(&state, &headers, form, PipelineKind::Flexible)
}

fn submit(
    state: &AppState,
    headers: &HeaderMap,
    mut raw: RawEmbedRequest,
    kind: PipelineKind,
) -> (StatusCode, Json<serde_json::Value>) {
    raw.openai_key = header_value(headers, "x-openai-api-key");
    raw.supabase_url = header_value(headers, "x-supabase-url");
    raw.supabase_key = header_value(headers, "x-supabase-key");

    match raw.validate() {
        Err(failure) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "Missing or invalid fields",
                "missing": failure.missing,
                "invalid": failure.invalid,
            })),
        ),
        Ok(req) => {
            let task_id = uuid::Uuid::new_v4().to_string();
            tokio::spawn(run_detached(
                kind,
                req,
                state.http.clone(),
                task_id.clone(),
            ));
            (
                StatusCode::ACCEPTED,
                Json(serde_json::json!({
                    "status": "accepted",
                    "task_id": task_id,
                    "message": "Embedding process started in background",
                    "note": "Check /error-log for updates",
                })),
            )
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
