//! Video format routes: submit, poll status, download encodes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Form, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use fieldloom_media::{clear_old_outputs, run_format_job, FormatJob};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/format", post(format_video))
        .route("/format_status/{job_id}", get(format_status))
        .route("/download/{filename}", get(download_file))
}

/// POST /format — form: `video_url` plus any number of
/// `<platform>=width,height` pairs. Responds immediately; encoding runs
/// detached.
async fn format_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(mut form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let Some(video_url) = form.remove("video_url").filter(|u| !u.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "No video_url provided" })),
        );
    };

    let mut targets: Vec<(String, String)> = form.into_iter().collect();
    targets.sort();
    if targets.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "No resize data provided" })),
        );
    }

    // Each request starts from a clean slate of encodes.
    clear_old_outputs(&state.media.output_dir);

    let job_id = uuid::Uuid::new_v4().to_string();
    state.media.jobs.put(FormatJob::processing(job_id.clone()));

    let base_url = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|host| format!("http://{host}"))
        .unwrap_or_else(|| "http://localhost".to_string());

    tokio::spawn(run_format_job(
        state.media.clone(),
        base_url,
        job_id.clone(),
        video_url,
        targets,
    ));

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "processing",
            "format_job_id": job_id,
            "message": "Video formatting started. Check status using /format_status/<format_job_id>",
        })),
    )
}

/// GET /format_status/:job_id — job snapshot.
async fn format_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    match state.media.jobs.get(&job_id) {
        Some(job) => (StatusCode::OK, Json(serde_json::json!(job))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Invalid format_job_id" })),
        ),
    }
}

/// GET /download/:filename — serve one finished encode as an attachment.
async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> impl IntoResponse {
    // No directory components; filenames are flat in the output dir.
    if filename.contains(['/', '\\']) || filename.contains("..") {
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "error": "Path traversal not allowed" })),
        )
            .into_response();
    }

    let path = state.media.output_dir.join(&filename);
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "video/mp4".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "File not found" })),
        )
            .into_response(),
    }
}
