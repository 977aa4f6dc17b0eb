//! Transcript document generation route.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use tracing::error;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/generate-docs", post(generate_docs))
}

/// POST /generate-docs — multipart `json_data` file → zip attachment.
async fn generate_docs(
    State(_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut payload: Option<Vec<u8>> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("json_data") {
            match field.bytes().await {
                Ok(bytes) => payload = Some(bytes.to_vec()),
                Err(e) => {
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        &format!("Failed to read json_data: {e}"),
                    )
                }
            }
            break;
        }
    }

    let Some(bytes) = payload else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing json_data file in form-data",
        );
    };

    let records: Vec<serde_json::Value> = match serde_json::from_slice(&bytes) {
        Ok(records) => records,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid JSON payload. Must be a non-empty list.",
            )
        }
    };

    match fieldloom_docs::generate_archive(&records) {
        Ok((name, zip_bytes)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/zip".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{name}.zip\""),
                ),
            ],
            zip_bytes,
        )
            .into_response(),
        Err(e) => {
            error!("generate-docs failed: {e}");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
