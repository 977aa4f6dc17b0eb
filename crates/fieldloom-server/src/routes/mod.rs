//! HTTP route handlers.

pub mod docs;
pub mod embedding;
pub mod logs;
pub mod media;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .merge(embedding::routes())
        .merge(docs::routes())
        .merge(media::routes())
        .merge(logs::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "pong" }))
}
