//! fieldloom — JSON ingestion, embedding upload, and media formatting server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod logbuf;
mod routes;
mod state;

use logbuf::LogBuffer;
use state::AppState;

fn resolve_output_dir() -> PathBuf {
    std::env::var("FIELDLOOM_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("outputs"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logs = LogBuffer::new(2000);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(logs.clone())
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    let output_dir = resolve_output_dir();
    std::fs::create_dir_all(&output_dir)?;
    info!("Output directory: {}", output_dir.display());

    let state = Arc::new(AppState::new(logs, output_dir));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("fieldloom server listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
