//! Batch pipeline drivers.
//!
//! A driver runs detached from the originating request: the HTTP layer
//! validates configuration, spawns [`run_detached`], and returns an accepted
//! acknowledgment immediately. The driver's eventual outcome is observable
//! only through logs.

pub mod flexible;
pub mod simple;

#[cfg(test)]
pub(crate) mod tests_support;

use fieldloom_core::EmbedRequest;
use fieldloom_remote::{fetch_json, OpenAiEmbedder, SupabaseRowStore};
use tracing::{error, info};

/// Rows accumulated before an embed-and-insert flush.
pub const EMBED_FLUSH_SIZE: usize = 128;

/// Which driver to run for a submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    /// Per-path classification over flattened items.
    Flexible,
    /// Legacy fixed content field.
    Simple,
}

/// Fetch the source document and run one full pipeline.
///
/// Fatal failures (fetch, malformed payload) are logged and swallowed here;
/// the run is already detached and has no caller to report to.
pub async fn run_detached(
    kind: PipelineKind,
    req: EmbedRequest,
    http: reqwest::Client,
    task_id: String,
) {
    let embedder = OpenAiEmbedder::new(http.clone(), &req.openai_key);
    let store = SupabaseRowStore::new(http.clone(), &req.target);

    let outcome = async {
        let payload = fetch_json(&http, &req.file_url).await?;
        match kind {
            PipelineKind::Flexible => flexible::run(&req, &payload, &embedder, &store).await,
            PipelineKind::Simple => simple::run(&req, &payload, &embedder, &store).await,
        }
    }
    .await;

    match outcome {
        Ok(total) => info!("[task {task_id}] done, {total} records uploaded"),
        Err(e) => error!("[task {task_id}] failed: {e}"),
    }
}

pub(crate) fn parse_items(
    payload: &str,
) -> fieldloom_core::Result<Vec<serde_json::Value>> {
    let value: serde_json::Value = serde_json::from_str(payload)?;
    match value {
        serde_json::Value::Array(items) => Ok(items),
        // A single object is treated as a one-item batch.
        obj @ serde_json::Value::Object(_) => Ok(vec![obj]),
        _ => Err(fieldloom_core::Error::Fetch(
            "payload must be a JSON array of items".into(),
        )),
    }
}
