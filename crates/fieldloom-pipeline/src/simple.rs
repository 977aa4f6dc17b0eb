//! Legacy driver: one fixed content field per item.
//!
//! Predates the classification engine: only the configured `content_field`
//! is chunked, and metadata comes solely from the output-key map resolved
//! against top-level item keys. Items whose content field is blank are
//! skipped so the no-empty-row guarantee holds here too.

use fieldloom_core::{EmbedRequest, Result};
use fieldloom_engine::flatten::stringify;
use fieldloom_engine::{chunk_text, transform_value, MetadataRecord};
use fieldloom_remote::{Embedder, RowStore};
use serde_json::Value;
use tracing::info;

use crate::flexible::{flush, PendingRow};
use crate::{parse_items, EMBED_FLUSH_SIZE};

pub async fn run(
    req: &EmbedRequest,
    payload: &str,
    embedder: &dyn Embedder,
    store: &dyn RowStore,
) -> Result<usize> {
    let items = parse_items(payload)?;

    let mut mappings: Vec<(&String, &String)> = req.metadata_map.iter().collect();
    mappings.sort();

    let mut pending: Vec<PendingRow> = Vec::new();
    let mut total = 0usize;

    for item in &items {
        let content = match item.get(&req.content_field) {
            Some(Value::String(s)) => s.trim().to_string(),
            _ => String::new(),
        };
        if content.is_empty() {
            continue;
        }

        let mut meta = MetadataRecord::new();
        for (out_key, source_key) in &mappings {
            let value = item.get(source_key.as_str()).map(stringify).unwrap_or_default();
            meta.insert(
                (*out_key).clone(),
                transform_value(out_key, &value),
                (*source_key).clone(),
            );
        }
        let metadata = meta.to_json();

        for piece in chunk_text(&content, req.chunk_size, req.chunk_overlap)? {
            pending.push(PendingRow {
                content: piece,
                metadata: metadata.clone(),
            });
            if pending.len() >= EMBED_FLUSH_SIZE {
                total += flush(&mut pending, &req.target.table, embedder, store).await?;
            }
        }
    }

    if !pending.is_empty() {
        total += flush(&mut pending, &req.target.table, embedder, store).await?;
    }

    info!("[upload done] {total} records uploaded");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::{request, CountingEmbedder, RecordingStore};
    use serde_json::json;

    #[tokio::test]
    async fn chunks_content_field_with_mapped_metadata() {
        let payload = json!([{
            "captions": "a ".repeat(400),
            "videoId": "dQw4w9WgXcQ",
            "title": "Hello",
        }])
        .to_string();

        let mut req = request();
        req.metadata_map = [
            ("video_id".to_string(), "videoId".to_string()),
            ("headline".to_string(), "title".to_string()),
        ]
        .into();

        let embedder = CountingEmbedder::new(4);
        let store = RecordingStore::default();
        let total = run(&req, &payload, &embedder, &store).await.unwrap();

        // 799 trimmed chars, size 500 overlap 50 → two chunks
        assert_eq!(total, 2);
        let rows = store.rows();
        assert_eq!(
            rows[0].metadata["video_id"],
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(rows[0].metadata["headline"], "Hello");
        assert!(rows[0].metadata.get("captions").is_none());
    }

    #[tokio::test]
    async fn blank_or_missing_content_is_skipped() {
        let payload = json!([
            {"captions": "   "},
            {"other": "field"},
            {"captions": 42},
        ])
        .to_string();

        let embedder = CountingEmbedder::new(4);
        let store = RecordingStore::default();
        let total = run(&request(), &payload, &embedder, &store).await.unwrap();

        assert_eq!(total, 0);
        assert!(store.rows().is_empty());
    }
}
