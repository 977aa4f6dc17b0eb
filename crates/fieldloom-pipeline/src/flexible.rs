//! Flexible driver: classification-based field routing per item.

use fieldloom_core::config::MetaKeyMode;
use fieldloom_core::{EmbedRequest, Error, OutputRow, Result};
use fieldloom_engine::{
    chunk_text, classify, compress_leaf_keys, ClassifyConfig, MetadataRecord, PatternSet,
};
use fieldloom_remote::{Embedder, RowStore};
use tracing::info;

use crate::{parse_items, EMBED_FLUSH_SIZE};

/// A row awaiting its embedding.
pub(crate) struct PendingRow {
    pub content: String,
    pub metadata: serde_json::Value,
}

/// Run the flexible pipeline over an already-fetched payload.
///
/// Per item: classify every flattened path, compress metadata keys if
/// requested, chunk each selected source, and queue one row per non-blank
/// chunk with a `source_field` trace. Items with no chunk sources, or whose
/// sources chunk to nothing, contribute zero rows. Queued rows flush at
/// [`EMBED_FLUSH_SIZE`]; a final partial batch flushes at the end.
pub async fn run(
    req: &EmbedRequest,
    payload: &str,
    embedder: &dyn Embedder,
    store: &dyn RowStore,
) -> Result<usize> {
    let items = parse_items(payload)?;

    let cfg = ClassifyConfig {
        threshold: req.threshold,
        force_chunk: PatternSet::from_raw(&req.force_chunk_keys),
        force_meta: PatternSet::from_raw(&req.force_meta_keys),
        exclude_chunk: PatternSet::from_raw(&req.exclude_chunk_keys),
        exclude_meta: PatternSet::from_raw(&req.exclude_meta_keys),
        output_map: req.metadata_map.clone(),
    };

    let mut pending: Vec<PendingRow> = Vec::new();
    let mut total = 0usize;

    for item in &items {
        let classified = classify(item, &cfg);
        if classified.chunk_sources.is_empty() {
            continue;
        }

        let base_meta = match req.meta_key_mode {
            MetaKeyMode::Leaf => compress_leaf_keys(&classified.metadata),
            MetaKeyMode::Full => classified.metadata,
        };

        for source in &classified.chunk_sources {
            for piece in chunk_text(&source.text, req.chunk_size, req.chunk_overlap)? {
                pending.push(tag_row(piece, &base_meta, &source.path));
                if pending.len() >= EMBED_FLUSH_SIZE {
                    total += flush(&mut pending, &req.target.table, embedder, store).await?;
                }
            }
        }
    }

    if !pending.is_empty() {
        total += flush(&mut pending, &req.target.table, embedder, store).await?;
    }

    info!("[flex upload done] {total} records uploaded");
    Ok(total)
}

fn tag_row(content: String, base_meta: &MetadataRecord, source_path: &str) -> PendingRow {
    let mut tagged = base_meta.clone();
    tagged.insert(
        "source_field".to_string(),
        source_path.to_string(),
        source_path.to_string(),
    );
    PendingRow {
        content,
        metadata: tagged.to_json(),
    }
}

/// Embed the queued contents in order and hand fully formed rows to the
/// store. Row `i`'s embedding is response element `i`.
pub(crate) async fn flush(
    pending: &mut Vec<PendingRow>,
    table: &str,
    embedder: &dyn Embedder,
    store: &dyn RowStore,
) -> Result<usize> {
    let texts: Vec<String> = pending.iter().map(|row| row.content.clone()).collect();
    let embeddings = embedder.embed(&texts).await?;
    if embeddings.len() != texts.len() {
        return Err(Error::Embedding(format!(
            "embedder returned {} vectors for {} rows",
            embeddings.len(),
            texts.len()
        )));
    }

    let rows: Vec<OutputRow> = pending
        .drain(..)
        .zip(embeddings)
        .map(|(row, embedding)| OutputRow::new(row.content, row.metadata, embedding))
        .collect();

    store.insert(table, &rows).await?;
    Ok(rows.len())
}
