//! The output row — the only value that outlives a request.

use serde::Serialize;

/// One (content, metadata, embedding) row handed to the row store.
///
/// Rows are only ever constructed for non-blank chunks; an item that yields
/// zero chunks yields zero rows.
#[derive(Debug, Clone, Serialize)]
pub struct OutputRow {
    pub content: String,
    pub metadata: serde_json::Value,
    pub embedding: Vec<f32>,
    pub created_at: String,
}

impl OutputRow {
    pub fn new(content: String, metadata: serde_json::Value, embedding: Vec<f32>) -> Self {
        Self {
            content,
            metadata,
            embedding,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
