//! In-memory collaborator doubles for driver tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fieldloom_core::config::MetaKeyMode;
use fieldloom_core::{EmbedRequest, OutputRow, Result, StoreTarget};
use fieldloom_remote::{Embedder, RowStore};
use parking_lot::Mutex;

pub fn request() -> EmbedRequest {
    EmbedRequest {
        openai_key: "sk-test".into(),
        target: StoreTarget {
            supabase_url: "https://db.example.com".into(),
            supabase_key: "anon".into(),
            table: "documents".into(),
        },
        file_url: "https://files.example.com/data.json".into(),
        content_field: "captions".into(),
        chunk_size: 500,
        chunk_overlap: 50,
        threshold: 70,
        force_chunk_keys: String::new(),
        force_meta_keys: String::new(),
        exclude_chunk_keys: String::new(),
        exclude_meta_keys: String::new(),
        metadata_map: Default::default(),
        meta_key_mode: MetaKeyMode::Leaf,
    }
}

/// Embedder double: fixed-dimension vectors, counts embed calls.
pub struct CountingEmbedder {
    dim: usize,
    calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|_| vec![0.5; self.dim]).collect())
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

/// Row store double capturing every inserted row.
#[derive(Default)]
pub struct RecordingStore {
    rows: Mutex<Vec<OutputRow>>,
    tables: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn rows(&self) -> Vec<OutputRow> {
        self.rows.lock().clone()
    }

    pub fn tables(&self) -> Vec<String> {
        self.tables.lock().clone()
    }
}

#[async_trait]
impl RowStore for RecordingStore {
    async fn insert(&self, table: &str, rows: &[OutputRow]) -> Result<()> {
        self.tables.lock().push(table.to_string());
        self.rows.lock().extend_from_slice(rows);
        Ok(())
    }
}
