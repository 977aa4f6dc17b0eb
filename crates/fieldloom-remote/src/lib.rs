//! Remote collaborators: JSON source fetch, embedding provider, row store.
//!
//! The pipeline depends on the [`Embedder`] and [`RowStore`] traits only;
//! the OpenAI and Supabase REST implementations here are the production
//! backends. Both retry transient failures with capped exponential backoff
//! and degrade rather than abort (zero-vectors / dropped sub-batches).

pub mod embed;
pub mod fetch;
pub mod store;

use async_trait::async_trait;
use fieldloom_core::{OutputRow, Result};

/// Batch text → vector collaborator. Output is the same length and order as
/// the input.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Known dimensionality, used for alignment-preserving zero vectors.
    fn dimension(&self) -> usize;
}

/// Batched row insert collaborator.
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn insert(&self, table: &str, rows: &[OutputRow]) -> Result<()>;
}

pub use embed::OpenAiEmbedder;
pub use fetch::fetch_json;
pub use store::SupabaseRowStore;
