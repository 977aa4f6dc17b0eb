//! Supabase-style REST row store client.

use std::time::Duration;

use async_trait::async_trait;
use fieldloom_core::retry::{retry_with_backoff, Backoff};
use fieldloom_core::{Error, OutputRow, Result, StoreTarget};
use tracing::error;

use crate::RowStore;

/// Rows per REST insert call.
pub const STORE_BATCH_SIZE: usize = 100;

const BACKOFF: Backoff = Backoff::new(Duration::from_secs(3), Duration::from_secs(20), 5);

pub struct SupabaseRowStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseRowStore {
    pub fn new(client: reqwest::Client, target: &StoreTarget) -> Self {
        Self {
            client,
            base_url: target.supabase_url.trim_end_matches('/').to_string(),
            api_key: target.supabase_key.clone(),
        }
    }

    async fn post_batch(&self, table: &str, rows: &[OutputRow]) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .timeout(Duration::from_secs(30))
            .json(rows)
            .send()
            .await
            .map_err(|e| Error::RowStore(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(500).collect();
        Err(Error::RowStore(format!("{status}: {snippet}")))
    }
}

#[async_trait]
impl RowStore for SupabaseRowStore {
    /// Insert `rows` in sub-batches. A sub-batch is retried atomically; if
    /// its budget is exhausted it is dropped with an error log, since a
    /// partial insert beats failing the whole run.
    async fn insert(&self, table: &str, rows: &[OutputRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        for batch in rows.chunks(STORE_BATCH_SIZE) {
            if let Err(e) =
                retry_with_backoff("supabase", BACKOFF, || self.post_batch(table, batch)).await
            {
                error!(
                    "[supabase] gave up after {} retries, dropping batch of {}: {}",
                    BACKOFF.max_retries,
                    batch.len(),
                    e
                );
            }
        }

        Ok(())
    }
}
