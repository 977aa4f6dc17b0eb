//! Remote JSON source fetch.

use std::time::Duration;

use fieldloom_core::{Error, Result};

/// Download the JSON payload from `url`.
///
/// Any network or HTTP failure is a single fatal error for the run; the body
/// is decoded using the server-declared encoding with a UTF-8 fallback.
pub async fn fetch_json(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .timeout(Duration::from_secs(60))
        .send()
        .await
        .map_err(|e| Error::Fetch(format!("Failed to download file: {e}")))?
        .error_for_status()
        .map_err(|e| Error::Fetch(format!("Failed to download file: {e}")))?;

    response
        .text()
        .await
        .map_err(|e| Error::Fetch(format!("Failed to decode file: {e}")))
}
