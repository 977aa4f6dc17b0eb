//! Generic retry with capped exponential backoff.
//!
//! Both remote collaborators (embedding provider, row store) retry transient
//! failures the same way; the loop lives here once instead of being
//! duplicated at each call site.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Backoff schedule: `initial` delay doubling up to `cap`, at most
/// `max_retries` retries after the first attempt.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub initial: Duration,
    pub cap: Duration,
    pub max_retries: u32,
}

impl Backoff {
    pub const fn new(initial: Duration, cap: Duration, max_retries: u32) -> Self {
        Self {
            initial,
            cap,
            max_retries,
        }
    }
}

/// Run `op` until it succeeds or the retry budget is exhausted.
///
/// `label` names the collaborator in retry logs. Returns the last error once
/// the budget runs out; the caller decides how to degrade.
pub async fn retry_with_backoff<T, E, F, Fut>(
    label: &str,
    backoff: Backoff,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut delay = backoff.initial;
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= backoff.max_retries {
                    return Err(err);
                }
                attempt += 1;
                warn!("[{} retry {}] {}", label, attempt, err);
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(backoff.cap);
            }
        }
    }
}
