//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use fieldloom_media::{FfmpegTranscoder, MediaContext, MemoryJobStore};

use crate::logbuf::LogBuffer;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// One HTTP client for every outbound call (source fetch, collaborators,
    /// video download).
    pub http: reqwest::Client,
    pub media: Arc<MediaContext>,
    pub logs: LogBuffer,
}

impl AppState {
    pub fn new(logs: LogBuffer, output_dir: PathBuf) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        let media = Arc::new(MediaContext {
            jobs: Arc::new(MemoryJobStore::default()),
            transcoder: Arc::new(FfmpegTranscoder),
            http: http.clone(),
            output_dir,
        });

        Self { http, media, logs }
    }
}
