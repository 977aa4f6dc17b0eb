//! Background format pipeline: download the source, encode one output per
//! named target, publish download links through the job store.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use fieldloom_core::{Error, Result};
use tracing::{error, info};

use crate::job::{FormatJob, JobStatus, JobStore};
use crate::transcode::Transcoder;

/// Everything the format pipeline needs, injected once at startup.
pub struct MediaContext {
    pub jobs: Arc<dyn JobStore>,
    pub transcoder: Arc<dyn Transcoder>,
    pub http: reqwest::Client,
    pub output_dir: PathBuf,
}

/// Delete previous encodes; each request starts from a clean output dir.
pub fn clear_old_outputs(dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let _ = std::fs::remove_file(entry.path());
    }
}

/// Parse a `width,height` target size.
fn parse_size(size: &str) -> Result<(u32, u32)> {
    let parts: Vec<&str> = size.split(',').map(str::trim).collect();
    if let [w, h] = parts.as_slice() {
        if let (Ok(width), Ok(height)) = (w.parse(), h.parse()) {
            return Ok((width, height));
        }
    }
    Err(Error::Media(format!(
        "Invalid size format '{size}'. Use 'width,height'"
    )))
}

/// Keep platform names filesystem-safe; they become output filenames.
fn sanitize_platform(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .take(64)
        .collect()
}

/// Run one format job to completion, recording every state change in the
/// job store. Never returns an error; failures end up on the job record.
pub async fn run_format_job(
    ctx: Arc<MediaContext>,
    base_url: String,
    job_id: String,
    video_url: String,
    targets: Vec<(String, String)>,
) {
    let source = ctx.output_dir.join(format!("{job_id}_source.mp4"));

    let outcome = async {
        download_source(&ctx, &video_url, &source).await?;
        encode_targets(&ctx, &base_url, &source, &targets).await
    }
    .await;

    let _ = std::fs::remove_file(&source);

    let mut job = ctx
        .jobs
        .get(&job_id)
        .unwrap_or_else(|| FormatJob::processing(job_id.clone()));
    match outcome {
        Ok(links) => {
            info!("[format {job_id}] done, {} encodes", links.len());
            job.status = JobStatus::Done;
            job.download_links = links;
        }
        Err(e) => {
            error!("[format {job_id}] failed: {e}");
            job.status = JobStatus::Error;
            job.error = Some(e.to_string());
        }
    }
    ctx.jobs.put(job);
}

async fn download_source(ctx: &MediaContext, video_url: &str, dest: &Path) -> Result<()> {
    let response = ctx
        .http
        .get(video_url)
        .timeout(Duration::from_secs(300))
        .send()
        .await
        .map_err(|e| Error::Media(format!("Failed to download video: {e}")))?
        .error_for_status()
        .map_err(|e| Error::Media(format!("Failed to download video: {e}")))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::Media(format!("Failed to download video: {e}")))?;
    std::fs::write(dest, &bytes)?;
    Ok(())
}

async fn encode_targets(
    ctx: &MediaContext,
    base_url: &str,
    source: &Path,
    targets: &[(String, String)],
) -> Result<Vec<std::collections::HashMap<String, String>>> {
    let mut links = Vec::new();

    for (platform, size) in targets {
        let (width, height) = parse_size(size)
            .map_err(|e| Error::Media(format!("{platform}: {e}")))?;

        let safe = sanitize_platform(platform);
        if safe.is_empty() {
            return Err(Error::Media(format!("Invalid platform name '{platform}'")));
        }
        let filename = format!("{safe}.mp4");
        let output = ctx.output_dir.join(&filename);

        ctx.transcoder
            .transcode(source, &output, width, height)
            .await?;

        let url = format!("{}/download/{}", base_url.trim_end_matches('/'), filename);
        links.push(std::collections::HashMap::from([(platform.clone(), url)]));
    }

    Ok(links)
}
