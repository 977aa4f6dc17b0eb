//! External encoder seam.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use fieldloom_core::{Error, Result};
use tokio::process::Command;

/// Produce one resized/cropped encode. Failure is opaque to callers beyond
/// the error message.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, input: &Path, output: &Path, width: u32, height: u32) -> Result<()>;
}

/// ffmpeg-backed transcoder: scale to fill the target box, then center-crop.
#[derive(Default)]
pub struct FfmpegTranscoder;

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path, width: u32, height: u32) -> Result<()> {
        let filter = format!(
            "scale={width}:{height}:force_original_aspect_ratio=increase,crop={width}:{height}"
        );

        let result = Command::new("ffmpeg")
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-vf", &filter])
            .args(["-c:v", "libx264"])
            .args(["-c:a", "aac"])
            .args(["-preset", "ultrafast"])
            .args(["-crf", "26"])
            .args(["-threads", "2"])
            .args(["-movflags", "+faststart"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Media(format!("failed to spawn ffmpeg: {e}")))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let tail: String = stderr
                .lines()
                .rev()
                .take(5)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(Error::Media(format!(
                "ffmpeg exited with {}: {tail}",
                result.status
            )));
        }
        Ok(())
    }
}
