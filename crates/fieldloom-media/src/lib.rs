//! Video format pipeline: per-platform resize/crop encodes as background
//! jobs with status lookup by id.

pub mod job;
pub mod pipeline;
pub mod transcode;

pub use job::{FormatJob, JobStatus, JobStore, MemoryJobStore};
pub use pipeline::{clear_old_outputs, run_format_job, MediaContext};
pub use transcode::{FfmpegTranscoder, Transcoder};
