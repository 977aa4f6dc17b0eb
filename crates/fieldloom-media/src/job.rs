//! Format job records and the job store seam.
//!
//! Jobs are looked up by id from HTTP handlers while a background task
//! mutates them, so the store is an explicit injected abstraction instead of
//! a process-wide map; the in-memory implementation is the default backing.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Done,
    Error,
}

/// One video format job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatJob {
    pub id: String,
    pub status: JobStatus,
    /// One `{platform: download_url}` entry per finished encode.
    pub download_links: Vec<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FormatJob {
    pub fn processing(id: String) -> Self {
        Self {
            id,
            status: JobStatus::Processing,
            download_links: Vec::new(),
            error: None,
        }
    }
}

/// Storage seam for job state.
pub trait JobStore: Send + Sync {
    fn put(&self, job: FormatJob);
    fn get(&self, id: &str) -> Option<FormatJob>;
    fn list(&self) -> Vec<FormatJob>;
}

/// In-memory job store behind a lock.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<String, FormatJob>>,
}

impl JobStore for MemoryJobStore {
    fn put(&self, job: FormatJob) {
        self.jobs.write().insert(job.id.clone(), job);
    }

    fn get(&self, id: &str) -> Option<FormatJob> {
        self.jobs.read().get(id).cloned()
    }

    fn list(&self) -> Vec<FormatJob> {
        self.jobs.read().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_roundtrip_and_overwrite() {
        let store = MemoryJobStore::default();
        let id = "job-1".to_string();
        store.put(FormatJob::processing(id.clone()));
        assert_eq!(store.get(&id).unwrap().status, JobStatus::Processing);

        let mut done = store.get(&id).unwrap();
        done.status = JobStatus::Done;
        store.put(done);
        assert_eq!(store.get(&id).unwrap().status, JobStatus::Done);
        assert!(store.get("missing").is_none());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn error_field_skipped_when_absent() {
        let job = FormatJob::processing("j".into());
        let json = serde_json::to_value(&job).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["status"], "processing");
    }
}
