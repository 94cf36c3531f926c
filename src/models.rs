use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Object key inside a container: the `/`-separated path relative to the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub(crate) fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("/");
        StorageKey(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A directory at depth three (year/month/day) below the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDirectory {
    pub year: String,
    pub month: String,
    pub day: String,
    pub path: PathBuf,
}

/// A leaf file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub year: String,
    pub month: String,
    pub day: String,
    pub file_name: String,
    pub path: PathBuf,
}

/// Result of one upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadStatus {
    Uploaded,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub key: StorageKey,
    pub bytes: u64,
    #[serde(flatten)]
    pub status: UploadStatus,
}

/// Per-file results of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub days_completed: usize,
    pub files: Vec<FileOutcome>,
}

impl RunReport {
    pub fn start() -> Self {
        RunReport {
            started_at: Utc::now(),
            finished_at: None,
            days_completed: 0,
            files: Vec::new(),
        }
    }

    pub(crate) fn record_uploaded(&mut self, key: StorageKey, bytes: u64) {
        self.files.push(FileOutcome {
            key,
            bytes,
            status: UploadStatus::Uploaded,
        });
    }

    pub(crate) fn record_failed(&mut self, key: StorageKey, reason: String) {
        self.files.push(FileOutcome {
            key,
            bytes: 0,
            status: UploadStatus::Failed { reason },
        });
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn uploaded_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == UploadStatus::Uploaded)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.len() - self.uploaded_count()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }
}
