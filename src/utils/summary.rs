use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde_json::json;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::models::{RunReport, UploadStatus};

/// Create a JSON summary of a run.
///
/// # Example Output
///
/// ```json
/// {
///   "run_id": "550e8400-e29b-41d4-a716-446655440000",
///   "container": "data",
///   "root": "/mnt/weather",
///   "started_at": "2024-01-15T14:30:52Z",
///   "finished_at": "2024-01-15T14:31:07Z",
///   "days_completed": 2,
///   "uploaded": 41,
///   "failed": 1,
///   "total_bytes": 104857600,
///   "dry_run": false,
///   "files": [{"key": "2024/01/14/part-0.parquet", "bytes": 2048, "status": "uploaded"}, ...]
/// }
/// ```
pub fn create_run_summary(config: &UploadConfig, report: &RunReport, dry_run: bool) -> Result<String> {
    let files: Vec<_> = report
        .files
        .iter()
        .map(|outcome| match &outcome.status {
            UploadStatus::Uploaded => json!({
                "key": outcome.key,
                "bytes": outcome.bytes,
                "status": "uploaded",
            }),
            UploadStatus::Failed { reason } => json!({
                "key": outcome.key,
                "bytes": outcome.bytes,
                "status": "failed",
                "reason": reason,
            }),
        })
        .collect();

    let summary = json!({
        "run_id": Uuid::new_v4().to_string(),
        "uploader_version": env!("CARGO_PKG_VERSION"),
        "container": config.container,
        "root": config.root.display().to_string(),
        "suffix": config.suffix,
        "started_at": report.started_at.to_rfc3339(),
        "finished_at": report.finished_at.map(|t| t.to_rfc3339()),
        "days_completed": report.days_completed,
        "uploaded": report.uploaded_count(),
        "failed": report.failed_count(),
        "total_bytes": report.total_bytes(),
        "dry_run": dry_run,
        "files": files,
    });

    serde_json::to_string_pretty(&summary).context("Failed to serialize run summary to JSON")
}

/// Write the run summary to `path`.
pub fn write_run_summary(
    path: &Path,
    config: &UploadConfig,
    report: &RunReport,
    dry_run: bool,
) -> Result<()> {
    let summary = create_run_summary(config, report, dry_run)?;
    fs::write(path, summary).context(format!("Failed to write run summary to {}", path.display()))?;
    info!("Run summary written to {}", path.display());
    Ok(())
}
