//! Utility functions for reporting on a run.
//!
//! ### Writing a Run Summary
//!
//! ```no_run
//! use daybatch_uploader::config::UploadConfig;
//! use daybatch_uploader::models::RunReport;
//! use daybatch_uploader::utils::summary::write_run_summary;
//! use std::path::Path;
//!
//! # fn example(config: &UploadConfig, report: &RunReport) -> anyhow::Result<()> {
//! write_run_summary(Path::new("/tmp/run-summary.json"), config, report, false)?;
//! # Ok(())
//! # }
//! ```

/// Run summary generation and reporting
pub mod summary;
