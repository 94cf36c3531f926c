//! # daybatch-uploader
//!
//! Uploads a `root/year/month/day/file` tree into an Azure Blob Storage
//! container, one day directory at a time.
//!
//! ## Overview
//!
//! Day directories are visited in lexicographic order. Every file in a day
//! whose name ends with the configured suffix (`.parquet` by default) is
//! uploaded under its path relative to the root, joined with `/`. After
//! each day the run pauses for a fixed delay, which throttles the rate at
//! which new partitions appear in the container.
//!
//! ## Usage
//!
//! ### Uploading with a fake sink
//!
//! ```no_run
//! use daybatch_uploader::cloud::sink::DryRunSink;
//! use daybatch_uploader::config::UploadConfig;
//! use daybatch_uploader::transfer::run_with_sink;
//! use std::path::PathBuf;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = UploadConfig {
//!     root: PathBuf::from("/mnt/weather"),
//!     delay_secs: 0,
//!     ..UploadConfig::default()
//! };
//!
//! let report = run_with_sink(&config, &DryRunSink::new(&config.container)).await?;
//! println!("{} files over {} days", report.uploaded_count(), report.days_completed);
//! # Ok(())
//! # }
//! ```
//!
//! ### Uploading to Azure
//!
//! ```no_run
//! use daybatch_uploader::config::load_config;
//! use daybatch_uploader::transfer::run;
//!
//! # async fn example() -> anyhow::Result<()> {
//! // Reads AZURE_STORAGE_CONNECTION_STRING unless the config names another variable
//! let config = load_config(Some(std::path::Path::new("uploader.yaml")))?;
//! let report = run(&config).await?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`config`]: YAML configuration and failure policies
//! - [`traversal`]: Day directory enumeration and key mapping
//! - [`cloud`]: Upload sinks and the Azure binding
//! - [`transfer`]: The throttled upload loop
//! - [`security`]: Credential scrubbing for printed errors
//! - [`utils`]: Run summary output
//! - [`constants`]: Application-wide defaults

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models and structures used throughout the application
pub mod models;

/// Typed errors for a run
pub mod error;

/// Day directory enumeration and storage key mapping
pub mod traversal;

/// Cloud storage integration (Azure Blob Storage)
pub mod cloud;

/// Sequential day-by-day upload driver
pub mod transfer;

/// Configuration management
pub mod config;

/// Run summary reporting
pub mod utils;

/// Application constants and configuration values
pub mod constants;

/// Security utilities for credential protection
pub mod security;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
