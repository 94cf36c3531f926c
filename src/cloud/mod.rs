//! Cloud storage integration for day-by-day uploads.
//!
//! The driver only talks to the [`sink::UploadSink`] trait. The production
//! implementation streams files into Azure Blob Storage through
//! `object_store`; a dry-run sink reads files without uploading them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │ Throttled driver│────▶│   UploadSink    │────▶│ ObjectStoreSink │
//! └─────────────────┘     └────────┬────────┘     └────────┬────────┘
//!                                  │                       │
//!                          ┌───────▼────────┐     ┌────────▼────────┐
//!                          │  DryRunSink    │     │ Azure container │
//!                          └────────────────┘     └─────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use daybatch_uploader::cloud::azure::connect_from_env;
//! use daybatch_uploader::cloud::sink::UploadSink;
//!
//! # fn example() -> anyhow::Result<()> {
//! let sink = connect_from_env("data", "AZURE_STORAGE_CONNECTION_STRING")?;
//! println!("Uploading into {}", sink.container());
//! # Ok(())
//! # }
//! ```

/// Azure Blob Storage binding built from a connection string
pub mod azure;

/// Azure Storage connection string parsing
pub mod connection_string;

/// Upload sink trait and its implementations
pub mod sink;
