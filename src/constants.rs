//! Global constants for daybatch-uploader.
//!
//! Defaults for every configurable value live here so the config layer,
//! the CLI and the tests agree on them.

// Configuration defaults
/// Container used when neither the config file nor the CLI names one
pub const DEFAULT_CONTAINER: &str = "data";

/// Seconds slept after each completed day directory
pub const DEFAULT_DELAY_SECS: u64 = 3;

/// Only leaf files with this suffix are uploaded
pub const DEFAULT_FILE_SUFFIX: &str = ".parquet";

/// Environment variable holding the storage connection string
pub const DEFAULT_CREDENTIAL_ENV: &str = "AZURE_STORAGE_CONNECTION_STRING";

/// File name written by `init-config` when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "uploader.yaml";

// Hierarchy shape
/// Depth of the day directories below the root (year/month/day)
pub const DAY_DEPTH: usize = 3;

// Cloud storage constants
/// In-memory buffer per upload before switching to multipart (10MB)
pub const UPLOAD_BUFFER_CAPACITY: usize = 10 * 1024 * 1024;

/// Blob endpoint suffix used when the connection string names none
pub const AZURE_DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";
