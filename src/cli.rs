use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{FailurePolicy, LeafDirPolicy, UploadConfig};
use crate::constants::DEFAULT_CONFIG_FILE;

/// Command-line arguments for daybatch-uploader.
///
/// Every option that also exists in the YAML configuration overrides the
/// file value when given.
#[derive(Parser, Debug)]
#[clap(
    name = "daybatch-uploader",
    about = "Upload year/month/day partitioned files to Azure Blob Storage, one day at a time"
)]
pub struct Args {
    /// Local root directory holding year/month/day folders
    #[clap(short, long)]
    pub root: Option<PathBuf>,

    /// Target container name (default: data)
    #[clap(long)]
    pub container: Option<String>,

    /// Seconds to pause after each completed day (default: 3)
    #[clap(short, long)]
    pub delay: Option<u64>,

    /// Only upload files whose name ends with this suffix (default: .parquet)
    #[clap(short, long)]
    pub suffix: Option<String>,

    /// Path to YAML configuration file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Environment variable holding the storage connection string
    #[clap(long)]
    pub credential_env: Option<String>,

    /// What to do when a single file fails to upload
    #[clap(long, value_enum)]
    pub on_error: Option<FailurePolicy>,

    /// How directories found next to the day's files are treated
    #[clap(long = "leaf-dirs", value_enum)]
    pub leaf_dirs: Option<LeafDirPolicy>,

    /// Read every file but upload nothing; no credential is required
    #[clap(long)]
    pub dry_run: bool,

    /// Write a JSON summary of the run to this file
    #[clap(long)]
    pub summary: Option<PathBuf>,

    /// Verbose output
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a default configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

impl Args {
    /// Apply the options given on the command line on top of `config`.
    pub fn apply_overrides(&self, config: &mut UploadConfig) {
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(container) = &self.container {
            config.container = container.clone();
        }
        if let Some(delay) = self.delay {
            config.delay_secs = delay;
        }
        if let Some(suffix) = &self.suffix {
            config.suffix = suffix.clone();
        }
        if let Some(var) = &self.credential_env {
            config.credential_env = var.clone();
        }
        if let Some(policy) = self.on_error {
            config.on_error = policy;
        }
        if let Some(policy) = self.leaf_dirs {
            config.leaf_directories = policy;
        }
    }
}
