use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTAINER, DEFAULT_CREDENTIAL_ENV, DEFAULT_DELAY_SECS, DEFAULT_FILE_SUFFIX,
};
use crate::error::TransferError;

/// What the driver does when a single file fails to open or upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run at the first failing file
    #[default]
    Abort,
    /// Record the failure and keep going
    Continue,
}

/// How directories found among the leaf files are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LeafDirPolicy {
    /// Skip silently
    #[default]
    Ignore,
    /// Skip and log a warning
    Warn,
    /// Fail the run
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub container: String,
    pub root: PathBuf,
    pub delay_secs: u64,
    pub suffix: String,
    pub credential_env: String,
    pub on_error: FailurePolicy,
    pub leaf_directories: LeafDirPolicy,
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            container: DEFAULT_CONTAINER.to_string(),
            root: PathBuf::new(),
            delay_secs: DEFAULT_DELAY_SECS,
            suffix: DEFAULT_FILE_SUFFIX.to_string(),
            credential_env: DEFAULT_CREDENTIAL_ENV.to_string(),
            on_error: FailurePolicy::default(),
            leaf_directories: LeafDirPolicy::default(),
        }
    }
}

impl UploadConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: UploadConfig =
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml).context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Create a default configuration YAML file
    pub fn create_default_config_file(path: &Path) -> Result<()> {
        UploadConfig::default().save_to_yaml_file(path)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    /// Reject configurations a run cannot start with.
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.root.as_os_str().is_empty() {
            return Err(TransferError::Configuration(
                "root directory is not configured".to_string(),
            ));
        }
        if self.container.trim().is_empty() {
            return Err(TransferError::Configuration(
                "container name must not be empty".to_string(),
            ));
        }
        if self.suffix.is_empty() {
            return Err(TransferError::Configuration(
                "file suffix must not be empty".to_string(),
            ));
        }
        if self.credential_env.trim().is_empty() {
            return Err(TransferError::Configuration(
                "credential environment variable name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a configuration file, or fall back to the defaults when no path is given.
pub fn load_config(config_path: Option<&Path>) -> Result<UploadConfig> {
    match config_path {
        Some(path) => UploadConfig::from_yaml_file(path),
        None => {
            debug!("No config path provided, using defaults");
            Ok(UploadConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_constants() {
        let config = UploadConfig::default();
        assert_eq!(config.container, "data");
        assert_eq!(config.delay_secs, 3);
        assert_eq!(config.delay(), Duration::from_secs(3));
        assert_eq!(config.suffix, ".parquet");
        assert_eq!(config.credential_env, "AZURE_STORAGE_CONNECTION_STRING");
        assert_eq!(config.on_error, FailurePolicy::Abort);
        assert_eq!(config.leaf_directories, LeafDirPolicy::Ignore);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "root: /mnt/weather\non_error: continue\n";
        let config: UploadConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.root, PathBuf::from("/mnt/weather"));
        assert_eq!(config.on_error, FailurePolicy::Continue);
        assert_eq!(config.container, "data");
        assert_eq!(config.suffix, ".parquet");
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let yaml = "root: /mnt/weather\nleaf_directories: explode\n";
        assert!(serde_yaml::from_str::<UploadConfig>(yaml).is_err());
    }

    #[test]
    fn test_save_and_load_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("uploader.yaml");

        let config = UploadConfig {
            root: PathBuf::from("/srv/data"),
            leaf_directories: LeafDirPolicy::Warn,
            ..UploadConfig::default()
        };
        config.save_to_yaml_file(&path)?;

        let loaded = load_config(Some(&path))?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config(Some(Path::new("/non/existent/uploader.yaml"))).is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = UploadConfig::default();
        assert!(matches!(
            config.validate(),
            Err(TransferError::Configuration(_))
        ));

        config.root = PathBuf::from("/srv/data");
        assert!(config.validate().is_ok());

        config.container = "  ".to_string();
        assert!(config.validate().is_err());

        config.container = "data".to_string();
        config.suffix = String::new();
        assert!(config.validate().is_err());
    }
}
