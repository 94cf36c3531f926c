//! Test utilities for daybatch-uploader
//!
//! Fixture builders for day trees and a recording upload sink shared by the
//! unit tests.

#![cfg(test)]

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use crate::cloud::sink::{BoxedReader, UploadSink};
use crate::error::UploadError;
use crate::models::StorageKey;

/// Creates an empty file, including its parent directories
pub fn touch(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, b"")?;
    Ok(())
}

/// Creates each relative path under `root`; file content is the path itself
pub fn create_day_tree(root: &Path, files: &[&str]) -> Result<()> {
    for relative in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, relative.as_bytes())?;
    }
    Ok(())
}

/// One call observed by [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub key: String,
    pub overwrite: bool,
    pub content: Vec<u8>,
}

/// Upload sink that keeps every call in memory and can fail on the n-th call
pub struct RecordingSink {
    container: String,
    fail_on_call: Option<usize>,
    calls: Mutex<Vec<RecordedUpload>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink {
            container: "test-container".to_string(),
            fail_on_call: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail the given call, counting from 1
    pub fn failing_on(call: usize) -> Self {
        RecordingSink {
            fail_on_call: Some(call),
            ..RecordingSink::new()
        }
    }

    pub fn calls(&self) -> Vec<RecordedUpload> {
        self.calls.lock().unwrap().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.key).collect()
    }
}

#[async_trait]
impl UploadSink for RecordingSink {
    fn container(&self) -> &str {
        &self.container
    }

    async fn upload(
        &self,
        key: &StorageKey,
        mut data: BoxedReader,
        overwrite: bool,
    ) -> Result<u64, UploadError> {
        let mut content = Vec::new();
        data.read_to_end(&mut content)
            .await
            .map_err(|source| UploadError::Transfer {
                container: self.container.clone(),
                key: key.to_string(),
                source,
            })?;

        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedUpload {
                key: key.to_string(),
                overwrite,
                content: content.clone(),
            });
            calls.len()
        };

        if self.fail_on_call == Some(call_number) {
            return Err(UploadError::Transfer {
                container: self.container.clone(),
                key: key.to_string(),
                source: std::io::Error::other("injected failure"),
            });
        }

        Ok(content.len() as u64)
    }
}
