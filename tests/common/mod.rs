//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use daybatch_uploader::cloud::sink::{BoxedReader, UploadSink};
use daybatch_uploader::error::UploadError;
use daybatch_uploader::models::StorageKey;

/// Creates each relative path under `root`; file content is the path itself
pub fn create_day_tree(root: &Path, files: &[&str]) {
    for relative in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, relative.as_bytes()).unwrap();
    }
}

/// Fake container: records `(key, overwrite)` per call and keeps the last content per key
#[derive(Default)]
pub struct FakeContainer {
    pub fail_on_call: Option<usize>,
    calls: Mutex<Vec<(String, bool)>>,
    objects: Mutex<std::collections::BTreeMap<String, Vec<u8>>>,
}

impl FakeContainer {
    pub fn failing_on(call: usize) -> Self {
        FakeContainer {
            fail_on_call: Some(call),
            ..FakeContainer::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.calls().into_iter().map(|(key, _)| key).collect()
    }

    pub fn objects(&self) -> std::collections::BTreeMap<String, Vec<u8>> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadSink for FakeContainer {
    fn container(&self) -> &str {
        "data"
    }

    async fn upload(
        &self,
        key: &StorageKey,
        mut data: BoxedReader,
        overwrite: bool,
    ) -> Result<u64, UploadError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((key.to_string(), overwrite));
            calls.len()
        };

        if self.fail_on_call == Some(call) {
            return Err(UploadError::Transfer {
                container: "data".to_string(),
                key: key.to_string(),
                source: std::io::Error::other("connection reset by peer"),
            });
        }

        let mut content = Vec::new();
        data.read_to_end(&mut content)
            .await
            .map_err(|source| UploadError::Transfer {
                container: "data".to_string(),
                key: key.to_string(),
                source,
            })?;

        let mut objects = self.objects.lock().unwrap();
        if !overwrite && objects.contains_key(key.as_str()) {
            return Err(UploadError::AlreadyExists {
                container: "data".to_string(),
                key: key.to_string(),
            });
        }
        let bytes = content.len() as u64;
        objects.insert(key.to_string(), content);
        Ok(bytes)
    }
}
