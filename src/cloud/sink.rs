use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use object_store::buffered::BufWriter;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::constants::UPLOAD_BUFFER_CAPACITY;
use crate::error::UploadError;
use crate::models::StorageKey;

/// Byte stream handed to a sink. The sink owns it, so the underlying file
/// handle is released when the upload call returns, whatever the outcome.
pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// Destination for uploaded files, bound to a single container.
#[async_trait]
pub trait UploadSink: Send + Sync {
    /// Name of the container every upload lands in
    fn container(&self) -> &str;

    /// Write `data` to `key`, returning the number of bytes stored.
    ///
    /// With `overwrite` set, an existing object at `key` is replaced.
    /// Without it, an existing object is an [`UploadError::AlreadyExists`].
    async fn upload(
        &self,
        key: &StorageKey,
        data: BoxedReader,
        overwrite: bool,
    ) -> Result<u64, UploadError>;
}

/// Upload sink backed by an `object_store` implementation.
///
/// Streams are pushed through a buffered writer: small objects go out as a
/// single put, larger ones as a multipart upload, so no file is ever held
/// in memory in full.
#[derive(Debug)]
pub struct ObjectStoreSink {
    container: String,
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreSink {
    pub fn new(container: &str, store: Arc<dyn ObjectStore>) -> Self {
        ObjectStoreSink {
            container: container.to_string(),
            store,
        }
    }

    fn transfer_error(&self, key: &StorageKey, source: std::io::Error) -> UploadError {
        UploadError::Transfer {
            container: self.container.clone(),
            key: key.to_string(),
            source,
        }
    }

    async fn ensure_absent(&self, key: &StorageKey, location: &ObjectPath) -> Result<(), UploadError> {
        match self.store.head(location).await {
            Ok(_) => Err(UploadError::AlreadyExists {
                container: self.container.clone(),
                key: key.to_string(),
            }),
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(source) => Err(UploadError::Backend {
                container: self.container.clone(),
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[async_trait]
impl UploadSink for ObjectStoreSink {
    fn container(&self) -> &str {
        &self.container
    }

    async fn upload(
        &self,
        key: &StorageKey,
        mut data: BoxedReader,
        overwrite: bool,
    ) -> Result<u64, UploadError> {
        // parse keeps the key verbatim; from() would percent-encode each segment
        let location = ObjectPath::parse(key.as_str()).map_err(|e| UploadError::Backend {
            container: self.container.clone(),
            key: key.to_string(),
            source: e.into(),
        })?;

        if !overwrite {
            self.ensure_absent(key, &location).await?;
        }

        let mut writer =
            BufWriter::with_capacity(Arc::clone(&self.store), location, UPLOAD_BUFFER_CAPACITY);

        let copied = match tokio::io::copy(&mut data, &mut writer).await {
            Ok(copied) => copied,
            Err(e) => {
                // Drop any multipart upload already started for this key
                if let Err(abort_err) = writer.abort().await {
                    warn!("Failed to abort upload of {}: {}", key, abort_err);
                }
                return Err(self.transfer_error(key, e));
            }
        };

        writer
            .shutdown()
            .await
            .map_err(|e| self.transfer_error(key, e))?;

        debug!(
            "Uploaded {} bytes to {}/{}",
            copied, self.container, key
        );
        Ok(copied)
    }
}

/// Sink that reads every stream to the end and uploads nothing.
#[derive(Debug)]
pub struct DryRunSink {
    container: String,
}

impl DryRunSink {
    pub fn new(container: &str) -> Self {
        DryRunSink {
            container: container.to_string(),
        }
    }
}

#[async_trait]
impl UploadSink for DryRunSink {
    fn container(&self) -> &str {
        &self.container
    }

    async fn upload(
        &self,
        key: &StorageKey,
        mut data: BoxedReader,
        _overwrite: bool,
    ) -> Result<u64, UploadError> {
        let bytes = tokio::io::copy(&mut data, &mut tokio::io::sink())
            .await
            .map_err(|source| UploadError::Transfer {
                container: self.container.clone(),
                key: key.to_string(),
                source,
            })?;

        info!("[dry-run] would upload {} bytes to {}/{}", bytes, self.container, key);
        Ok(bytes)
    }
}
