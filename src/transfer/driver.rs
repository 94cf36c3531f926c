use log::{debug, error, info, warn};
use tokio::fs::File;

use crate::cloud::azure;
use crate::cloud::sink::UploadSink;
use crate::config::{FailurePolicy, UploadConfig};
use crate::error::TransferError;
use crate::models::{CandidateFile, RunReport};
use crate::traversal::{to_storage_key, PathEnumerator};

/// Bind the storage container from the configured credential and run the upload.
///
/// The credential is resolved before the tree is touched, so a missing or
/// malformed connection string fails the run without listing anything.
pub async fn run(config: &UploadConfig) -> Result<RunReport, TransferError> {
    config.validate()?;
    let sink = azure::connect_from_env(&config.container, &config.credential_env)?;
    run_with_sink(config, &sink).await
}

/// Upload every candidate file under the configured root through `sink`.
///
/// Files are sent with overwrite enabled, so repeating a run against an
/// unchanged tree leaves the container in the same state. Under
/// [`FailurePolicy::Abort`] the first failing file ends the run with its
/// error; under [`FailurePolicy::Continue`] it is recorded in the report.
pub async fn run_with_sink(
    config: &UploadConfig,
    sink: &dyn UploadSink,
) -> Result<RunReport, TransferError> {
    config.validate()?;

    let enumerator = PathEnumerator::new(&config.root, &config.suffix, config.leaf_directories)?;
    let delay = config.delay();
    let mut report = RunReport::start();

    for day in enumerator.days() {
        let day = day?;
        info!("Uploading data for: {}", day.path.display());

        for file in enumerator.candidates(&day)? {
            upload_file(&enumerator, sink, &file, config.on_error, &mut report).await?;
        }

        info!("Finished {}", day.path.display());
        report.days_completed += 1;

        if !delay.is_zero() {
            debug!("Sleeping {:?} before the next day", delay);
            tokio::time::sleep(delay).await;
        }
    }

    report.finish();

    if report.is_success() {
        info!("All files successfully uploaded day by day");
    } else {
        warn!(
            "Upload finished with {} of {} files failed",
            report.failed_count(),
            report.files.len()
        );
    }

    Ok(report)
}

async fn upload_file(
    enumerator: &PathEnumerator,
    sink: &dyn UploadSink,
    file: &CandidateFile,
    policy: FailurePolicy,
    report: &mut RunReport,
) -> Result<(), TransferError> {
    let key = to_storage_key(enumerator.root(), &file.path)?;
    info!("  → {}", key);

    let attempt = async {
        let handle = File::open(&file.path)
            .await
            .map_err(|e| TransferError::filesystem(&file.path, e))?;
        let bytes = sink.upload(&key, Box::new(handle), true).await?;
        Ok::<u64, TransferError>(bytes)
    };

    match attempt.await {
        Ok(bytes) => {
            report.record_uploaded(key, bytes);
            Ok(())
        }
        Err(e) if policy == FailurePolicy::Continue && e.is_per_file() => {
            error!("Failed to upload {}: {}", key, e);
            report.record_failed(key, e.to_string());
            Ok(())
        }
        Err(e) => Err(e),
    }
}
