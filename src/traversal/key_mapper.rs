use std::path::{Component, Path};

use crate::error::TransferError;
use crate::models::StorageKey;

/// Map a local file to its object key: the path relative to `root`, joined with `/`.
///
/// The key is built from path components, so it is the same on every host
/// regardless of the native separator. A file that is not strictly below
/// `root` means the caller handed in a path the enumerator never produced,
/// and is reported as an invariant violation.
pub fn to_storage_key(root: &Path, file: &Path) -> Result<StorageKey, TransferError> {
    let relative = file.strip_prefix(root).map_err(|_| {
        TransferError::InvariantViolation(format!(
            "{} is not under root {}",
            file.display(),
            root.display()
        ))
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(TransferError::InvariantViolation(format!(
                    "{} escapes root {}",
                    file.display(),
                    root.display()
                )))
            }
        }
    }

    if segments.is_empty() {
        return Err(TransferError::InvariantViolation(format!(
            "{} is the root itself, not a file below it",
            file.display()
        )));
    }

    Ok(StorageKey::from_segments(segments))
}
