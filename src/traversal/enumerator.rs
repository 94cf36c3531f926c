use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::LeafDirPolicy;
use crate::constants::DAY_DEPTH;
use crate::error::TransferError;
use crate::models::{CandidateFile, DayDirectory};

/// Enumerates `root/year/month/day/file` in lexicographic order at every level.
///
/// Directory levels are walked lazily: a month is only listed when the walk
/// reaches it, and a day's files are only listed when [`candidates`] is
/// called for that day. Entries that are not directories at the first three
/// levels are skipped without error.
///
/// [`candidates`]: PathEnumerator::candidates
pub struct PathEnumerator {
    root: PathBuf,
    suffix: String,
    leaf_policy: LeafDirPolicy,
}

impl PathEnumerator {
    /// Create an enumerator over `root`, which must be an existing directory.
    pub fn new(
        root: &Path,
        suffix: &str,
        leaf_policy: LeafDirPolicy,
    ) -> Result<Self, TransferError> {
        let metadata = fs::metadata(root).map_err(|e| TransferError::filesystem(root, e))?;
        if !metadata.is_dir() {
            return Err(TransferError::filesystem(
                root,
                std::io::Error::other("root is not a directory"),
            ));
        }

        Ok(PathEnumerator {
            root: root.to_path_buf(),
            suffix: suffix.to_string(),
            leaf_policy,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Day directories in year, month, day order.
    pub fn days(&self) -> DayDirs {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(DAY_DEPTH)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            // Stray files at the year/month/day levels are pruned here
            .filter_entry(is_directory as EntryFilter);

        DayDirs {
            root: self.root.clone(),
            walker,
        }
    }

    /// Files in `day` whose name ends with the configured suffix, sorted by name.
    ///
    /// Names are matched before anything is stat'ed, so entries that do not
    /// match are never touched. A matching entry whose target cannot be
    /// stat'ed is still returned; opening it fails later, per file.
    pub fn candidates(&self, day: &DayDirectory) -> Result<Vec<CandidateFile>, TransferError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&day.path).map_err(|e| TransferError::filesystem(&day.path, e))? {
            entries.push(entry.map_err(|e| TransferError::filesystem(&day.path, e))?);
        }
        entries.sort_by_key(|entry| entry.file_name());

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().into_owned();

            let is_dir = if file_name.ends_with(&self.suffix) {
                // Follows symlinks, like the day levels
                fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false)
            } else {
                entry.file_type().map(|t| t.is_dir()).unwrap_or(false)
            };

            if is_dir {
                match self.leaf_policy {
                    LeafDirPolicy::Ignore => {
                        debug!("Skipping directory at file level: {}", path.display())
                    }
                    LeafDirPolicy::Warn => {
                        warn!("Skipping directory at file level: {}", path.display())
                    }
                    LeafDirPolicy::Reject => {
                        return Err(TransferError::UnexpectedDirectory { path });
                    }
                }
                continue;
            }

            if !file_name.ends_with(&self.suffix) {
                debug!("Skipping non-matching file: {}", path.display());
                continue;
            }

            files.push(CandidateFile {
                year: day.year.clone(),
                month: day.month.clone(),
                day: day.day.clone(),
                file_name,
                path,
            });
        }

        Ok(files)
    }

    /// Every candidate file under the root as one lazy sequence.
    ///
    /// Days are listed one at a time as the sequence advances. The first
    /// error is yielded and ends the sequence.
    pub fn files(&self) -> impl Iterator<Item = Result<CandidateFile, TransferError>> + '_ {
        let mut failed = false;
        self.days()
            .flat_map(move |day| {
                let batch: Vec<Result<CandidateFile, TransferError>> =
                    match day.and_then(|day| self.candidates(&day)) {
                        Ok(files) => files.into_iter().map(Ok).collect(),
                        Err(e) => vec![Err(e)],
                    };
                batch
            })
            .take_while(move |item| {
                if failed {
                    return false;
                }
                failed = item.is_err();
                true
            })
    }
}

type EntryFilter = fn(&walkdir::DirEntry) -> bool;

fn is_directory(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
}

/// Lazy iterator over the day directories below a root.
pub struct DayDirs {
    root: PathBuf,
    walker: walkdir::FilterEntry<walkdir::IntoIter, EntryFilter>,
}

impl Iterator for DayDirs {
    type Item = Result<DayDirectory, TransferError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) if is_dangling_link(&e) => {
                    if let Some(path) = e.path() {
                        debug!("Skipping dangling link: {}", path.display());
                    }
                    continue;
                }
                Err(e) => return Some(Err(TransferError::from_walk(&self.root, e))),
            };

            if entry.depth() != DAY_DEPTH {
                continue;
            }

            return Some(day_from_entry(&self.root, entry.into_path()));
        }
    }
}

// A link whose target is gone is not a directory, so it is pruned like any stray file
fn is_dangling_link(err: &walkdir::Error) -> bool {
    match err.path() {
        Some(path) => {
            fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
                && fs::metadata(path).is_err()
        }
        None => false,
    }
}

fn day_from_entry(root: &Path, path: PathBuf) -> Result<DayDirectory, TransferError> {
    let relative = path.strip_prefix(root).map_err(|_| {
        TransferError::InvariantViolation(format!(
            "{} is not under root {}",
            path.display(),
            root.display()
        ))
    })?;

    let names: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    match names.as_slice() {
        [year, month, day] => Ok(DayDirectory {
            year: year.clone(),
            month: month.clone(),
            day: day.clone(),
            path,
        }),
        _ => Err(TransferError::InvariantViolation(format!(
            "{} is not at day depth",
            path.display()
        ))),
    }
}
