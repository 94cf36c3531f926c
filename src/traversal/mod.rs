//! Local traversal of the `root/year/month/day/file` hierarchy.
//!
//! - [`enumerator`]: lazy, sorted enumeration of day directories and their files
//! - [`key_mapper`]: conversion of local paths into object keys

pub mod enumerator;
pub mod key_mapper;

pub use enumerator::{DayDirs, PathEnumerator};
pub use key_mapper::to_storage_key;
