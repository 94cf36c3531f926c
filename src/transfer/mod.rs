//! The throttled upload loop.
//!
//! Days are processed strictly one after another, files within a day one
//! at a time, with a fixed pause after each completed day.

pub mod driver;

pub use driver::{run, run_with_sink};
