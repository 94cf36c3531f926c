//! Security utilities.
//!
//! - Credential scrubbing so connection-string secrets and SAS signatures
//!   never reach the console

pub mod credential_scrubber;

pub use credential_scrubber::{safe_error_message, scrub_credentials};
