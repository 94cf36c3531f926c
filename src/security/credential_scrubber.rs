//! Credential scrubbing for storage errors and log lines.
//!
//! Storage client errors can echo request URLs carrying SAS signatures, and
//! configuration errors can quote parts of a connection string. Everything
//! printed at the binary edge goes through [`scrub_credentials`] first.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex patterns for the secrets an Azure connection string or request can carry
    static ref CREDENTIAL_PATTERNS: Vec<(Regex, &'static str)> = vec![
        // Shared key inside a connection string
        (Regex::new(r"(?i)(AccountKey)\s*=\s*([^;\s]+)").unwrap(),
         "$1=<REDACTED_ACCOUNT_KEY>"),

        // SAS token inside a connection string
        (Regex::new(r"(?i)(SharedAccessSignature)\s*=\s*([^;\s]+)").unwrap(),
         "$1=<REDACTED_SAS>"),

        // SAS signature in a request URL
        (Regex::new(r"(?i)([?&]sig)=([^&\s]+)").unwrap(),
         "$1=<REDACTED_SIGNATURE>"),

        // Shared key authorization header
        (Regex::new(r"(?i)(SharedKey\s+[^:\s]+):([A-Za-z0-9+/=]+)").unwrap(),
         "$1:<REDACTED_SIGNATURE>"),

        // Bearer tokens
        (Regex::new(r"(?i)(bearer|authorization)\s*[:=]\s*(bearer\s+)?([A-Za-z0-9\-._~+/]+=*)").unwrap(),
         "$1=<REDACTED_TOKEN>"),

        // Basic auth in URLs
        (Regex::new(r"(https?://)([^:/\s]+):([^@\s]+)@").unwrap(),
         "$1<REDACTED_USER>:<REDACTED_PASS>@"),
    ];
}

/// Scrub credentials from a string.
///
/// # Example
///
/// ```
/// use daybatch_uploader::security::credential_scrubber::scrub_credentials;
///
/// let input = "AccountName=acct;AccountKey=c2VjcmV0;EndpointSuffix=core.windows.net";
/// let scrubbed = scrub_credentials(input);
/// assert_eq!(
///     scrubbed,
///     "AccountName=acct;AccountKey=<REDACTED_ACCOUNT_KEY>;EndpointSuffix=core.windows.net"
/// );
/// ```
pub fn scrub_credentials(input: &str) -> String {
    let mut result = input.to_string();

    for (pattern, replacement) in CREDENTIAL_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).to_string();
    }

    result
}

/// Scrub an error chain, rendered with its causes, for display.
pub fn safe_error_message(error: &anyhow::Error) -> String {
    scrub_credentials(&format!("{:#}", error))
}
