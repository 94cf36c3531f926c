//! Parsing of Azure Storage connection strings.
//!
//! A connection string is a `;`-separated list of `Key=Value` pairs, e.g.
//!
//! ```text
//! DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=base64==;EndpointSuffix=core.windows.net
//! BlobEndpoint=https://acct.blob.core.windows.net;SharedAccessSignature=sv=2022-11-02&sig=...
//! UseDevelopmentStorage=true
//! ```
//!
//! Only the keys relevant to blob access are kept; other endpoints are ignored.

use std::fmt;

use log::debug;

use crate::constants::AZURE_DEFAULT_ENDPOINT_SUFFIX;
use crate::error::TransferError;

/// How the connection string authenticates.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Credential<'a> {
    /// Local storage emulator with its well-known account
    Emulator,
    /// Shared key authorization
    AccountKey(&'a str),
    /// Shared access signature token (without a leading `?`)
    SharedAccessSignature(&'a str),
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionString {
    protocol: Option<String>,
    account_name: Option<String>,
    account_key: Option<String>,
    endpoint_suffix: Option<String>,
    blob_endpoint: Option<String>,
    sas_token: Option<String>,
    use_development_storage: bool,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, TransferError> {
        let mut parsed = ConnectionString::default();

        for segment in raw.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            // Values such as keys and SAS tokens contain '=' themselves
            let (name, value) = segment
                .split_once('=')
                .ok_or_else(|| malformed(format!("segment without '=' ({} chars)", segment.len())))?;
            let value = value.trim().to_string();

            match name.trim().to_ascii_lowercase().as_str() {
                "defaultendpointsprotocol" => parsed.protocol = Some(value.to_ascii_lowercase()),
                "accountname" => parsed.account_name = Some(value),
                "accountkey" => parsed.account_key = Some(value),
                "endpointsuffix" => parsed.endpoint_suffix = Some(value),
                "blobendpoint" => parsed.blob_endpoint = Some(value.trim_end_matches('/').to_string()),
                "sharedaccesssignature" => {
                    parsed.sas_token = Some(value.trim_start_matches('?').to_string())
                }
                "usedevelopmentstorage" => {
                    parsed.use_development_storage = value.eq_ignore_ascii_case("true")
                }
                other => debug!("Ignoring connection string key '{}'", other),
            }
        }

        parsed.validate()?;
        Ok(parsed)
    }

    fn validate(&self) -> Result<(), TransferError> {
        if self.use_development_storage {
            return Ok(());
        }

        if let Some(protocol) = &self.protocol {
            if protocol != "https" && protocol != "http" {
                return Err(malformed(format!("unsupported protocol '{}'", protocol)));
            }
        }

        if self.account().is_none() {
            return Err(malformed(
                "neither AccountName nor BlobEndpoint is present".to_string(),
            ));
        }

        match (&self.account_key, &self.sas_token) {
            (None, None) => Err(malformed(
                "neither AccountKey nor SharedAccessSignature is present".to_string(),
            )),
            (Some(_), _) if self.account_name.is_none() => Err(malformed(
                "AccountKey requires AccountName".to_string(),
            )),
            (Some(key), _) if key.is_empty() => Err(malformed("AccountKey is empty".to_string())),
            (None, Some(sas)) if sas.is_empty() => {
                Err(malformed("SharedAccessSignature is empty".to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Storage account name, taken from `AccountName` or the blob endpoint host.
    pub fn account(&self) -> Option<String> {
        if let Some(name) = self.account_name.as_ref().filter(|n| !n.is_empty()) {
            return Some(name.clone());
        }

        let endpoint = self.blob_endpoint.as_deref()?;
        let host = endpoint
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(endpoint);
        let label = host.split(|c: char| c == '/' || c == ':' || c == '.').next()?;
        (!label.is_empty()).then(|| label.to_string())
    }

    pub fn credential(&self) -> Credential<'_> {
        if self.use_development_storage {
            Credential::Emulator
        } else if let Some(key) = &self.account_key {
            Credential::AccountKey(key)
        } else {
            // validate() guarantees one of the two is present
            Credential::SharedAccessSignature(self.sas_token.as_deref().unwrap_or_default())
        }
    }

    pub fn is_emulator(&self) -> bool {
        self.use_development_storage
    }

    pub fn allows_http(&self) -> bool {
        self.protocol.as_deref() == Some("http")
            || self
                .blob_endpoint
                .as_deref()
                .is_some_and(|e| e.starts_with("http://"))
    }

    /// Blob endpoint URL, when it differs from the public-cloud default.
    pub fn blob_endpoint(&self) -> Option<String> {
        if let Some(endpoint) = &self.blob_endpoint {
            return Some(endpoint.clone());
        }

        let suffix = self
            .endpoint_suffix
            .as_deref()
            .unwrap_or(AZURE_DEFAULT_ENDPOINT_SUFFIX);
        let protocol = self.protocol.as_deref().unwrap_or("https");
        if suffix == AZURE_DEFAULT_ENDPOINT_SUFFIX && protocol == "https" {
            return None;
        }

        let account = self.account()?;
        Some(format!("{}://{}.blob.{}", protocol, account, suffix))
    }
}

// Secrets stay out of logs and panic messages
impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("protocol", &self.protocol)
            .field("account_name", &self.account_name)
            .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint_suffix", &self.endpoint_suffix)
            .field("blob_endpoint", &self.blob_endpoint)
            .field("sas_token", &self.sas_token.as_ref().map(|_| "<redacted>"))
            .field("use_development_storage", &self.use_development_storage)
            .finish()
    }
}

fn malformed(reason: String) -> TransferError {
    TransferError::Configuration(format!("malformed storage connection string: {}", reason))
}
