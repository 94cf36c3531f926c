use std::env;
use std::sync::Arc;

use log::{debug, info};
use object_store::azure::{AzureConfigKey, MicrosoftAzure, MicrosoftAzureBuilder};

use crate::cloud::connection_string::{ConnectionString, Credential};
use crate::cloud::sink::ObjectStoreSink;
use crate::error::TransferError;

/// Build an Azure Blob Storage sink for `container` from a connection string.
///
/// The client keeps its own retry and timeout defaults.
pub fn connect(container: &str, connection_string: &str) -> Result<ObjectStoreSink, TransferError> {
    let parsed = ConnectionString::parse(connection_string)?;
    let store = build_store(container, &parsed)?;

    info!(
        "Bound container '{}' on account '{}'",
        container,
        parsed.account().unwrap_or_else(|| "devstoreaccount1".to_string())
    );
    Ok(ObjectStoreSink::new(container, Arc::new(store)))
}

/// Build the sink from the connection string held in environment variable `var_name`.
///
/// A missing or empty variable is a configuration error; no other credential
/// source is consulted.
pub fn connect_from_env(container: &str, var_name: &str) -> Result<ObjectStoreSink, TransferError> {
    let connection_string = match env::var(var_name) {
        Ok(value) if !value.trim().is_empty() => value,
        Ok(_) => {
            return Err(TransferError::Configuration(format!(
                "{} is set but empty",
                var_name
            )))
        }
        Err(env::VarError::NotPresent) => {
            return Err(TransferError::Configuration(format!(
                "{} is not set",
                var_name
            )))
        }
        Err(env::VarError::NotUnicode(_)) => {
            return Err(TransferError::Configuration(format!(
                "{} is not valid unicode",
                var_name
            )))
        }
    };

    debug!("Read storage credential from {}", var_name);
    connect(container, &connection_string)
}

fn build_store(container: &str, cs: &ConnectionString) -> Result<MicrosoftAzure, TransferError> {
    let mut builder = MicrosoftAzureBuilder::new().with_container_name(container);

    match cs.credential() {
        Credential::Emulator => {
            builder = builder.with_use_emulator(true);
        }
        Credential::AccountKey(key) => {
            builder = builder.with_access_key(key);
        }
        Credential::SharedAccessSignature(token) => {
            builder = builder.with_config(AzureConfigKey::SasKey, token);
        }
    }

    if !cs.is_emulator() {
        if let Some(account) = cs.account() {
            builder = builder.with_account(account);
        }
        if let Some(endpoint) = cs.blob_endpoint() {
            builder = builder.with_config(AzureConfigKey::Endpoint, endpoint);
        }
        if cs.allows_http() {
            builder = builder.with_allow_http(true);
        }
    }

    builder.build().map_err(|e| {
        TransferError::Configuration(format!("failed to create Azure Blob Storage client: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::sink::UploadSink;

    #[test]
    fn test_connect_with_account_key() {
        let sink = connect(
            "data",
            "DefaultEndpointsProtocol=https;AccountName=weatherdata;AccountKey=c2VjcmV0a2V5;EndpointSuffix=core.windows.net",
        )
        .unwrap();
        assert_eq!(sink.container(), "data");
    }

    #[test]
    fn test_connect_with_sas_and_endpoint() {
        let sink = connect(
            "data",
            "BlobEndpoint=https://weatherdata.blob.core.windows.net;SharedAccessSignature=sv=2022-11-02&sr=c&sig=c2ln",
        );
        assert!(sink.is_ok());
    }

    #[test]
    fn test_connect_with_emulator() {
        assert!(connect("data", "UseDevelopmentStorage=true").is_ok());
    }

    #[test]
    fn test_malformed_connection_string_is_configuration_error() {
        let result = connect("data", "AccountName=weatherdata");
        assert!(matches!(result, Err(TransferError::Configuration(_))));
    }

    #[test]
    fn test_missing_env_var_is_configuration_error() {
        let result = connect_from_env("data", "DAYBATCH_TEST_CREDENTIAL_THAT_IS_NEVER_SET");
        match result {
            Err(TransferError::Configuration(message)) => {
                assert!(message.contains("DAYBATCH_TEST_CREDENTIAL_THAT_IS_NEVER_SET"));
            }
            other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_env_var_is_configuration_error() {
        env::set_var("DAYBATCH_TEST_EMPTY_CREDENTIAL", "  ");
        let result = connect_from_env("data", "DAYBATCH_TEST_EMPTY_CREDENTIAL");
        env::remove_var("DAYBATCH_TEST_EMPTY_CREDENTIAL");
        assert!(matches!(result, Err(TransferError::Configuration(_))));
    }

    #[test]
    fn test_env_var_connection_string() {
        env::set_var("DAYBATCH_TEST_VALID_CREDENTIAL", "UseDevelopmentStorage=true");
        let result = connect_from_env("data", "DAYBATCH_TEST_VALID_CREDENTIAL");
        env::remove_var("DAYBATCH_TEST_VALID_CREDENTIAL");
        assert!(result.is_ok());
    }
}
