//! Error types for registry operations and the sync pipeline
//!
//! [`RegistryError`] describes failures of a single registry call (transport,
//! status codes, malformed documents). [`SyncError`] classifies those failures
//! by the sync step they aborted, which is what the caller reports.

pub mod handlers;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Network related errors
    #[error("Network error: {0}")]
    Network(String),
    /// Registry returned an unexpected status
    #[error("Registry error: {0}")]
    Registry(String),
    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Upload errors
    #[error("Upload error: {0}")]
    Upload(String),
    /// Structurally invalid manifest
    #[error("Manifest error: {0}")]
    Manifest(String),
    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RegistryError::Auth(_))
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        handlers::NetworkErrorHandler::handle_network_error(&err, "registry request")
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Parse(err.to_string())
    }
}

impl From<url::ParseError> for RegistryError {
    fn from(err: url::ParseError) -> Self {
        RegistryError::Validation(err.to_string())
    }
}

/// Fatal failure of one sync run, tagged with the step that failed.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch source manifest {reference}: {source}")]
    SourceManifest {
        reference: String,
        #[source]
        source: RegistryError,
    },

    #[error("source manifest {reference} is malformed: {source}")]
    ManifestStructure {
        reference: String,
        #[source]
        source: RegistryError,
    },

    #[error("failed to download blob {digest}: {source}")]
    Download {
        digest: String,
        #[source]
        source: RegistryError,
    },

    #[error("failed to upload blob {digest}: {source}")]
    Upload {
        digest: String,
        #[source]
        source: RegistryError,
    },

    #[error("failed to publish manifest {reference}: {source}")]
    Publish {
        reference: String,
        #[source]
        source: RegistryError,
    },

    #[error("invalid configuration: {0}")]
    Config(#[source] RegistryError),

    #[error("failed to set up client for {registry}: {source}")]
    ClientSetup {
        registry: String,
        #[source]
        source: RegistryError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_setup_names_the_registry() {
        let err = SyncError::ClientSetup {
            registry: "https://registry.example.com".to_string(),
            source: RegistryError::Network("Failed to create HTTP client".to_string()),
        };

        let message = err.to_string();
        assert!(message.starts_with("failed to set up client for https://registry.example.com"));
        assert!(!message.contains("invalid configuration"));
    }
}
