//! Configuration management module

use crate::error::handlers::ValidationErrorHandler;
use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Authentication configuration. Empty username and password mean anonymous.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl AuthConfig {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }

    /// Describes a half-filled pair, which registries will likely reject
    pub fn incomplete(&self) -> Option<&'static str> {
        ValidationErrorHandler::incomplete_credentials(&self.username, &self.password)
    }
}

// Keep the password out of debug output and logs
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .finish()
    }
}

/// One registry to talk to: base URL, credentials and transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEndpoint {
    pub address: String,
    pub auth: AuthConfig,
    pub skip_tls: bool,
    pub timeout: u64,
}

impl RegistryEndpoint {
    /// Create an endpoint, normalizing the address.
    ///
    /// A missing scheme defaults to `https://`; trailing slashes are removed.
    pub fn new(address: &str) -> Result<Self> {
        let endpoint = Self {
            address: Self::normalize_address(address)?,
            auth: AuthConfig::default(),
            skip_tls: false,
            timeout: 3600,
        };
        Ok(endpoint)
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_skip_tls(mut self, skip_tls: bool) -> Self {
        self.skip_tls = skip_tls;
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Credentials, or `None` for anonymous access
    pub fn credentials(&self) -> Option<&AuthConfig> {
        (!self.auth.is_anonymous()).then_some(&self.auth)
    }

    fn normalize_address(address: &str) -> Result<String> {
        let address = address.trim();
        if address.is_empty() {
            return Err(RegistryError::Validation(
                "Registry address cannot be empty".to_string(),
            ));
        }

        let with_scheme = if address.contains("://") {
            address.to_string()
        } else {
            format!("https://{}", address)
        };

        let url = url::Url::parse(&with_scheme)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RegistryError::Validation(format!(
                "Invalid registry address: {}. Must use http:// or https://",
                address
            )));
        }
        if url.host_str().is_none() {
            return Err(RegistryError::Validation(format!(
                "Registry address has no host: {}",
                address
            )));
        }

        Ok(with_scheme.trim_end_matches('/').to_string())
    }

    pub fn validate(&self) -> Result<()> {
        ValidationErrorHandler::validate_timeout(self.timeout)
    }
}
