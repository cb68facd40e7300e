//! Standardized error handling patterns for registry responses

use crate::error::{RegistryError, Result};
use reqwest::StatusCode;

/// Standard error handler for HTTP responses
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Map a non-success registry response to an error for `operation`
    pub fn handle_registry_error(
        status: StatusCode,
        error_text: &str,
        operation: &str,
    ) -> RegistryError {
        match status.as_u16() {
            401 => RegistryError::Auth(format!(
                "Unauthorized to perform {}: {}",
                operation, error_text
            )),
            403 => RegistryError::Auth(format!(
                "Forbidden: insufficient permissions for {}: {}",
                operation, error_text
            )),
            404 => RegistryError::NotFound(format!(
                "Resource not found for {}: {}",
                operation, error_text
            )),
            429 => RegistryError::Registry(format!(
                "Rate limited during {}: {}",
                operation, error_text
            )),
            500 => RegistryError::Registry(format!(
                "Registry server error during {}: {}",
                operation, error_text
            )),
            502 | 503 => RegistryError::Registry(format!(
                "Registry unavailable for {}: {}",
                operation, error_text
            )),
            _ => RegistryError::Registry(format!(
                "{} failed (status {}): {}",
                operation, status, error_text
            )),
        }
    }

    /// Handle upload-related HTTP errors with standardized messages
    pub fn handle_upload_error(
        status: StatusCode,
        error_text: &str,
        context: &str,
    ) -> RegistryError {
        let error_msg = match status.as_u16() {
            400 => {
                if error_text.contains("DIGEST_INVALID") {
                    format!(
                        "Digest validation failed - uploaded content doesn't match the digest: {}",
                        error_text
                    )
                } else {
                    format!("Bad request during {}: {}", context, error_text)
                }
            }
            401 => {
                return RegistryError::Auth(format!(
                    "Authentication failed during {}: {}",
                    context, error_text
                ));
            }
            403 => {
                return RegistryError::Auth(format!(
                    "Permission denied for {}: {}",
                    context, error_text
                ));
            }
            404 => format!(
                "Repository not found or {} session expired: {}",
                context, error_text
            ),
            413 => format!("Blob too large for {}: {}", context, error_text),
            500 => format!("Registry server error during {}: {}", context, error_text),
            502 | 503 => format!("Registry unavailable during {}: {}", context, error_text),
            507 => format!("Registry out of storage during {}: {}", context, error_text),
            _ => format!("{} failed (status {}): {}", context, status, error_text),
        };

        RegistryError::Upload(error_msg)
    }
}

/// Network error categorization and handling
pub struct NetworkErrorHandler;

impl NetworkErrorHandler {
    /// Categorize and format network errors with helpful context
    pub fn handle_network_error(error: &reqwest::Error, context: &str) -> RegistryError {
        if error.is_timeout() {
            RegistryError::Network(format!("{} timed out: {}", context, error))
        } else if error.is_connect() {
            RegistryError::Network(format!("Connection error during {}: {}", context, error))
        } else if error.to_string().contains("certificate") {
            RegistryError::Network(format!(
                "TLS certificate error during {}: {}",
                context, error
            ))
        } else {
            RegistryError::Network(format!("{} network error: {}", context, error))
        }
    }
}

/// Validation error utilities
pub struct ValidationErrorHandler;

impl ValidationErrorHandler {
    /// Describe a half-filled credential pair. Such pairs are still sent as-is.
    pub fn incomplete_credentials(username: &str, password: &str) -> Option<&'static str> {
        match (username.is_empty(), password.is_empty()) {
            (false, true) => Some("username given without a password"),
            (true, false) => Some("password given without a username"),
            _ => None,
        }
    }

    /// Standard numeric range validation
    pub fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(RegistryError::Validation(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if timeout > 86400 {
            return Err(RegistryError::Validation(
                "Timeout cannot exceed 24 hours (86400 seconds)".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err =
            HttpErrorHandler::handle_registry_error(StatusCode::NOT_FOUND, "", "manifest pull");
        assert!(err.is_not_found());

        let err =
            HttpErrorHandler::handle_registry_error(StatusCode::UNAUTHORIZED, "", "manifest pull");
        assert!(err.is_unauthorized());

        let err = HttpErrorHandler::handle_upload_error(
            StatusCode::BAD_REQUEST,
            "DIGEST_INVALID",
            "blob upload",
        );
        assert!(
            matches!(err, RegistryError::Upload(msg) if msg.contains("Digest validation failed"))
        );
    }

    #[test]
    fn test_incomplete_credentials_are_described() {
        assert_eq!(ValidationErrorHandler::incomplete_credentials("", ""), None);
        assert_eq!(ValidationErrorHandler::incomplete_credentials("user", "pass"), None);
        assert!(ValidationErrorHandler::incomplete_credentials("user", "").is_some());
        assert!(ValidationErrorHandler::incomplete_credentials("", "pass").is_some());
    }

    #[test]
    fn test_timeout_bounds() {
        assert!(ValidationErrorHandler::validate_timeout(0).is_err());
        assert!(ValidationErrorHandler::validate_timeout(300).is_ok());
        assert!(ValidationErrorHandler::validate_timeout(86401).is_err());
    }
}
