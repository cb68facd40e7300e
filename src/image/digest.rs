//! Content digest utilities
//!
//! Digests are the content addresses blobs and manifests are stored under.
//! Registries accept `algorithm:hex`; sha256 is by far the most common, sha512
//! is allowed by the OCI distribution spec.

use crate::error::{RegistryError, Result};
use sha2::{Digest, Sha256};

/// Standard SHA256 digest of empty content
pub const EMPTY_DIGEST_FULL: &str =
    "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Utilities for working with content digests in registry context
pub struct DigestUtils;

impl DigestUtils {
    /// Compute SHA256 digest from byte data as lowercase hex
    pub fn compute_sha256(data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }

    /// Compute full digest (with sha256: prefix) from byte data
    pub fn compute_docker_digest(data: &[u8]) -> String {
        format!("sha256:{}", Self::compute_sha256(data))
    }

    /// Validate a full `algorithm:hex` digest
    pub fn validate_digest(digest: &str) -> Result<()> {
        let (algorithm, encoded) = digest.split_once(':').ok_or_else(|| {
            RegistryError::Validation(format!("Digest missing algorithm prefix: {}", digest))
        })?;

        let expected_len = match algorithm {
            "sha256" => 64,
            "sha512" => 128,
            other => {
                return Err(RegistryError::Validation(format!(
                    "Unsupported digest algorithm '{}' in {}",
                    other, digest
                )));
            }
        };

        if encoded.len() != expected_len
            || !encoded.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(RegistryError::Validation(format!(
                "Invalid {} digest: expected {} lowercase hex characters, got '{}'",
                algorithm, expected_len, encoded
            )));
        }

        Ok(())
    }

    pub fn is_valid_digest(digest: &str) -> bool {
        Self::validate_digest(digest).is_ok()
    }

    /// Format digest for display (truncated for readability)
    pub fn format_digest_short(digest: &str) -> String {
        if digest.len() > 19 {
            format!("{}...", &digest[..19])
        } else {
            digest.to_string()
        }
    }
}
