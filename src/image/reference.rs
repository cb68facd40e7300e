//! Repository/tag pair identifying the manifest being synced

use crate::error::{RegistryError, Result};
use std::fmt;

pub const DEFAULT_TAG: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    repository: String,
    tag: String,
}

impl ImageReference {
    /// Build a reference, falling back to `latest` when no tag is given.
    pub fn new(repository: impl Into<String>, tag: Option<&str>) -> Result<Self> {
        let repository = repository.into().trim_matches('/').to_string();
        let tag = tag.unwrap_or(DEFAULT_TAG).to_string();

        if repository.is_empty() {
            return Err(RegistryError::Validation(
                "Repository name cannot be empty".to_string(),
            ));
        }
        if tag.is_empty() {
            return Err(RegistryError::Validation("Tag cannot be empty".to_string()));
        }
        if repository.chars().any(|c| c.is_ascii_uppercase() || c.is_whitespace()) {
            return Err(RegistryError::Validation(format!(
                "Repository name must be lowercase without whitespace: {}",
                repository
            )));
        }
        let valid_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-');
        if tag.len() > 128 || !tag.chars().all(valid_char) {
            return Err(RegistryError::Validation(format!("Invalid tag: {}", tag)));
        }

        Ok(Self { repository, tag })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}
