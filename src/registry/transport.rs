//! Registry capability interface
//!
//! The sync pipeline only talks to registries through [`RegistryTransport`].
//! [`RegistryClient`](crate::registry::RegistryClient) implements it over the
//! Docker Registry HTTP API v2; tests implement it in memory.

use crate::error::Result;
use crate::image::Manifest;
use async_trait::async_trait;

/// Operations one registry endpoint must provide
#[async_trait]
pub trait RegistryTransport: Send + Sync {
    /// Fetch the manifest stored under `repository:tag`
    async fn fetch_manifest(&self, repository: &str, tag: &str) -> Result<Manifest>;

    /// Check whether a blob exists, without transferring content
    async fn has_blob(&self, repository: &str, digest: &str) -> Result<bool>;

    /// Download the full content of a blob
    async fn download_blob(&self, repository: &str, digest: &str) -> Result<Vec<u8>>;

    /// Upload blob content under `digest`
    async fn upload_blob(&self, repository: &str, digest: &str, data: Vec<u8>) -> Result<()>;

    /// Store `manifest` under `repository:tag`, byte for byte
    async fn put_manifest(&self, repository: &str, tag: &str, manifest: &Manifest) -> Result<()>;
}
