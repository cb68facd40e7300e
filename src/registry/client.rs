//! HTTP registry client
//!
//! [`RegistryClient`] is an authenticated handle to one registry speaking the
//! Docker Registry HTTP API v2. It implements [`RegistryTransport`] so the sync
//! pipeline can drive it.

use crate::cli::config::RegistryEndpoint;
use crate::error::{RegistryError, Result};
use crate::image::Manifest;
use crate::logging::Logger;
use crate::registry::auth::Auth;
use crate::registry::operations::{BlobOperations, ManifestOperations};
use crate::registry::token_manager::TokenManager;
use crate::registry::transport::RegistryTransport;
use async_trait::async_trait;
use reqwest::Client;

pub struct RegistryClientBuilder {
    endpoint: RegistryEndpoint,
    output: Logger,
}

impl RegistryClientBuilder {
    pub fn new(endpoint: RegistryEndpoint, output: Logger) -> Self {
        Self { endpoint, output }
    }

    pub fn build(self) -> Result<RegistryClient> {
        self.endpoint.validate()?;

        let mut builder = Client::builder()
            .timeout(self.endpoint.timeout_duration())
            .user_agent(concat!("registry-sync/", env!("CARGO_PKG_VERSION")));

        if self.endpoint.skip_tls {
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }

        let client = builder
            .build()
            .map_err(|e| RegistryError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let token_manager = TokenManager::new(
            Auth::new(client.clone()),
            self.endpoint.credentials().cloned(),
            self.output.clone(),
        );

        Ok(RegistryClient {
            blob_ops: BlobOperations::new(
                client.clone(),
                self.endpoint.address.clone(),
                self.output.clone(),
                token_manager.clone(),
            ),
            manifest_ops: ManifestOperations::new(
                client,
                self.endpoint.address.clone(),
                self.output.clone(),
                token_manager,
            ),
        })
    }
}

#[derive(Clone)]
pub struct RegistryClient {
    blob_ops: BlobOperations,
    manifest_ops: ManifestOperations,
}

impl RegistryClient {
    pub fn builder(endpoint: RegistryEndpoint, output: Logger) -> RegistryClientBuilder {
        RegistryClientBuilder::new(endpoint, output)
    }
}

#[async_trait]
impl RegistryTransport for RegistryClient {
    async fn fetch_manifest(&self, repository: &str, tag: &str) -> Result<Manifest> {
        self.manifest_ops.pull_manifest(repository, tag).await
    }

    async fn has_blob(&self, repository: &str, digest: &str) -> Result<bool> {
        self.blob_ops.check_blob_exists(repository, digest).await
    }

    async fn download_blob(&self, repository: &str, digest: &str) -> Result<Vec<u8>> {
        self.blob_ops.download_blob(repository, digest).await
    }

    async fn upload_blob(&self, repository: &str, digest: &str, data: Vec<u8>) -> Result<()> {
        self.blob_ops.upload_blob(repository, digest, data).await
    }

    async fn put_manifest(&self, repository: &str, tag: &str, manifest: &Manifest) -> Result<()> {
        self.manifest_ops.push_manifest(repository, tag, manifest).await
    }
}
