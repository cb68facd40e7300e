//! Manifest operations for registry client
//!
//! Implements Docker Registry v2 and OCI manifest operations:
//! - Manifest download (GET /v2/{name}/manifests/{reference})
//! - Manifest upload (PUT /v2/{name}/manifests/{reference})
//! - Accept headers covering schema1, schema2, OCI manifests and indexes

use crate::error::handlers::HttpErrorHandler;
use crate::error::{RegistryError, Result};
use crate::image::manifest::{ACCEPTED_MANIFEST_TYPES, Manifest};
use crate::logging::Logger;
use crate::registry::token_manager::TokenManager;
use reqwest::{Client, header};

#[derive(Clone)]
pub struct ManifestOperations {
    client: Client,
    address: String,
    output: Logger,
    token_manager: TokenManager,
}

impl ManifestOperations {
    pub fn new(
        client: Client,
        address: String,
        output: Logger,
        token_manager: TokenManager,
    ) -> Self {
        Self {
            client,
            address,
            output,
            token_manager,
        }
    }

    fn manifest_url(&self, repository: &str, reference: &str) -> String {
        format!("{}/v2/{}/manifests/{}", self.address, repository, reference)
    }

    /// Download manifest with multi-format Accept headers
    pub async fn pull_manifest(&self, repository: &str, reference: &str) -> Result<Manifest> {
        let url = self.manifest_url(repository, reference);
        let scope = TokenManager::repository_scope(repository, false);
        let accept = ACCEPTED_MANIFEST_TYPES.join(", ");

        self.output.verbose(&format!("Pulling manifest for {}:{}", repository, reference));

        let response = self
            .token_manager
            .execute_with_retry(
                || self.client.get(&url).header(header::ACCEPT, &accept),
                &scope,
                "manifest pull",
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(HttpErrorHandler::handle_registry_error(
                status,
                &error_text,
                &format!("manifest pull of {}:{}", repository, reference),
            ));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        if let Some(digest) = response
            .headers()
            .get("Docker-Content-Digest")
            .and_then(|h| h.to_str().ok())
        {
            self.output.detail(&format!("Registry reports manifest digest {}", digest));
        }

        let data = response.bytes().await.map_err(|e| {
            RegistryError::Network(format!("Failed to read manifest response: {}", e))
        })?;

        let manifest = Manifest::from_bytes(data.to_vec(), content_type.as_deref());
        self.output.detail(&format!("Manifest type: {}", manifest.media_type()));
        Ok(manifest)
    }

    /// Upload manifest bytes unchanged, with their original media type
    pub async fn push_manifest(
        &self,
        repository: &str,
        reference: &str,
        manifest: &Manifest,
    ) -> Result<()> {
        let url = self.manifest_url(repository, reference);
        let scope = TokenManager::repository_scope(repository, true);

        self.output.verbose(&format!(
            "Uploading manifest with content-type: {}",
            manifest.media_type()
        ));

        let response = self
            .token_manager
            .execute_with_retry(
                || {
                    self.client
                        .put(&url)
                        .header(header::CONTENT_TYPE, manifest.media_type())
                        .body(manifest.as_bytes().to_vec())
                },
                &scope,
                "manifest upload",
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            Err(HttpErrorHandler::handle_registry_error(
                status,
                &error_text,
                &format!("manifest upload of {}:{}", repository, reference),
            ))
        }
    }
}
