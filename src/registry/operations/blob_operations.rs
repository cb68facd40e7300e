//! Blob operations for registry client
//!
//! Implements Docker Registry v2 blob operations:
//! - Blob existence checks (HEAD /v2/{name}/blobs/{digest})
//! - Blob download (GET /v2/{name}/blobs/{digest})
//! - Blob upload with the POST + monolithic PUT pattern (/v2/{name}/blobs/uploads/)

use crate::error::handlers::HttpErrorHandler;
use crate::error::{RegistryError, Result};
use crate::image::DigestUtils;
use crate::logging::Logger;
use crate::registry::token_manager::TokenManager;
use futures::StreamExt;
use reqwest::{Client, StatusCode, header};

/// Upper bound on the buffer reserved up front from `Content-Length`
const MAX_PREALLOCATION: u64 = 64 * 1024 * 1024;

#[derive(Clone)]
pub struct BlobOperations {
    client: Client,
    address: String,
    output: Logger,
    token_manager: TokenManager,
}

impl BlobOperations {
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

    fn blob_url(&self, repository: &str, digest: &str) -> String {
        format!("{}/v2/{}/blobs/{}", self.address, repository, digest)
    }

    /// Check if blob exists using a HEAD request
    pub async fn check_blob_exists(&self, repository: &str, digest: &str) -> Result<bool> {
        let url = self.blob_url(repository, digest);
        let scope = TokenManager::repository_scope(repository, false);

        self.output.detail(&format!(
            "Checking blob existence: {}",
            DigestUtils::format_digest_short(digest)
        ));

        let response = self
            .token_manager
            .execute_with_retry(|| self.client.head(&url), &scope, "blob existence check")
            .await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(HttpErrorHandler::handle_registry_error(
                status,
                "",
                "blob existence check",
            )),
        }
    }

    /// Download a blob, buffering the whole content in memory
    pub async fn download_blob(&self, repository: &str, digest: &str) -> Result<Vec<u8>> {
        let url = self.blob_url(repository, digest);
        let scope = TokenManager::repository_scope(repository, false);

        let response = self
            .token_manager
            .execute_with_retry(|| self.client.get(&url), &scope, "blob download")
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
                "blob download",
            ));
        }

        let expected = response.content_length();
        // Content-Length is server-controlled; the buffer grows past the cap as needed
        let capacity = expected.map_or(0, |n| n.min(MAX_PREALLOCATION));
        let mut data = Vec::with_capacity(usize::try_from(capacity).unwrap_or(0));
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                RegistryError::Network(format!("Failed to read blob {}: {}", digest, e))
            })?;
            data.extend_from_slice(&chunk);
        }

        if let Some(expected) = expected {
            if expected != data.len() as u64 {
                return Err(RegistryError::Network(format!(
                    "Blob {} truncated: expected {} bytes, received {}",
                    digest,
                    expected,
                    data.len()
                )));
            }
        }

        self.output.detail(&format!(
            "Downloaded blob {} ({})",
            DigestUtils::format_digest_short(digest),
            self.output.format_size(data.len() as u64)
        ));

        Ok(data)
    }

    /// Upload blob using the staged upload pattern: open a session, then a
    /// single PUT carrying the whole content and its digest
    pub async fn upload_blob(&self, repository: &str, digest: &str, data: Vec<u8>) -> Result<()> {
        let upload_url = format!("{}/v2/{}/blobs/uploads/", self.address, repository);
        let scope = TokenManager::repository_scope(repository, true);

        self.output.detail(&format!("Starting blob upload session at: {}", upload_url));

        let response = self
            .token_manager
            .execute_with_retry(
                || self.client.post(&upload_url).header(header::CONTENT_LENGTH, "0"),
                &scope,
                "blob upload session",
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(HttpErrorHandler::handle_upload_error(
                status,
                &error_text,
                "blob upload session",
            ));
        }

        let location = response
            .headers()
            .get(header::LOCATION)
            .ok_or_else(|| {
                RegistryError::Upload("Missing Location header in upload response".to_string())
            })?
            .to_str()
            .map_err(|e| RegistryError::Upload(format!("Invalid Location header: {}", e)))?;

        // Location may be absolute, host-relative or relative, and may carry
        // its own query (upload state); the digest is appended to it
        let mut final_url = url::Url::parse(&upload_url)?.join(location)?;
        final_url.query_pairs_mut().append_pair("digest", digest);

        self.output.detail(&format!(
            "Uploading {} to: {}",
            self.output.format_size(data.len() as u64),
            final_url
        ));

        let request = self
            .client
            .put(final_url)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header(header::CONTENT_LENGTH, data.len().to_string())
            .body(data);

        let response = self
            .token_manager
            .send_once(request, &scope, "blob upload")
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            Err(HttpErrorHandler::handle_upload_error(
                status,
                &error_text,
                "blob upload",
            ))
        }
    }
}
