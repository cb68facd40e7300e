//! In-memory registry used by the sync tests

#![allow(dead_code)]

use async_trait::async_trait;
use registry_sync::error::{RegistryError, Result};
use registry_sync::image::manifest::DOCKER_V1_SIGNED;
use registry_sync::image::{DigestUtils, Manifest};
use registry_sync::registry::RegistryTransport;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchManifest(String),
    HasBlob(String),
    DownloadBlob(String),
    UploadBlob(String),
    PutManifest(String),
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(self, Call::UploadBlob(_) | Call::PutManifest(_))
    }
}

#[derive(Default)]
struct State {
    manifests: HashMap<String, Manifest>,
    blobs: HashMap<String, Vec<u8>>,
    calls: Vec<Call>,
    uploads: usize,
}

#[derive(Default)]
pub struct FakeRegistry {
    state: Mutex<State>,
    /// Fail the n-th upload (1-based)
    fail_upload_at: Option<usize>,
    fail_has_blob: bool,
    fail_fetch_manifest: bool,
    fail_download: bool,
    fail_put_manifest: bool,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_upload_at(mut self, n: usize) -> Self {
        self.fail_upload_at = Some(n);
        self
    }

    pub fn failing_existence_checks(mut self) -> Self {
        self.fail_has_blob = true;
        self
    }

    pub fn failing_manifest_fetch(mut self) -> Self {
        self.fail_fetch_manifest = true;
        self
    }

    pub fn failing_downloads(mut self) -> Self {
        self.fail_download = true;
        self
    }

    pub fn failing_manifest_put(mut self) -> Self {
        self.fail_put_manifest = true;
        self
    }

    pub fn with_blob(self, data: &[u8]) -> Self {
        let digest = DigestUtils::compute_docker_digest(data);
        self.state.lock().unwrap().blobs.insert(digest, data.to_vec());
        self
    }

    pub fn with_manifest(self, repository: &str, tag: &str, manifest: Manifest) -> Self {
        self.state
            .lock()
            .unwrap()
            .manifests
            .insert(format!("{}:{}", repository, tag), manifest);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn count(&self, matcher: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matcher(c)).count()
    }

    pub fn manifest(&self, repository: &str, tag: &str) -> Option<Manifest> {
        self.state
            .lock()
            .unwrap()
            .manifests
            .get(&format!("{}:{}", repository, tag))
            .cloned()
    }

    pub fn has(&self, digest: &str) -> bool {
        self.state.lock().unwrap().blobs.contains_key(digest)
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl RegistryTransport for FakeRegistry {
    async fn fetch_manifest(&self, repository: &str, tag: &str) -> Result<Manifest> {
        let key = format!("{}:{}", repository, tag);
        self.record(Call::FetchManifest(key.clone()));
        if self.fail_fetch_manifest {
            return Err(RegistryError::Network("connection refused".to_string()));
        }
        self.state
            .lock()
            .unwrap()
            .manifests
            .get(&key)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(key))
    }

    async fn has_blob(&self, _repository: &str, digest: &str) -> Result<bool> {
        self.record(Call::HasBlob(digest.to_string()));
        if self.fail_has_blob {
            return Err(RegistryError::Registry("HEAD failed with status 500".to_string()));
        }
        Ok(self.has(digest))
    }

    async fn download_blob(&self, _repository: &str, digest: &str) -> Result<Vec<u8>> {
        self.record(Call::DownloadBlob(digest.to_string()));
        if self.fail_download {
            return Err(RegistryError::Network("connection reset".to_string()));
        }
        self.state
            .lock()
            .unwrap()
            .blobs
            .get(digest)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(digest.to_string()))
    }

    async fn upload_blob(&self, _repository: &str, digest: &str, data: Vec<u8>) -> Result<()> {
        self.record(Call::UploadBlob(digest.to_string()));
        let mut state = self.state.lock().unwrap();
        state.uploads += 1;
        if self.fail_upload_at == Some(state.uploads) {
            return Err(RegistryError::Upload("storage full".to_string()));
        }
        state.blobs.insert(digest.to_string(), data);
        Ok(())
    }

    async fn put_manifest(&self, repository: &str, tag: &str, manifest: &Manifest) -> Result<()> {
        let key = format!("{}:{}", repository, tag);
        self.record(Call::PutManifest(key.clone()));
        if self.fail_put_manifest {
            return Err(RegistryError::Auth("denied".to_string()));
        }
        self.state.lock().unwrap().manifests.insert(key, manifest.clone());
        Ok(())
    }
}

pub fn digest_of(data: &[u8]) -> String {
    DigestUtils::compute_docker_digest(data)
}

/// Schema1 manifest referencing the given blobs, in order
pub fn schema1_manifest(blobs: &[&[u8]]) -> Manifest {
    let fs_layers: Vec<_> = blobs
        .iter()
        .map(|b| serde_json::json!({ "blobSum": digest_of(b) }))
        .collect();
    let body = serde_json::json!({
        "schemaVersion": 1,
        "name": "team/app",
        "tag": "latest",
        "architecture": "amd64",
        "fsLayers": fs_layers,
        "signatures": [{"signature": "c2lnbmF0dXJl"}]
    });
    Manifest::from_bytes(serde_json::to_vec_pretty(&body).unwrap(), Some(DOCKER_V1_SIGNED))
}
