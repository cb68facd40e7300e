//! Manifest documents and layer extraction
//!
//! A [`Manifest`] wraps the exact bytes a registry served. The bytes are never
//! re-serialized: schema1 manifests carry a JWS signature over them and every
//! manifest is addressed by the digest of its bytes.

use crate::error::{RegistryError, Result};
use crate::image::digest::DigestUtils;
use serde::Deserialize;

pub const DOCKER_V1_SIGNED: &str = "application/vnd.docker.distribution.manifest.v1+prettyjws";
pub const DOCKER_V1: &str = "application/vnd.docker.distribution.manifest.v1+json";
pub const DOCKER_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";
pub const DOCKER_MANIFEST_LIST: &str = "application/vnd.docker.distribution.manifest.list.v2+json";
pub const OCI_MANIFEST: &str = "application/vnd.oci.image.manifest.v1+json";
pub const OCI_INDEX: &str = "application/vnd.oci.image.index.v1+json";

/// Media types sent in the `Accept` header when fetching a manifest
pub const ACCEPTED_MANIFEST_TYPES: &[&str] = &[
    DOCKER_V2,
    DOCKER_MANIFEST_LIST,
    OCI_MANIFEST,
    OCI_INDEX,
    DOCKER_V1_SIGNED,
    DOCKER_V1,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestType {
    DockerV1Signed,
    DockerV2,
    OciManifest,
    DockerManifestList,
    OciIndex,
    Unknown,
}

impl ManifestType {
    pub fn from_media_type(media_type: &str) -> Self {
        // Registries may append parameters, e.g. "; charset=utf-8"
        let essence = media_type.split(';').next().unwrap_or("").trim();
        match essence {
            DOCKER_V1_SIGNED | DOCKER_V1 => ManifestType::DockerV1Signed,
            DOCKER_V2 => ManifestType::DockerV2,
            OCI_MANIFEST => ManifestType::OciManifest,
            DOCKER_MANIFEST_LIST => ManifestType::DockerManifestList,
            OCI_INDEX => ManifestType::OciIndex,
            _ => ManifestType::Unknown,
        }
    }

    pub fn is_index(self) -> bool {
        matches!(self, ManifestType::DockerManifestList | ManifestType::OciIndex)
    }
}

/// The subset of manifest fields needed to classify and walk a document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestDocument {
    schema_version: Option<u32>,
    media_type: Option<String>,
    fs_layers: Option<Vec<serde_json::Value>>,
    config: Option<serde_json::Value>,
    layers: Option<Vec<serde_json::Value>>,
    manifests: Option<Vec<serde_json::Value>>,
}

/// A manifest as served by a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    raw: Vec<u8>,
    media_type: String,
}

impl Manifest {
    /// Wrap raw bytes fetched from a registry.
    ///
    /// `content_type` is the response `Content-Type`; when absent or generic the
    /// media type is inferred from the document itself.
    pub fn from_bytes(raw: Vec<u8>, content_type: Option<&str>) -> Self {
        let media_type = match content_type {
            Some(ct) if ManifestType::from_media_type(ct) != ManifestType::Unknown => {
                ct.split(';').next().unwrap_or(ct).trim().to_string()
            }
            _ => Self::infer_media_type(&raw),
        };

        Self { raw, media_type }
    }

    fn infer_media_type(raw: &[u8]) -> String {
        match serde_json::from_slice::<ManifestDocument>(raw) {
            Ok(doc) => match (doc.media_type, doc.schema_version) {
                (Some(media_type), _) => media_type,
                (None, Some(1)) => DOCKER_V1_SIGNED.to_string(),
                // OCI manifests may omit mediaType
                (None, _) if doc.manifests.is_some() => OCI_INDEX.to_string(),
                (None, _) if doc.config.is_some() => OCI_MANIFEST.to_string(),
                _ => DOCKER_V2.to_string(),
            },
            Err(_) => DOCKER_V2.to_string(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn manifest_type(&self) -> ManifestType {
        ManifestType::from_media_type(&self.media_type)
    }

    /// Digest of the raw manifest bytes
    pub fn digest(&self) -> String {
        DigestUtils::compute_docker_digest(&self.raw)
    }

    /// Ordered list of blob digests this manifest references.
    ///
    /// Duplicates are kept. For schema2/OCI manifests the config blob comes
    /// first, followed by the layers in document order.
    pub fn layer_digests(&self) -> Result<Vec<String>> {
        let doc: ManifestDocument = serde_json::from_slice(&self.raw)
            .map_err(|e| RegistryError::Manifest(format!("Manifest is not valid JSON: {}", e)))?;

        let manifest_type = match self.manifest_type() {
            ManifestType::Unknown if doc.schema_version == Some(1) => ManifestType::DockerV1Signed,
            other => other,
        };

        if manifest_type.is_index() || doc.manifests.is_some() {
            return Err(RegistryError::Manifest(format!(
                "Manifest lists are not supported ({})",
                self.media_type
            )));
        }

        let digests = if manifest_type == ManifestType::DockerV1Signed {
            let fs_layers = doc.fs_layers.ok_or_else(|| {
                RegistryError::Manifest("Schema1 manifest has no fsLayers".to_string())
            })?;
            fs_layers
                .iter()
                .enumerate()
                .map(|(i, layer)| Self::digest_field(layer, "blobSum", i))
                .collect::<Result<Vec<_>>>()?
        } else {
            let layers = doc.layers.ok_or_else(|| {
                RegistryError::Manifest("Manifest has no layers".to_string())
            })?;
            let mut digests = Vec::with_capacity(layers.len() + 1);
            if let Some(config) = &doc.config {
                digests.push(Self::digest_field(config, "digest", 0).map_err(|_| {
                    RegistryError::Manifest("Manifest config has no valid digest".to_string())
                })?);
            }
            for (i, layer) in layers.iter().enumerate() {
                digests.push(Self::digest_field(layer, "digest", i)?);
            }
            digests
        };

        Ok(digests)
    }

    fn digest_field(entry: &serde_json::Value, field: &str, index: usize) -> Result<String> {
        let digest = entry
            .get(field)
            .and_then(|d| d.as_str())
            .ok_or_else(|| {
                RegistryError::Manifest(format!("Layer {} is missing '{}'", index, field))
            })?;

        DigestUtils::validate_digest(digest)
            .map_err(|e| RegistryError::Manifest(format!("Layer {}: {}", index, e)))?;

        Ok(digest.to_string())
    }
}
