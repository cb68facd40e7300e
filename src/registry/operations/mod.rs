//! Registry operations module - Internal modular organization
//!
//! Blob and manifest endpoints of the registry API, shared by
//! [`RegistryClient`](crate::registry::RegistryClient).

pub mod blob_operations;
pub mod manifest_operations;

pub use blob_operations::BlobOperations;
pub use manifest_operations::ManifestOperations;
