//! Registry Sync Library
//!
//! Replicates one tagged image from a source registry to a destination
//! registry, copying only the blobs the destination is missing and publishing
//! the manifest last.

pub mod cli;
pub mod error;
pub mod image;
pub mod logging;
pub mod registry;
pub mod sync;

pub use error::{RegistryError, Result, SyncError};
pub use image::{ImageReference, Manifest};
pub use logging::Logger;
pub use registry::{RegistryClient, RegistryTransport};
pub use sync::{SyncOptions, SyncOrchestrator, SyncReport};
