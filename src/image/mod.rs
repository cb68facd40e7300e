//! Image identity and manifest handling
//!
//! This module provides [`ImageReference`] for naming the manifest being synced,
//! [`Manifest`] for carrying the exact document a registry served and extracting
//! the blob digests it references, and [`DigestUtils`] for content addresses.

pub mod digest;
pub mod manifest;
pub mod reference;

pub use digest::DigestUtils;
pub use manifest::{Manifest, ManifestType};
pub use reference::{DEFAULT_TAG, ImageReference};
