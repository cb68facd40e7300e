//! Image sync pipeline
//!
//! [`SyncOrchestrator`] drives one run: destination short-circuit, source
//! manifest fetch, layer extraction, per-blob diff copy through
//! [`BlobDiffCopier`], and manifest publication last.

pub mod copier;
pub mod orchestrator;
pub mod report;

pub use copier::{BlobDiffCopier, BlobOutcome};
pub use orchestrator::{SyncOptions, SyncOrchestrator};
pub use report::{SyncOutcome, SyncReport};
