//! Per-blob diff copy
//!
//! For one digest: `NotChecked -> Present` when the destination already has
//! it, otherwise `Downloading -> Uploading -> Transferred`. A failed transfer
//! is terminal and aborts the run; nothing is retried here.

use crate::error::SyncError;
use crate::image::DigestUtils;
use crate::logging::Logger;
use crate::registry::RegistryTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobOutcome {
    /// Destination already had the blob
    Present,
    /// Blob was downloaded from the source and uploaded to the destination
    Transferred { bytes: u64 },
    /// Blob is missing but the run is a dry run
    Missing,
}

pub struct BlobDiffCopier<'a> {
    source: &'a dyn RegistryTransport,
    destination: &'a dyn RegistryTransport,
    output: Logger,
    dry_run: bool,
}

impl<'a> BlobDiffCopier<'a> {
    pub fn new(
        source: &'a dyn RegistryTransport,
        destination: &'a dyn RegistryTransport,
        output: Logger,
    ) -> Self {
        Self {
            source,
            destination,
            output,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Make sure `digest` exists in the destination repository.
    ///
    /// An existence check that fails is treated as "absent".
    pub async fn ensure_blob(
        &self,
        repository: &str,
        digest: &str,
    ) -> Result<BlobOutcome, SyncError> {
        let short = DigestUtils::format_digest_short(digest);

        let present = match self.destination.has_blob(repository, digest).await {
            Ok(present) => present,
            Err(e) => {
                self.output.warning(&format!(
                    "Could not check blob {} on destination, copying it: {}",
                    short, e
                ));
                false
            }
        };

        if present {
            self.output.detail(&format!("Blob {} already present", short));
            return Ok(BlobOutcome::Present);
        }

        if self.dry_run {
            self.output.step(&format!("Would copy blob {}", short));
            return Ok(BlobOutcome::Missing);
        }

        self.output.step(&format!("Copying blob {}", short));

        let data = self
            .source
            .download_blob(repository, digest)
            .await
            .map_err(|source| SyncError::Download {
                digest: digest.to_string(),
                source,
            })?;
        let bytes = data.len() as u64;

        self.destination
            .upload_blob(repository, digest, data)
            .await
            .map_err(|source| SyncError::Upload {
                digest: digest.to_string(),
                source,
            })?;

        self.output.detail(&format!(
            "Blob {} copied ({})",
            short,
            self.output.format_size(bytes)
        ));

        Ok(BlobOutcome::Transferred { bytes })
    }
}
