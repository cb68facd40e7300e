//! End-to-end sync of one tagged image between two registries
//!
//! Order matters: blobs are copied before the manifest is published, so a
//! manifest on the destination means its blobs landed too. That is what makes
//! the opening short-circuit safe for uninterrupted runs.

use crate::error::SyncError;
use crate::image::{DigestUtils, ImageReference};
use crate::logging::Logger;
use crate::registry::RegistryTransport;
use crate::sync::copier::BlobDiffCopier;
use crate::sync::report::{SyncOutcome, SyncReport};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Skip the "destination already has the manifest" short-circuit
    pub force: bool,
    /// Read everything, write nothing
    pub dry_run: bool,
}

pub struct SyncOrchestrator<'a> {
    source: &'a dyn RegistryTransport,
    destination: &'a dyn RegistryTransport,
    output: Logger,
    options: SyncOptions,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(
        source: &'a dyn RegistryTransport,
        destination: &'a dyn RegistryTransport,
        output: Logger,
    ) -> Self {
        Self {
            source,
            destination,
            output,
            options: SyncOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn run(&self, image: &ImageReference) -> Result<SyncReport, SyncError> {
        let repository = image.repository();
        let tag = image.tag();

        if self.options.force {
            self.output.info("Force mode - not checking destination for an existing manifest");
        } else {
            match self.destination.fetch_manifest(repository, tag).await {
                Ok(existing) => {
                    self.output.success(&format!("{} already present on destination", image));
                    let mut report = SyncReport::new(SyncOutcome::AlreadySynced);
                    report.manifest_digest = Some(existing.digest());
                    return Ok(report);
                }
                Err(e) => {
                    self.output.detail(&format!("{} not available on destination: {}", image, e));
                }
            }
        }

        let manifest = self
            .source
            .fetch_manifest(repository, tag)
            .await
            .map_err(|source| SyncError::SourceManifest {
                reference: image.to_string(),
                source,
            })?;

        let digests = manifest
            .layer_digests()
            .map_err(|source| SyncError::ManifestStructure {
                reference: image.to_string(),
                source,
            })?;

        self.output.info(&format!(
            "Source manifest {} ({}) references {} blobs",
            DigestUtils::format_digest_short(&manifest.digest()),
            manifest.media_type(),
            digests.len()
        ));

        let outcome = if self.options.dry_run {
            SyncOutcome::DryRun
        } else {
            SyncOutcome::Synced
        };
        let mut report = SyncReport::new(outcome);
        report.manifest_digest = Some(manifest.digest());

        let copier = BlobDiffCopier::new(self.source, self.destination, self.output.clone())
            .with_dry_run(self.options.dry_run);

        for digest in &digests {
            let blob_outcome = copier.ensure_blob(repository, digest).await?;
            report.record(blob_outcome);
        }

        if self.options.dry_run {
            self.output.info(&format!(
                "Dry run - {} of {} blobs would be copied, manifest not published",
                report.blobs_missing,
                digests.len()
            ));
            return Ok(report);
        }

        self.destination
            .put_manifest(repository, tag, &manifest)
            .await
            .map_err(|source| SyncError::Publish {
                reference: image.to_string(),
                source,
            })?;

        self.output.success(&format!("Published {} to destination", image));
        Ok(report)
    }
}
