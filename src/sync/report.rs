use crate::logging::Logger;
use crate::sync::copier::BlobOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Destination already served the manifest; nothing was done
    AlreadySynced,
    /// Missing blobs were copied and the manifest published
    Synced,
    /// Everything was checked, nothing was written
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub manifest_digest: Option<String>,
    pub blobs_checked: usize,
    pub blobs_present: usize,
    pub blobs_transferred: usize,
    pub blobs_missing: usize,
    pub bytes_transferred: u64,
}

impl SyncReport {
    pub fn new(outcome: SyncOutcome) -> Self {
        Self {
            outcome,
            manifest_digest: None,
            blobs_checked: 0,
            blobs_present: 0,
            blobs_transferred: 0,
            blobs_missing: 0,
            bytes_transferred: 0,
        }
    }

    pub fn record(&mut self, outcome: BlobOutcome) {
        self.blobs_checked += 1;
        match outcome {
            BlobOutcome::Present => self.blobs_present += 1,
            BlobOutcome::Transferred { bytes } => {
                self.blobs_transferred += 1;
                self.bytes_transferred += bytes;
            }
            BlobOutcome::Missing => self.blobs_missing += 1,
        }
    }

    pub fn print(&self, output: &Logger) {
        let outcome = match self.outcome {
            SyncOutcome::AlreadySynced => "already synced",
            SyncOutcome::Synced => "synced",
            SyncOutcome::DryRun => "dry run",
        };

        let mut items = vec![("Outcome", outcome.to_string())];
        if let Some(digest) = &self.manifest_digest {
            items.push(("Manifest digest", digest.clone()));
        }
        if self.outcome != SyncOutcome::AlreadySynced {
            items.push(("Blobs checked", self.blobs_checked.to_string()));
            items.push(("Blobs already present", self.blobs_present.to_string()));
            if self.outcome == SyncOutcome::DryRun {
                items.push(("Blobs to copy", self.blobs_missing.to_string()));
            } else {
                items.push(("Blobs copied", self.blobs_transferred.to_string()));
                items.push(("Data copied", output.format_size(self.bytes_transferred)));
            }
        }
        items.push(("Elapsed", output.format_duration(output.elapsed())));

        output.summary_kv("Sync Summary", &items);
    }
}
