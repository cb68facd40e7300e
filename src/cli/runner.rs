//! Runner wiring arguments, registry clients and the sync pipeline

use crate::cli::args::Args;
use crate::cli::config::RegistryEndpoint;
use crate::error::SyncError;
use crate::logging::Logger;
use crate::registry::RegistryClient;
use crate::sync::{SyncOptions, SyncOrchestrator, SyncReport};

pub struct Runner {
    args: Args,
    output: Logger,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        let output = if args.quiet {
            Logger::new_quiet()
        } else {
            Logger::new(args.verbose)
        };

        Self { args, output }
    }

    pub fn output(&self) -> &Logger {
        &self.output
    }

    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        self.output.section("Registry Sync");

        let image = self.args.image_reference().map_err(SyncError::Config)?;
        let source_endpoint = self.args.source_endpoint().map_err(SyncError::Config)?;
        let destination_endpoint = self.args.destination_endpoint().map_err(SyncError::Config)?;

        self.output.info(&format!("Image: {}", image));
        self.output.info(&format!("Source: {}", source_endpoint.address));
        self.output.info(&format!("Destination: {}", destination_endpoint.address));
        if self.args.dry_run {
            self.output.info("Dry run mode - the destination will not be modified");
        }

        let endpoints = [("Source", &source_endpoint), ("Destination", &destination_endpoint)];
        for (role, endpoint) in endpoints {
            if let Some(problem) = endpoint.auth.incomplete() {
                self.output.warning(&format!("{} credentials: {}", role, problem));
            }
        }

        let destination = self.client(destination_endpoint)?;
        let source = self.client(source_endpoint)?;

        let options = SyncOptions {
            force: self.args.force,
            dry_run: self.args.dry_run,
        };

        let report = SyncOrchestrator::new(&source, &destination, self.output.clone())
            .with_options(options)
            .run(&image)
            .await?;

        report.print(&self.output);
        Ok(report)
    }

    fn client(&self, endpoint: RegistryEndpoint) -> Result<RegistryClient, SyncError> {
        let registry = endpoint.address.clone();
        RegistryClient::builder(endpoint, self.output.clone())
            .build()
            .map_err(|source| SyncError::ClientSetup { registry, source })
    }
}
