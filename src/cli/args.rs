//! Command-line argument parsing

use crate::cli::config::{AuthConfig, RegistryEndpoint};
use crate::error::Result;
use crate::image::{DEFAULT_TAG, ImageReference};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "registry-sync")]
#[command(
    about = "Sync a tagged image from one Docker registry to another, copying only missing blobs"
)]
#[command(version)]
pub struct Args {
    /// The URL of the source Docker registry (mandatory)
    #[arg(long = "source", short = 's')]
    pub source: Option<String>,

    /// The username for the source Docker registry
    #[arg(long = "source-user")]
    pub source_user: Option<String>,

    /// The password for the source Docker registry
    #[arg(long = "source-pass")]
    pub source_pass: Option<String>,

    /// The URL of the destination Docker registry (mandatory)
    #[arg(long = "destination", short = 'd')]
    pub destination: Option<String>,

    /// The username for the destination Docker registry
    #[arg(long = "destination-user")]
    pub destination_user: Option<String>,

    /// The password for the destination Docker registry
    #[arg(long = "destination-pass")]
    pub destination_pass: Option<String>,

    /// The name of the image to sync from the source to the destination (mandatory)
    #[arg(long = "image", short = 'i')]
    pub image: Option<String>,

    /// The tag that should be synced
    #[arg(long = "tag", short = 't', default_value = DEFAULT_TAG)]
    pub tag: String,

    /// Skip TLS certificate verification
    #[arg(long = "skip-tls", short = 'k')]
    pub skip_tls: bool,

    /// Timeout for each registry request in seconds
    #[arg(long = "timeout", default_value = "3600")]
    pub timeout: u64,

    /// Copy blobs and publish the manifest even if the destination already has the tag
    #[arg(long = "force")]
    pub force: bool,

    /// Check what would be copied without writing to the destination
    #[arg(long = "dry-run", short = 'n')]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long = "verbose", short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(long = "quiet", short = 'q')]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Source, destination, image and tag are all needed to run
    pub fn missing_required(&self) -> bool {
        let blank = |value: &Option<String>| value.as_deref().is_none_or(|v| v.trim().is_empty());
        blank(&self.source) || blank(&self.destination) || blank(&self.image) || self.tag.is_empty()
    }

    pub fn print_usage() {
        println!("For help:");
        println!("  registry-sync -h");
    }

    /// Fill credentials and verbosity from environment variables when not
    /// given on the command line
    pub fn from_env(mut self) -> Self {
        fn fill(slot: &mut Option<String>, var: &str) {
            if slot.is_none() {
                *slot = std::env::var(var).ok();
            }
        }

        fill(&mut self.source_user, "REGISTRY_SYNC_SOURCE_USER");
        fill(&mut self.source_pass, "REGISTRY_SYNC_SOURCE_PASS");
        fill(&mut self.destination_user, "REGISTRY_SYNC_DESTINATION_USER");
        fill(&mut self.destination_pass, "REGISTRY_SYNC_DESTINATION_PASS");

        let verbose_env = std::env::var("REGISTRY_SYNC_VERBOSE")
            .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
        if !self.quiet && verbose_env {
            self.verbose = true;
        }

        self
    }

    fn endpoint(
        &self,
        address: Option<&str>,
        username: &Option<String>,
        password: &Option<String>,
    ) -> Result<RegistryEndpoint> {
        let auth = AuthConfig::new(
            username.clone().unwrap_or_default(),
            password.clone().unwrap_or_default(),
        );
        let endpoint = RegistryEndpoint::new(address.unwrap_or_default())?
            .with_auth(auth)
            .with_skip_tls(self.skip_tls)
            .with_timeout(self.timeout);
        endpoint.validate()?;
        Ok(endpoint)
    }

    pub fn source_endpoint(&self) -> Result<RegistryEndpoint> {
        self.endpoint(self.source.as_deref(), &self.source_user, &self.source_pass)
    }

    pub fn destination_endpoint(&self) -> Result<RegistryEndpoint> {
        self.endpoint(
            self.destination.as_deref(),
            &self.destination_user,
            &self.destination_pass,
        )
    }

    pub fn image_reference(&self) -> Result<ImageReference> {
        ImageReference::new(self.image.clone().unwrap_or_default(), Some(&self.tag))
    }
}
