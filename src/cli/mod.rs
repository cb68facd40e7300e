//! Command line interface module
//!
//! This module provides argument parsing, endpoint configuration and the
//! runner that builds registry clients and drives one sync.

pub mod args;
pub mod config;
pub mod runner;

pub use args::Args;
pub use config::{AuthConfig, RegistryEndpoint};
pub use runner::Runner;
