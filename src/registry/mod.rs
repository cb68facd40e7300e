//! Registry module for Docker registry interactions
//!
//! This module provides the [`RegistryTransport`] capability interface and its
//! HTTP implementation [`RegistryClient`], including challenge-based
//! authentication and per-scope token caching.

pub mod auth;
pub mod client;
pub mod operations;
pub mod token_manager;
pub mod transport;

pub use crate::cli::config::{AuthConfig, RegistryEndpoint};
pub use auth::{Auth, AuthChallenge};
pub use client::{RegistryClient, RegistryClientBuilder};
pub use token_manager::TokenManager;
pub use transport::RegistryTransport;
