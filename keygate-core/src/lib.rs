//! Keygate Core Library
//!
//! This crate provides the core functionality for the Keygate service:
//! configuration management, error handling and static API-key
//! authentication.

pub mod auth;
pub mod config;
pub mod error;

pub use auth::{ApiKeyAuthenticator, AuthFailure, Identity, Verdict};
pub use error::{Error, Result};

/// Keygate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
