//! API-key authentication
//!
//! [`ApiKeyAuthenticator`] turns the `Authorization` header of a request
//! into a [`Verdict`]. It never builds HTTP responses; that is the job of
//! the gate in `keygate-api`.

mod api_key;
mod verdict;

pub use api_key::ApiKeyAuthenticator;
pub use verdict::{AuthFailure, Identity, Verdict};

/// Name of the API-key authentication scheme
pub const SCHEME: &str = "ApiKey";
