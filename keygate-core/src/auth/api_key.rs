//! Static API key authentication

use http::header::{AUTHORIZATION, HeaderMap};

use super::{AuthFailure, Identity, Verdict};
use crate::config::AuthConfig;
use crate::error::{Error, Result};

/// Checks `Authorization: <Scheme> <Token>` against one configured key
///
/// The scheme token is only a delimiter; any non-empty scheme is accepted.
/// The comparison is exact and case-sensitive.
#[derive(Clone)]
pub struct ApiKeyAuthenticator {
    key: String,
}

impl std::fmt::Debug for ApiKeyAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuthenticator").finish_non_exhaustive()
    }
}

impl ApiKeyAuthenticator {
    /// Create an authenticator for the given key
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Create an authenticator from the `auth` config section
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        config
            .api_key
            .as_deref()
            .map(Self::new)
            .ok_or_else(|| Error::Config("auth.api_key is not set".to_string()))
    }

    /// Authenticate a request from its headers
    pub fn authenticate(&self, headers: &HeaderMap) -> Verdict {
        let verdict = Verdict::from(self.check(headers));
        match verdict {
            Verdict::Success(identity) => {
                tracing::debug!("{} authenticated the request", identity.scheme());
            }
            Verdict::Failure(reason) => {
                tracing::info!("ApiKey was not authenticated: {}", reason);
            }
        }
        verdict
    }

    fn check(&self, headers: &HeaderMap) -> std::result::Result<Identity, AuthFailure> {
        let raw = headers.get(AUTHORIZATION).ok_or(AuthFailure::MissingHeader)?;
        let value = raw.to_str().map_err(|_| AuthFailure::MalformedHeader)?;
        let token = parse_credential(value).ok_or(AuthFailure::MalformedHeader)?;

        if token == self.key {
            Ok(Identity::api_key())
        } else {
            Err(AuthFailure::InvalidKey)
        }
    }
}

/// Split `<Scheme> <Token>` at the first space and return the token.
///
/// The token may be empty; the scheme may not.
fn parse_credential(value: &str) -> Option<&str> {
    match value.split_once(' ') {
        Some((scheme, token)) if !scheme.is_empty() => Some(token),
        _ => None,
    }
}
