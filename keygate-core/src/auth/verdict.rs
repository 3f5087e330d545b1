//! Authentication verdicts

use super::SCHEME;

/// Who a request was authenticated as
///
/// Carries no claims beyond the scheme that accepted the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    scheme: &'static str,
}

impl Identity {
    /// Identity issued by the API-key scheme
    pub fn api_key() -> Self {
        Self { scheme: SCHEME }
    }

    /// Scheme that authenticated the request
    pub fn scheme(&self) -> &'static str {
        self.scheme
    }
}

/// Why authentication failed
///
/// Only for diagnostics. Every variant leads to the same 401 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("missing header")]
    MissingHeader,

    #[error("malformed header")]
    MalformedHeader,

    #[error("invalid key")]
    InvalidKey,
}

/// Outcome of authenticating one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success(Identity),
    Failure(AuthFailure),
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success(_))
    }

    /// The authenticated identity, if any
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Verdict::Success(identity) => Some(*identity),
            Verdict::Failure(_) => None,
        }
    }

    /// The failure reason, if any
    pub fn failure(&self) -> Option<AuthFailure> {
        match self {
            Verdict::Success(_) => None,
            Verdict::Failure(reason) => Some(*reason),
        }
    }
}

impl From<Result<Identity, AuthFailure>> for Verdict {
    fn from(result: Result<Identity, AuthFailure>) -> Self {
        match result {
            Ok(identity) => Verdict::Success(identity),
            Err(reason) => Verdict::Failure(reason),
        }
    }
}
