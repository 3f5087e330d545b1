//! Authorization gate
//!
//! Consumes an authentication verdict and decides whether a route handler
//! may run.

use http::StatusCode;
use keygate_core::Verdict;

/// Access policy attached to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// No authentication required
    Public,
    /// Requires a request authenticated by the named scheme
    Authenticated { scheme: &'static str },
}

impl Policy {
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Policy::Public)
    }
}

/// Gate decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// No valid credentials (401)
    Unauthenticated,
    /// Authenticated, but not by the scheme the route requires (403)
    Forbidden,
}

impl Access {
    /// Status code to reply with when access is refused
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Access::Allow => None,
            Access::Unauthenticated => Some(StatusCode::UNAUTHORIZED),
            Access::Forbidden => Some(StatusCode::FORBIDDEN),
        }
    }
}

/// Decide access for a route.
///
/// `verdict` is `None` when the request was not authenticated at all,
/// which only happens for public routes.
pub fn authorize(policy: Policy, verdict: Option<&Verdict>) -> Access {
    let Policy::Authenticated { scheme } = policy else {
        return Access::Allow;
    };

    match verdict.and_then(Verdict::identity) {
        None => Access::Unauthenticated,
        Some(identity) if identity.scheme() == scheme => Access::Allow,
        Some(identity) => {
            tracing::debug!(
                "Identity from {} does not satisfy a route requiring {}",
                identity.scheme(),
                scheme
            );
            Access::Forbidden
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keygate_core::auth::SCHEME;
    use keygate_core::{AuthFailure, Identity};

    const PROTECTED: Policy = Policy::Authenticated { scheme: SCHEME };

    #[test]
    fn test_public_always_allowed() {
        assert_eq!(authorize(Policy::Public, None), Access::Allow);
        let denied = Verdict::Failure(AuthFailure::MissingHeader);
        assert_eq!(authorize(Policy::Public, Some(&denied)), Access::Allow);
    }

    #[test]
    fn test_protected_requires_success() {
        let ok = Verdict::Success(Identity::api_key());
        assert_eq!(authorize(PROTECTED, Some(&ok)), Access::Allow);
        assert_eq!(authorize(PROTECTED, None), Access::Unauthenticated);
    }

    #[test]
    fn test_every_failure_is_unauthenticated() {
        for reason in [
            AuthFailure::MissingHeader,
            AuthFailure::MalformedHeader,
            AuthFailure::InvalidKey,
        ] {
            let verdict = Verdict::Failure(reason);
            let access = authorize(PROTECTED, Some(&verdict));
            assert_eq!(access, Access::Unauthenticated);
            assert_eq!(access.status(), Some(StatusCode::UNAUTHORIZED));
        }
    }

    #[test]
    fn test_other_scheme_is_forbidden() {
        let policy = Policy::Authenticated { scheme: "Jwt" };
        let ok = Verdict::Success(Identity::api_key());
        let access = authorize(policy, Some(&ok));
        assert_eq!(access, Access::Forbidden);
        assert_eq!(access.status(), Some(StatusCode::FORBIDDEN));
    }

    #[test]
    fn test_requires_auth() {
        assert!(!Policy::Public.requires_auth());
        assert!(PROTECTED.requires_auth());
    }
}
