//! Per-request authorization decisions.
//!
//! Every call made by `ApiClient` passes through `RequestAuthorizer` twice:
//! `authorize` before sending and `observe` once a status is known.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::{debug, warn};

use super::ApiError;
use crate::auth::{token, SessionManager};

/// Endpoints reachable without a session. Matched as substrings of the URL.
pub const PUBLIC_ENDPOINTS: [&str; 8] = [
    "/api/usuarios/login",
    "/api/usuarios/register",
    "/api/usuarios/oauth/google",
    "/api/usuarios/verify-email",
    "/api/usuarios/resend-verification",
    "/api/usuarios/password/forgot",
    "/api/usuarios/password/reset",
    "/api/health",
];

/// How an outgoing request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Public endpoint, sent untouched.
    Public,
    /// Protected endpoint but no stored token; the backend decides.
    Anonymous,
    /// Protected endpoint sent with `Authorization: Bearer <token>`.
    Bearer(String),
}

impl Authorization {
    pub fn is_protected(&self) -> bool {
        !matches!(self, Authorization::Public)
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Authorization::Bearer(token) => Some(token),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct RequestAuthorizer {
    session: Arc<SessionManager>,
}

impl RequestAuthorizer {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub fn is_public(url: &str) -> bool {
        PUBLIC_ENDPOINTS.iter().any(|endpoint| url.contains(endpoint))
    }

    /// Decide how to send a request to `url`.
    ///
    /// A stored token that has already expired ends the session and fails
    /// the request with `ApiError::TokenExpired`; nothing must be sent then.
    pub fn authorize(&self, url: &str) -> Result<Authorization, ApiError> {
        if Self::is_public(url) {
            return Ok(Authorization::Public);
        }

        let Some(stored) = self.session.tokens().get_token() else {
            debug!(url, "No token stored, sending unauthenticated");
            return Ok(Authorization::Anonymous);
        };

        if token::is_expired(Some(&stored)) {
            warn!(url, "Token expired before request, logging out");
            self.session.logout();
            return Err(ApiError::TokenExpired);
        }

        Ok(Authorization::Bearer(stored))
    }

    /// React to the status of a sent request. A 401 on a protected endpoint
    /// ends the session, whatever the token looked like locally. Failed
    /// public calls (a wrong password, say) never touch the session.
    pub fn observe(&self, authorization: &Authorization, status: StatusCode) {
        if authorization.is_protected() && status == StatusCode::UNAUTHORIZED {
            warn!("Backend rejected the session (401), logging out");
            self.session.logout();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::tests::token_expiring_in;
    use crate::auth::TOKEN_KEY;
    use crate::navigation::tests::RecordingNavigator;
    use crate::navigation::Route;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn setup(token: Option<String>) -> (RequestAuthorizer, Arc<MemoryStore>, Arc<RecordingNavigator>) {
        let storage = Arc::new(MemoryStore::new());
        if let Some(token) = token {
            storage.set(TOKEN_KEY, &token).unwrap();
        }
        let navigator = Arc::new(RecordingNavigator::default());
        let session = Arc::new(SessionManager::new(storage.clone(), navigator.clone()));
        (RequestAuthorizer::new(session), storage, navigator)
    }

    #[test]
    fn test_public_endpoint_classification() {
        assert!(RequestAuthorizer::is_public("http://localhost:8080/api/usuarios/login"));
        assert!(RequestAuthorizer::is_public("http://h/api/usuarios/verify-email?token=x"));
        assert!(RequestAuthorizer::is_public("http://h/api/health"));
        assert!(!RequestAuthorizer::is_public("http://h/api/usuarios/me"));
        assert!(!RequestAuthorizer::is_public("http://h/api/vehiculos/3"));
        assert!(!RequestAuthorizer::is_public("http://h/api/usuarios/me/password"));
    }

    #[test]
    fn test_public_requests_skip_token() {
        let (authorizer, _, _) = setup(Some(token_expiring_in(-100)));
        // Even an expired token is not consulted for public calls
        let auth = authorizer.authorize("http://h/api/usuarios/login").unwrap();
        assert_eq!(auth, Authorization::Public);
    }

    #[test]
    fn test_protected_without_token_is_anonymous() {
        let (authorizer, _, navigator) = setup(None);
        let auth = authorizer.authorize("http://h/api/vehiculos").unwrap();
        assert_eq!(auth, Authorization::Anonymous);
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn test_protected_with_valid_token_is_bearer() {
        let token = token_expiring_in(3600);
        let (authorizer, _, _) = setup(Some(token.clone()));
        let auth = authorizer.authorize("http://h/api/vehiculos").unwrap();
        assert_eq!(auth.token(), Some(token.as_str()));
    }

    #[test]
    fn test_protected_with_expired_token_fails_and_logs_out() {
        let (authorizer, storage, navigator) = setup(Some(token_expiring_in(-1)));
        let err = authorizer.authorize("http://h/api/vehiculos").unwrap_err();
        assert!(matches!(err, ApiError::TokenExpired));
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(navigator.visits(), vec![(Route::Login, true)]);
    }

    #[test]
    fn test_observe_logs_out_only_for_protected_401() {
        let (authorizer, _, navigator) = setup(None);

        authorizer.observe(&Authorization::Public, StatusCode::UNAUTHORIZED);
        authorizer.observe(&Authorization::Bearer("t".into()), StatusCode::FORBIDDEN);
        authorizer.observe(&Authorization::Bearer("t".into()), StatusCode::OK);
        assert!(navigator.visits().is_empty());

        authorizer.observe(&Authorization::Anonymous, StatusCode::UNAUTHORIZED);
        authorizer.observe(&Authorization::Bearer("t".into()), StatusCode::UNAUTHORIZED);
        assert_eq!(navigator.visits().len(), 2);
    }
}
