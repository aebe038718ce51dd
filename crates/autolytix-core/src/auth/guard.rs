use std::sync::Arc;

use tracing::debug;

use super::session::SessionManager;
use crate::navigation::Route;

/// Decides whether a screen may be entered.
#[derive(Clone)]
pub struct RouteGuard {
    session: Arc<SessionManager>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Public routes always pass. Protected routes need a live session: an
    /// expired token logs the user out, a missing session redirects to login.
    pub fn can_activate(&self, route: Route) -> bool {
        if !route.is_protected() {
            return true;
        }

        if self.session.tokens().is_token_expired() {
            debug!(%route, "Token expired, denying route");
            self.session.logout();
            return false;
        }

        if self.session.is_authenticated() {
            true
        } else {
            debug!(%route, "Not authenticated, redirecting to login");
            self.session.navigator().navigate(Route::Login, false);
            false
        }
    }
}
