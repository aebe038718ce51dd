//! Screens of the application and the seam used to move between them.

use std::fmt;

/// A navigable screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    VerifyEmail,
    ForgotPassword,
    ResetPassword,
    /// Landing screen with the dashboard
    Home,
    Vehicles,
    VehicleDetail(i64),
    MaintenanceHistory(i64),
    Profile,
}

impl Route {
    /// Routes that require an authenticated session.
    pub fn is_protected(&self) -> bool {
        !matches!(
            self,
            Route::Login
                | Route::Register
                | Route::VerifyEmail
                | Route::ForgotPassword
                | Route::ResetPassword
        )
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::VerifyEmail => "/verify-email".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::ResetPassword => "/reset-password".to_string(),
            Route::Home => "/inicio".to_string(),
            Route::Vehicles => "/vehicles".to_string(),
            Route::VehicleDetail(id) => format!("/vehicles/{}", id),
            Route::MaintenanceHistory(id) => format!("/vehicles/{}/maintenances", id),
            Route::Profile => "/profile".to_string(),
        }
    }

    /// Resolve a path. The empty path redirects to the login screen.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_matches('/');
        let segments: Vec<&str> = trimmed.split('/').collect();
        match segments.as_slice() {
            [""] | ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["verify-email"] => Some(Route::VerifyEmail),
            ["forgot-password"] => Some(Route::ForgotPassword),
            ["reset-password"] => Some(Route::ResetPassword),
            ["inicio"] => Some(Route::Home),
            ["vehicles"] => Some(Route::Vehicles),
            ["vehicles", id] => id.parse().ok().map(Route::VehicleDetail),
            ["vehicles", id, "maintenances"] => id.parse().ok().map(Route::MaintenanceHistory),
            ["profile"] => Some(Route::Profile),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Moves the user interface to another screen.
pub trait Navigator: Send + Sync {
    /// With `replace_history` the current screen is dropped from history so
    /// the user cannot navigate back to it.
    fn navigate(&self, route: Route, replace_history: bool);
}

/// Navigator for headless use; navigation requests are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: Route, _replace_history: bool) {}
}
