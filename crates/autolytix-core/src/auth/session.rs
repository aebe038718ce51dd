use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::feed::{Feed, Subscription};
use super::token_store::{TokenStore, USER_KEY};
use crate::models::{LoginResponse, UserProfile};
use crate::navigation::{Navigator, Route};
use crate::storage::KeyValueStore;

/// Pick the token from a login-style response.
///
/// The body `token` wins when it is not blank; otherwise the
/// `Authorization` header is used with its first `"Bearer "` removed.
pub fn extract_token(body_token: Option<&str>, authorization_header: Option<&str>) -> Option<String> {
    if let Some(token) = body_token.filter(|t| !t.trim().is_empty()) {
        return Some(token.to_string());
    }
    authorization_header
        .map(|h| h.replacen("Bearer ", "", 1))
        .filter(|t| !t.trim().is_empty())
}

/// Owns the local session: the stored user, the stored token and the
/// current-user feed. It is the only writer of either storage entry.
pub struct SessionManager {
    storage: Arc<dyn KeyValueStore>,
    tokens: TokenStore,
    user: Arc<Feed<Option<UserProfile>>>,
    navigator: Arc<dyn Navigator>,
}

impl SessionManager {
    /// Build the session from whatever is persisted.
    ///
    /// A stored user whose token has already expired is logged out at once.
    pub fn new(storage: Arc<dyn KeyValueStore>, navigator: Arc<dyn Navigator>) -> Self {
        let session = Self {
            tokens: TokenStore::new(storage.clone()),
            storage,
            user: Feed::new(None),
            navigator,
        };

        if let Some(saved) = session.load_user_from_storage() {
            if session.tokens.is_token_expired() {
                info!(user_id = saved.id, "Stored session has expired");
                session.logout();
            } else {
                debug!(user_id = saved.id, "Restored stored session");
                session.user.publish(Some(saved));
            }
        }

        session
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub(crate) fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Store the token carried by a login, registration or Google sign-in
    /// response. Returns the token that was stored, if any.
    pub fn store_login_token(
        &self,
        body_token: Option<&str>,
        authorization_header: Option<&str>,
    ) -> Result<Option<String>> {
        let token = extract_token(body_token, authorization_header);
        match &token {
            Some(t) => self.tokens.set_token(t)?,
            None => warn!("Login response carried no token"),
        }
        Ok(token)
    }

    /// Save the user described by a login response and publish it.
    pub fn save_user(&self, response: &LoginResponse) -> Result<UserProfile> {
        let profile = UserProfile::from(response);
        self.set_user(profile.clone())?;
        Ok(profile)
    }

    /// Persist `profile` and publish it to subscribers.
    pub fn set_user(&self, profile: UserProfile) -> Result<()> {
        let json = serde_json::to_string(&profile).context("Failed to serialize user")?;
        self.storage
            .set(USER_KEY, &json)
            .context("Failed to store user")?;
        info!(user_id = profile.id, "User session saved");
        self.user.publish(Some(profile));
        Ok(())
    }

    /// The current user: the published value, else whatever is stored.
    pub fn user(&self) -> Option<UserProfile> {
        self.user.get().or_else(|| self.load_user_from_storage())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user().map(|u| u.id)
    }

    /// A user is present and the token is present and not expired.
    pub fn is_authenticated(&self) -> bool {
        self.user().is_some() && self.tokens.has_valid_token()
    }

    /// Watch the current user. `callback` runs immediately with the current
    /// value and again after every change until the handle is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription<Option<UserProfile>>
    where
        F: Fn(&Option<UserProfile>) + Send + Sync + 'static,
    {
        self.user.subscribe(callback)
    }

    /// Tear the session down completely and go to the login screen.
    ///
    /// Every step runs even if an earlier storage operation fails, so the
    /// session never ends up half cleared.
    pub fn logout(&self) {
        info!("Logging out");
        if let Err(e) = self.storage.remove(USER_KEY) {
            warn!(error = %e, "Failed to remove stored user");
        }
        if let Err(e) = self.tokens.clear_token() {
            warn!(error = %e, "Failed to remove stored token");
        }
        self.user.publish(None);
        self.navigator.navigate(Route::Login, true);
    }

    fn load_user_from_storage(&self) -> Option<UserProfile> {
        let json = match self.storage.get(USER_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored user");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable stored user");
                None
            }
        }
    }
}
