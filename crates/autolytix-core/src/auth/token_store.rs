use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::token;
use crate::storage::KeyValueStore;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "autolytix_token";

/// Storage key for the JSON user profile.
pub const USER_KEY: &str = "autolytix_user";

/// Persists the bearer token in local key-value storage.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// The stored token, if any. Read failures are logged and reported as
    /// absence.
    pub fn get_token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read token from storage");
                None
            }
        }
    }

    /// Store a token, replacing any previous one. Blank tokens are ignored.
    pub fn set_token(&self, token: &str) -> Result<()> {
        if token.trim().is_empty() {
            debug!("Ignoring blank token");
            return Ok(());
        }
        self.storage
            .set(TOKEN_KEY, token)
            .context("Failed to store token")
    }

    pub fn clear_token(&self) -> Result<()> {
        self.storage
            .remove(TOKEN_KEY)
            .context("Failed to clear token")
    }

    /// True when there is no usable token.
    pub fn is_token_expired(&self) -> bool {
        token::is_expired(self.get_token().as_deref())
    }

    pub fn has_valid_token(&self) -> bool {
        !self.is_token_expired()
    }
}
