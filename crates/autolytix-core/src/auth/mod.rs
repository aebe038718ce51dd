//! Authentication module for managing the local session.
//!
//! This module provides:
//! - `token`: unverified decoding of bearer tokens to check their expiry
//! - `TokenStore`: persistence of the bearer token
//! - `SessionManager`: the stored user, login token capture and logout
//! - `RouteGuard`: session checks before entering protected screens
//! - `Feed`: the replaying publish/subscribe registry behind the current user
//!
//! Tokens are never refreshed. Once expired, or once the backend answers a
//! protected call with 401, the session is torn down and the user must log
//! in again.

pub mod feed;
pub mod guard;
pub mod session;
pub mod token;
pub mod token_store;

pub use feed::{Feed, Subscription};
pub use guard::RouteGuard;
pub use session::{extract_token, SessionManager};
pub use token_store::{TokenStore, TOKEN_KEY, USER_KEY};
