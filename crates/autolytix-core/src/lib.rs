//! Autolytix core - session, authorization and API client for the Autolytix
//! vehicle maintenance backend.
//!
//! The pieces are built explicitly and shared through `Arc`:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use autolytix_core::{ApiClient, FileStore, NoopNavigator, SessionManager, RouteGuard};
//! # fn main() -> anyhow::Result<()> {
//! let storage = Arc::new(FileStore::new("/tmp/autolytix/storage.json".into()));
//! let session = Arc::new(SessionManager::new(storage, Arc::new(NoopNavigator)));
//! let _guard = RouteGuard::new(session.clone());
//! let _client = ApiClient::new("http://localhost:8080", session)?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod navigation;
pub mod storage;
pub mod utils;

pub use api::{ApiClient, ApiError, Authorization, RequestAuthorizer};
pub use auth::{RouteGuard, SessionManager, Subscription, TokenStore};
pub use config::{Config, Environment};
pub use navigation::{Navigator, NoopNavigator, Route};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
