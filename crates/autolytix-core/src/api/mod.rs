//! REST API client module for the Autolytix backend.
//!
//! This module provides the `ApiClient` for the account, vehicle,
//! maintenance and dashboard endpoints, and the `RequestAuthorizer` that
//! every request passes through.
//!
//! The backend uses JWT bearer tokens handed out by the login, register
//! and Google sign-in endpoints. Tokens are never refreshed.

pub mod authorizer;
pub mod client;
mod dashboard;
pub mod error;
mod maintenance;
pub mod messages;
mod users;
mod vehicles;

pub use authorizer::{Authorization, RequestAuthorizer, PUBLIC_ENDPOINTS};
pub use client::ApiClient;
pub use error::ApiError;
pub use messages::user_message;
