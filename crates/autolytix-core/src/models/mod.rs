//! Data models for Autolytix entities.
//!
//! This module contains the wire and domain types exchanged with the
//! backend:
//!
//! - `UserProfile`, `LoginResponse` and the account request payloads
//! - `Vehicle`, `VehicleRequest`: the user's garage
//! - `Maintenance`, `MaintenanceRequest`, `MaintenanceType`: service history
//! - `DashboardResponse` and its stats/alerts/activity parts

pub mod dashboard;
pub mod maintenance;
pub mod user;
pub mod vehicle;

pub use dashboard::{
    ActivityKind, AlertKind, AlertPriority, DashboardActivity, DashboardAlert, DashboardQuery,
    DashboardResponse, DashboardStats, LastKmUpdate, MaintenanceStatus, NextMaintenance,
};
pub use maintenance::{
    overdue_alert, sort_newest_first, type_label, Maintenance, MaintenanceRequest,
    MaintenanceType, OverdueAlert,
};
pub use user::{
    ApiMessage, GoogleLoginRequest, LoginRequest, LoginResponse, PasswordUpdateRequest,
    ProfileUpdateRequest, RegisterRequest, UserProfile,
};
pub use vehicle::{Vehicle, VehicleRequest};
