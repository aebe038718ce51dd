//! Dashboard aggregate returned by `/api/usuarios/me/dashboard`.

use serde::{Deserialize, Serialize};

/// Limit the backend applies when a query parameter is omitted.
pub const DEFAULT_DASHBOARD_LIMIT: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    #[serde(default)]
    pub alerts: Vec<DashboardAlert>,
    #[serde(default)]
    pub activity: Vec<DashboardActivity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_vehicles: i64,
    pub active_alerts: i64,
    pub next_maintenance: Option<NextMaintenance>,
    pub last_km_update: Option<LastKmUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceStatus {
    Ok,
    Warning,
    Overdue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextMaintenance {
    pub km_remaining: Option<i64>,
    pub days_remaining: Option<i64>,
    pub vehicle_id: i64,
    pub vehicle_label: String,
    pub maintenance_type: Option<String>,
    pub message: Option<String>,
    pub status: MaintenanceStatus,
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastKmUpdate {
    pub days_ago: i64,
    pub vehicle_id: i64,
    pub vehicle_label: String,
    pub current_km: i64,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Danger,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAlert {
    pub id: i64,
    pub vehicle_id: i64,
    pub vehicle_label: String,
    pub maintenance_id: Option<i64>,
    pub maintenance_type: Option<String>,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub overdue_km: Option<i64>,
    pub overdue_days: Option<i64>,
    pub due_km: Option<i64>,
    pub current_km: Option<i64>,
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Mileage,
    Maintenance,
    Vehicle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardActivity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub vehicle_id: i64,
    pub vehicle_label: String,
    pub description: String,
    pub timestamp: String,
    pub time_ago: Option<String>,
    /// Kilometers, for mileage entries
    #[serde(default)]
    pub value: Option<i64>,
    #[serde(default)]
    pub maintenance_type: Option<String>,
}

/// Query for the dashboard endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardQuery {
    pub limit_alerts: u32,
    pub limit_activity: u32,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            limit_alerts: DEFAULT_DASHBOARD_LIMIT,
            limit_activity: DEFAULT_DASHBOARD_LIMIT,
        }
    }
}

impl DashboardQuery {
    /// Query parameters to send. Limits equal to the default are omitted.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if self.limit_alerts != DEFAULT_DASHBOARD_LIMIT {
            params.push(("limitAlerts", self.limit_alerts.to_string()));
        }
        if self.limit_activity != DEFAULT_DASHBOARD_LIMIT {
            params.push(("limitActivity", self.limit_activity.to_string()));
        }
        params
    }
}
