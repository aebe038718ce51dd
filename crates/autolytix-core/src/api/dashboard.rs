use anyhow::{Context, Result};
use tracing::debug;

use super::ApiClient;
use crate::models::{DashboardQuery, DashboardResponse};

impl ApiClient {
    /// Stats, alerts and recent activity in one call.
    pub async fn dashboard(&self, query: DashboardQuery) -> Result<DashboardResponse> {
        let dashboard: DashboardResponse = self
            .get_with_query("/api/usuarios/me/dashboard", &query.params())
            .await
            .context("Failed to fetch dashboard")?;
        debug!(
            alerts = dashboard.alerts.len(),
            activity = dashboard.activity.len(),
            "Fetched dashboard"
        );
        Ok(dashboard)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::api::client::tests::{harness, StubResponse, StubServer};
    use crate::auth::token::tests::token_expiring_in;
    use crate::models::DashboardQuery;

    fn empty_dashboard() -> serde_json::Value {
        json!({
            "stats": {"totalVehicles": 0, "activeAlerts": 0, "nextMaintenance": null, "lastKmUpdate": null},
            "alerts": [],
            "activity": []
        })
    }

    #[tokio::test]
    async fn test_default_query_sends_no_params() {
        let server = StubServer::start(vec![StubResponse::json(200, empty_dashboard())]).await;
        let h = harness(&server.base_url, Some(token_expiring_in(3600)));

        let dashboard = h.client.dashboard(DashboardQuery::default()).await.unwrap();
        assert_eq!(dashboard.stats.total_vehicles, 0);
        assert_eq!(server.requests()[0].target, "/api/usuarios/me/dashboard");
    }

    #[tokio::test]
    async fn test_custom_limits_are_sent() {
        let server = StubServer::start(vec![StubResponse::json(200, empty_dashboard())]).await;
        let h = harness(&server.base_url, Some(token_expiring_in(3600)));

        let query = DashboardQuery {
            limit_alerts: 10,
            limit_activity: 3,
        };
        h.client.dashboard(query).await.unwrap();
        assert_eq!(
            server.requests()[0].target,
            "/api/usuarios/me/dashboard?limitAlerts=10&limitActivity=3"
        );
    }
}
