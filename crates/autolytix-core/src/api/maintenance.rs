//! Maintenance record endpoints under `/api/mantenimientos`.

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::ApiClient;
use crate::models::{Maintenance, MaintenanceRequest};

impl ApiClient {
    /// Maintenance history of one vehicle, in backend order.
    pub async fn maintenances(&self, vehicle_id: i64) -> Result<Vec<Maintenance>> {
        let records: Vec<Maintenance> = self
            .get(&format!("/api/mantenimientos/vehiculo/{}", vehicle_id))
            .await
            .with_context(|| format!("Failed to fetch maintenance for vehicle {}", vehicle_id))?;
        debug!(vehicle_id, count = records.len(), "Fetched maintenance history");
        Ok(records)
    }

    pub async fn create_maintenance(&self, request: &MaintenanceRequest) -> Result<Maintenance> {
        let record: Maintenance = self
            .post("/api/mantenimientos", request)
            .await
            .context("Failed to create maintenance record")?;
        info!(maintenance_id = record.id, vehicle_id = record.vehicle_id, "Maintenance recorded");
        Ok(record)
    }

    pub async fn update_maintenance(&self, id: i64, request: &MaintenanceRequest) -> Result<Maintenance> {
        self.put(&format!("/api/mantenimientos/{}", id), request)
            .await
            .with_context(|| format!("Failed to update maintenance record {}", id))
    }

    pub async fn delete_maintenance(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/mantenimientos/{}", id))
            .await
            .with_context(|| format!("Failed to delete maintenance record {}", id))
    }
}
