//! Vehicle endpoints.

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tracing::{debug, info};

use super::ApiClient;
use crate::models::vehicle::KmUpdateRequest;
use crate::models::{Maintenance, Vehicle, VehicleRequest};

impl ApiClient {
    /// Vehicles owned by the signed-in user.
    pub async fn vehicles(&self) -> Result<Vec<Vehicle>> {
        let vehicles: Vec<Vehicle> = self
            .get("/api/usuarios/me/vehiculos")
            .await
            .context("Failed to fetch vehicles")?;
        debug!(count = vehicles.len(), "Fetched vehicles");
        Ok(vehicles)
    }

    pub async fn vehicle(&self, id: i64) -> Result<Vehicle> {
        self.get(&format!("/api/vehiculos/{}", id))
            .await
            .with_context(|| format!("Failed to fetch vehicle {}", id))
    }

    pub async fn create_vehicle(&self, request: &VehicleRequest) -> Result<Vehicle> {
        let vehicle: Vehicle = self
            .post("/api/vehiculos", request)
            .await
            .context("Failed to create vehicle")?;
        info!(vehicle_id = vehicle.id, plate = %vehicle.plate, "Vehicle created");
        Ok(vehicle)
    }

    pub async fn update_vehicle(&self, id: i64, request: &VehicleRequest) -> Result<Vehicle> {
        self.put(&format!("/api/vehiculos/{}", id), request)
            .await
            .with_context(|| format!("Failed to update vehicle {}", id))
    }

    /// Record a new odometer reading.
    pub async fn update_vehicle_km(&self, id: i64, current_km: i64) -> Result<Vehicle> {
        self.put(&format!("/api/vehiculos/{}/km", id), &KmUpdateRequest { current_km })
            .await
            .with_context(|| format!("Failed to update km for vehicle {}", id))
    }

    pub async fn delete_vehicle(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/vehiculos/{}", id))
            .await
            .with_context(|| format!("Failed to delete vehicle {}", id))?;
        info!(vehicle_id = id, "Vehicle deleted");
        Ok(())
    }

    /// Maintenance history of several vehicles, fetched concurrently.
    ///
    /// The first failure fails the whole batch.
    pub async fn maintenances_for(&self, vehicles: &[Vehicle]) -> Result<Vec<(i64, Vec<Maintenance>)>> {
        let futures = vehicles
            .iter()
            .map(|v| async move { Ok::<_, anyhow::Error>((v.id, self.maintenances(v.id).await?)) });
        try_join_all(futures).await
    }
}
