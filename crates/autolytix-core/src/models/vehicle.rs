use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    #[serde(rename = "matricula")]
    pub plate: String,
    #[serde(rename = "marca")]
    pub make: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "anio")]
    pub year: i32,
    #[serde(rename = "kmActuales")]
    pub current_km: i64,
    #[serde(rename = "usuarioId")]
    pub user_id: i64,
    #[serde(rename = "fechaActualizacionKm", default)]
    pub km_updated_at: Option<String>,
}

impl Vehicle {
    /// "Make Model" as shown in lists.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model).trim().to_string()
    }

    /// "Make Model (PLATE)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_name(), self.plate)
    }
}

/// Payload for creating or fully updating a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRequest {
    #[serde(rename = "matricula")]
    pub plate: String,
    #[serde(rename = "marca")]
    pub make: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "anio")]
    pub year: i32,
    #[serde(rename = "kmActuales")]
    pub current_km: i64,
}

impl From<&Vehicle> for VehicleRequest {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            plate: vehicle.plate.clone(),
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            current_km: vehicle.current_km,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct KmUpdateRequest {
    #[serde(rename = "kmActuales")]
    pub current_km: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vehicle_response() {
        let json = r#"{"id": 12, "matricula": "1234ABC", "marca": "Seat", "modelo": "Ibiza", "anio": 2018, "kmActuales": 85000, "usuarioId": 4, "fechaActualizacionKm": null}"#;
        let vehicle: Vehicle = serde_json::from_str(json).unwrap();
        assert_eq!(vehicle.plate, "1234ABC");
        assert_eq!(vehicle.current_km, 85000);
        assert_eq!(vehicle.km_updated_at, None);
        assert_eq!(vehicle.label(), "Seat Ibiza (1234ABC)");
    }

    #[test]
    fn test_request_from_vehicle_uses_wire_names() {
        let vehicle = Vehicle {
            id: 1,
            plate: "0000XYZ".to_string(),
            make: "Renault".to_string(),
            model: "Clio".to_string(),
            year: 2020,
            current_km: 1000,
            user_id: 2,
            km_updated_at: Some("2024-05-01T10:00:00".to_string()),
        };
        let value = serde_json::to_value(VehicleRequest::from(&vehicle)).unwrap();
        assert_eq!(value["matricula"], "0000XYZ");
        assert_eq!(value["kmActuales"], 1000);
        assert!(value.get("id").is_none());
        assert!(value.get("usuarioId").is_none());
    }
}
