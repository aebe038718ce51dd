use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::utils::format::parse_date;

/// Maintenance categories known to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaintenanceType {
    Oil,
    Tyres,
    Inspection,
    Brakes,
    Insurance,
    Filters,
    Battery,
    Service,
    Other,
}

impl MaintenanceType {
    pub const ALL: [MaintenanceType; 9] = [
        MaintenanceType::Oil,
        MaintenanceType::Tyres,
        MaintenanceType::Inspection,
        MaintenanceType::Brakes,
        MaintenanceType::Insurance,
        MaintenanceType::Filters,
        MaintenanceType::Battery,
        MaintenanceType::Service,
        MaintenanceType::Other,
    ];

    /// Wire code, e.g. `ACEITE`.
    pub fn code(&self) -> &'static str {
        match self {
            MaintenanceType::Oil => "ACEITE",
            MaintenanceType::Tyres => "NEUMATICOS",
            MaintenanceType::Inspection => "ITV",
            MaintenanceType::Brakes => "FRENOS",
            MaintenanceType::Insurance => "SEGURO",
            MaintenanceType::Filters => "FILTROS",
            MaintenanceType::Battery => "BATERIA",
            MaintenanceType::Service => "REVISION",
            MaintenanceType::Other => "OTROS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceType::Oil => "Aceite",
            MaintenanceType::Tyres => "Neumáticos",
            MaintenanceType::Inspection => "ITV",
            MaintenanceType::Brakes => "Frenos",
            MaintenanceType::Insurance => "Seguro",
            MaintenanceType::Filters => "Filtros",
            MaintenanceType::Battery => "Batería",
            MaintenanceType::Service => "Revisión",
            MaintenanceType::Other => "Otros",
        }
    }


    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

/// Label for a type code, falling back to the code itself.
pub fn type_label(code: &str) -> String {
    MaintenanceType::from_code(code)
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| code.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maintenance {
    pub id: i64,
    #[serde(rename = "vehiculoId")]
    pub vehicle_id: i64,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "fecha")]
    pub date: String,
    pub km: i64,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
    #[serde(rename = "proximoKm", default)]
    pub next_km: Option<i64>,
    #[serde(rename = "proximaFecha", default)]
    pub next_date: Option<String>,
}

impl Maintenance {
    pub fn type_label(&self) -> String {
        type_label(&self.kind)
    }
}

/// Payload for creating or updating a maintenance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    #[serde(rename = "vehiculoId")]
    pub vehicle_id: i64,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "fecha")]
    pub date: String,
    pub km: i64,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
    #[serde(rename = "proximoKm", default)]
    pub next_km: Option<i64>,
    #[serde(rename = "proximaFecha", default)]
    pub next_date: Option<String>,
}

impl From<&Maintenance> for MaintenanceRequest {
    fn from(record: &Maintenance) -> Self {
        Self {
            vehicle_id: record.vehicle_id,
            kind: record.kind.clone(),
            date: record.date.clone(),
            km: record.km,
            price: record.price,
            notes: record.notes.clone(),
            next_km: record.next_km,
            next_date: record.next_date.clone(),
        }
    }
}

/// Sort newest first. Records whose date cannot be parsed go last.
pub fn sort_newest_first(records: &mut [Maintenance]) {
    records.sort_by(|a, b| match (parse_date(&a.date), parse_date(&b.date)) {
        (Some(da), Some(db)) => db.cmp(&da),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    });
}

/// A maintenance whose next-service mileage has been reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueAlert {
    pub maintenance_id: i64,
    pub type_label: String,
    pub due_km: i64,
    pub overdue_km: i64,
}

/// Most urgent overdue maintenance for a vehicle at `current_km`.
///
/// Only records with a positive `next_km` take part. Among those already
/// reached, the one with the lowest `next_km` wins.
pub fn overdue_alert(current_km: i64, records: &[Maintenance]) -> Option<OverdueAlert> {
    records
        .iter()
        .filter_map(|m| m.next_km.filter(|&km| km > 0).map(|km| (m, km)))
        .filter(|&(_, due_km)| current_km >= due_km)
        .min_by_key(|&(_, due_km)| due_km)
        .map(|(m, due_km)| OverdueAlert {
            maintenance_id: m.id,
            type_label: m.type_label(),
            due_km,
            overdue_km: current_km - due_km,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, kind: &str, date: &str, next_km: Option<i64>) -> Maintenance {
        Maintenance {
            id,
            vehicle_id: 1,
            kind: kind.to_string(),
            date: date.to_string(),
            km: 10_000,
            price: 50.0,
            notes: None,
            next_km,
            next_date: None,
        }
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(type_label("NEUMATICOS"), "Neumáticos");
        assert_eq!(type_label("BATERIA"), "Batería");
        assert_eq!(type_label("LAVADO"), "LAVADO");
    }

    #[test]
    fn test_type_codes_round_trip() {
        for kind in MaintenanceType::ALL {
            assert_eq!(MaintenanceType::from_code(kind.code()), Some(kind));
        }
        assert_eq!(MaintenanceType::from_code("aceite"), None);
    }

    #[test]
    fn test_sort_newest_first_invalid_last() {
        let mut records = vec![
            record(1, "ACEITE", "2023-01-10", None),
            record(2, "ITV", "not a date", None),
            record(3, "FRENOS", "2024-06-01", None),
            record(4, "SEGURO", "2023-11-30T08:00:00", None),
        ];
        sort_newest_first(&mut records);
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_overdue_alert_picks_lowest_due_km() {
        let records = vec![
            record(1, "ACEITE", "2024-01-01", Some(90_000)),
            record(2, "FRENOS", "2024-01-01", Some(80_000)),
            record(3, "ITV", "2024-01-01", Some(120_000)),
            record(4, "OTROS", "2024-01-01", Some(0)),
        ];
        let alert = overdue_alert(95_000, &records).unwrap();
        assert_eq!(alert.maintenance_id, 2);
        assert_eq!(alert.type_label, "Frenos");
        assert_eq!(alert.due_km, 80_000);
        assert_eq!(alert.overdue_km, 15_000);
    }

    #[test]
    fn test_overdue_alert_none_when_nothing_reached() {
        let records = vec![
            record(1, "ACEITE", "2024-01-01", Some(90_000)),
            record(2, "FRENOS", "2024-01-01", None),
        ];
        assert_eq!(overdue_alert(89_999, &records), None);
        assert_eq!(overdue_alert(0, &[]), None);

        // Reaching the due mileage exactly counts as overdue
        let alert = overdue_alert(90_000, &records).unwrap();
        assert_eq!(alert.overdue_km, 0);
    }

    #[test]
    fn test_parse_maintenance_with_nulls() {
        let json = r#"{"id": 5, "vehiculoId": 2, "tipo": "ACEITE", "fecha": "2024-03-15", "km": 60000, "precio": 89.9, "notas": null, "proximoKm": 75000, "proximaFecha": null}"#;
        let m: Maintenance = serde_json::from_str(json).unwrap();
        assert_eq!(m.next_km, Some(75_000));
        assert_eq!(m.notes, None);
        assert_eq!(m.type_label(), "Aceite");
    }
}
