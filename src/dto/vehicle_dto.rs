use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::VehicleRecord;

/// Valor crudo de un campo. Los formularios siempre llegan como texto, los
/// dispositivos que hablan JSON a veces mandan números.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Texto recortado; `None` si queda vacío
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Float(n) => n.to_string(),
            FieldValue::Text(s) => s.trim().to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// `?id=` aceptado en cualquier endpoint
#[derive(Debug, Default, Deserialize)]
pub struct VehicleIdQuery {
    pub id: Option<String>,
}

// Request para check_payment y mark_paid
#[derive(Debug, Default, Deserialize)]
pub struct VehicleIdRequest {
    pub id: Option<FieldValue>,
}

// Request para update_loc / update_location
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLocationRequest {
    pub id: Option<FieldValue>,
    pub lat: Option<FieldValue>,
    pub lon: Option<FieldValue>,
}

// Request para set_timer
#[derive(Debug, Default, Deserialize)]
pub struct SetTimerRequest {
    pub id: Option<FieldValue>,
    pub days: Option<FieldValue>,
    pub hours: Option<FieldValue>,
    pub minutes: Option<FieldValue>,
}

/// El id del cuerpo gana sobre el de la query; los vacíos se ignoran
pub fn requested_id(body: Option<&FieldValue>, query: &VehicleIdQuery) -> Option<String> {
    body.and_then(FieldValue::as_text).or_else(|| {
        query
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    })
}

// Response de check_payment: entero para que el firmware no tenga que parsear booleanos
#[derive(Debug, Serialize, PartialEq)]
pub struct PaymentCheckResponse {
    pub paid: u8,
}

impl PaymentCheckResponse {
    pub fn new(paid: bool) -> Self {
        Self { paid: u8::from(paid) }
    }
}

// Response de estado de vehículo
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStatusResponse {
    pub id: String,
    pub registration: String,
    pub vin: String,
    pub owner: String,
    pub paid: bool,
    pub due_at: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub last_seen: Option<DateTime<Utc>>,
}

impl From<VehicleRecord> for VehicleStatusResponse {
    fn from(vehicle: VehicleRecord) -> Self {
        Self {
            id: vehicle.id,
            registration: vehicle.registration,
            vin: vehicle.vin,
            owner: vehicle.owner,
            paid: vehicle.paid,
            due_at: vehicle.due_at,
            lat: vehicle.lat,
            lon: vehicle.lon,
            last_seen: vehicle.last_seen,
        }
    }
}
