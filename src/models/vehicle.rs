//! Modelo de Vehicle
//!
//! Este módulo contiene el estado actual de un vehículo financiado: situación
//! de la cuota (EMI), fecha de vencimiento y última posición GPS reportada por
//! el dispositivo de campo. No hay histórico, cada registro guarda solo el
//! estado vigente.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use validator::Validate;

/// Días de margen con los que arranca cada vehículo sembrado
pub const DEFAULT_DUE_DAYS: i64 = 7;

/// Tope para `set_timer`: 100 años expresados en minutos
pub const MAX_TIMER_MINUTES: i64 = 100 * 365 * 24 * 60;

/// Regla de pago: la cuota está al día mientras `now` no supere el vencimiento.
pub fn is_paid(now: DateTime<Utc>, due_at: DateTime<Utc>) -> bool {
    now <= due_at
}

/// Vehicle en memoria
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRecord {
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

impl VehicleRecord {
    /// Registro inicial: al día, vence en 7 días y sin posición conocida
    pub fn seed(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        let id = id.into();
        Self {
            registration: format!("REG-{}", id),
            vin: "UNKNOWN".to_string(),
            owner: "Unassigned".to_string(),
            id,
            paid: true,
            due_at: now + Duration::days(DEFAULT_DUE_DAYS),
            lat: 0.0,
            lon: 0.0,
            last_seen: None,
        }
    }

    pub fn is_overdue(&self) -> bool {
        !self.paid
    }

    /// Aplica una mutación. Toda la lógica de estado vive aquí, el store solo
    /// se encarga de encontrar el registro y bloquearlo.
    pub fn apply(&mut self, update: VehicleUpdate) {
        match update {
            VehicleUpdate::CheckPayment { now } => {
                self.paid = is_paid(now, self.due_at);
            }
            VehicleUpdate::Location { fix, seen_at } => {
                self.lat = fix.lat;
                self.lon = fix.lon;
                self.last_seen = Some(seen_at);
            }
            VehicleUpdate::Timer { due_at } => {
                self.due_at = due_at;
                self.paid = true;
            }
            VehicleUpdate::MarkPaid { now, extension } => {
                self.paid = true;
                if let Some(extension) = extension {
                    if !is_paid(now, self.due_at) {
                        self.due_at = now + extension;
                    }
                }
            }
        }
    }
}

/// Mutaciones posibles sobre un vehículo
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VehicleUpdate {
    CheckPayment {
        now: DateTime<Utc>,
    },
    Location {
        fix: LocationFix,
        seen_at: DateTime<Utc>,
    },
    Timer {
        due_at: DateTime<Utc>,
    },
    /// `extension` es `None` cuando el rollover está desactivado
    MarkPaid {
        now: DateTime<Utc>,
        extension: Option<Duration>,
    },
}

/// Posición reportada por el dispositivo, ya convertida a números finitos
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct LocationFix {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,
}

/// Duración pedida desde el formulario del dashboard
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct TimerSpan {
    #[validate(range(min = 0))]
    pub days: i64,

    #[validate(range(min = 0))]
    pub hours: i64,

    #[validate(range(min = 0))]
    pub minutes: i64,
}

impl TimerSpan {
    /// `((days * 24 + hours) * 60) + minutes`, `None` si desborda
    pub fn total_minutes(&self) -> Option<i64> {
        self.days
            .checked_mul(24)?
            .checked_add(self.hours)?
            .checked_mul(60)?
            .checked_add(self.minutes)
    }
}
