use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use validator::Validate;

use crate::dto::vehicle_dto::{
    PaymentCheckResponse, SetTimerRequest, UpdateLocationRequest, VehicleStatusResponse,
};
use crate::models::{LocationFix, TimerSpan, VehicleRecord, VehicleUpdate, MAX_TIMER_MINUTES};
use crate::repositories::vehicle_repository::VehicleStore;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, internal_error, not_found_error, AppError};
use crate::utils::validation::{parse_coordinate, parse_whole_number};

pub struct VehicleController {
    store: Arc<dyn VehicleStore>,
    default_vehicle_id: String,
    mark_paid_extension: Option<Duration>,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.vehicles.clone(),
            default_vehicle_id: state.config.default_vehicle_id.clone(),
            mark_paid_extension: state.config.mark_paid_extension(),
        }
    }

    fn resolve_id(&self, id: Option<String>) -> String {
        id.unwrap_or_else(|| self.default_vehicle_id.clone())
    }

    pub async fn check_payment(
        &self,
        id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<PaymentCheckResponse, AppError> {
        let id = self.resolve_id(id);
        let vehicle = self.store.apply(&id, VehicleUpdate::CheckPayment { now }).await?;

        if vehicle.is_overdue() {
            info!("💸 Vehicle {} overdue since {}", vehicle.id, vehicle.due_at);
        }

        Ok(PaymentCheckResponse::new(vehicle.paid))
    }

    pub async fn update_location(
        &self,
        id: Option<String>,
        request: UpdateLocationRequest,
        now: DateTime<Utc>,
    ) -> Result<VehicleRecord, AppError> {
        // Validar campos antes de tocar el store
        let fix = LocationFix {
            lat: parse_coordinate("lat", request.lat.as_ref())?,
            lon: parse_coordinate("lon", request.lon.as_ref())?,
        };
        fix.validate()?;

        let id = self.resolve_id(id);
        let vehicle = self
            .store
            .apply(&id, VehicleUpdate::Location { fix, seen_at: now })
            .await?;

        info!("📍 Vehicle {} reported ({}, {})", vehicle.id, vehicle.lat, vehicle.lon);
        Ok(vehicle)
    }

    pub async fn set_timer(
        &self,
        id: Option<String>,
        request: SetTimerRequest,
        now: DateTime<Utc>,
    ) -> Result<VehicleRecord, AppError> {
        let span = TimerSpan {
            days: parse_whole_number("days", request.days.as_ref())?,
            hours: parse_whole_number("hours", request.hours.as_ref())?,
            minutes: parse_whole_number("minutes", request.minutes.as_ref())?,
        };
        span.validate()?;

        let total_minutes = span
            .total_minutes()
            .filter(|minutes| *minutes <= MAX_TIMER_MINUTES)
            .ok_or_else(|| bad_request_error("Timer must not exceed 100 years"))?;

        let due_at = now
            .checked_add_signed(Duration::minutes(total_minutes))
            .ok_or_else(|| internal_error("Due timestamp out of range"))?;

        let id = self.resolve_id(id);
        let vehicle = self.store.apply(&id, VehicleUpdate::Timer { due_at }).await?;

        info!("⏱️ Vehicle {} EMI due at {} ({} min)", vehicle.id, vehicle.due_at, total_minutes);
        Ok(vehicle)
    }

    pub async fn mark_paid(
        &self,
        id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<VehicleRecord, AppError> {
        let id = self.resolve_id(id);
        let update = VehicleUpdate::MarkPaid {
            now,
            extension: self.mark_paid_extension,
        };
        let vehicle = self.store.apply(&id, update).await?;

        info!("✅ Vehicle {} marked paid, due {}", vehicle.id, vehicle.due_at);
        Ok(vehicle)
    }

    pub async fn get_status(&self, id: Option<String>) -> Result<VehicleStatusResponse, AppError> {
        let id = self.resolve_id(id);
        let vehicle = self
            .store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| not_found_error("vehicle", &id))?;

        Ok(vehicle.into())
    }

    pub async fn list(&self) -> Result<Vec<VehicleStatusResponse>, AppError> {
        let vehicles = self.store.list().await?;
        Ok(vehicles.into_iter().map(VehicleStatusResponse::from).collect())
    }

    /// Registros crudos para el dashboard
    pub async fn fleet(&self) -> Result<Vec<VehicleRecord>, AppError> {
        self.store.list().await
    }
}
