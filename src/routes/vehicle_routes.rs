use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{
    requested_id, PaymentCheckResponse, SetTimerRequest, UpdateLocationRequest, VehicleIdQuery,
    VehicleIdRequest, VehicleStatusResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::FormOrJson;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/check_payment", post(check_payment))
        .route("/update_loc", post(update_location))
        .route("/update_location", post(update_location))
        .route("/set_timer", post(set_timer))
        .route("/mark_paid", post(mark_paid))
        .route("/api/vehicle_status", get(vehicle_status))
        .route("/api/vehicles", get(list_vehicles))
}

/// 302 de vuelta al dashboard tras enviar un formulario
fn redirect_to_dashboard() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

async fn check_payment(
    State(state): State<AppState>,
    Query(query): Query<VehicleIdQuery>,
    FormOrJson(request): FormOrJson<VehicleIdRequest>,
) -> Result<Json<PaymentCheckResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let id = requested_id(request.id.as_ref(), &query);
    let response = controller.check_payment(id, Utc::now()).await?;
    Ok(Json(response))
}

async fn update_location(
    State(state): State<AppState>,
    Query(query): Query<VehicleIdQuery>,
    FormOrJson(request): FormOrJson<UpdateLocationRequest>,
) -> Result<&'static str, AppError> {
    let controller = VehicleController::new(&state);
    let id = requested_id(request.id.as_ref(), &query);
    controller.update_location(id, request, Utc::now()).await?;
    Ok("OK")
}

async fn set_timer(
    State(state): State<AppState>,
    Query(query): Query<VehicleIdQuery>,
    FormOrJson(request): FormOrJson<SetTimerRequest>,
) -> Result<Response, AppError> {
    let controller = VehicleController::new(&state);
    let id = requested_id(request.id.as_ref(), &query);
    controller.set_timer(id, request, Utc::now()).await?;
    Ok(redirect_to_dashboard())
}

async fn mark_paid(
    State(state): State<AppState>,
    Query(query): Query<VehicleIdQuery>,
    FormOrJson(request): FormOrJson<VehicleIdRequest>,
) -> Result<Response, AppError> {
    let controller = VehicleController::new(&state);
    let id = requested_id(request.id.as_ref(), &query);
    controller.mark_paid(id, Utc::now()).await?;
    Ok(redirect_to_dashboard())
}

async fn vehicle_status(
    State(state): State<AppState>,
    Query(query): Query<VehicleIdQuery>,
) -> Result<Json<VehicleStatusResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.get_status(requested_id(None, &query)).await?;
    Ok(Json(response))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<Vec<VehicleStatusResponse>>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.list().await?;
    Ok(Json(response))
}
