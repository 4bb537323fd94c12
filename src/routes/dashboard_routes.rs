use axum::{extract::State, response::Html, routing::get, Json, Router};
use serde_json::json;

use crate::controllers::vehicle_controller::VehicleController;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::views::dashboard::render_dashboard;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
}

async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let controller = VehicleController::new(&state);
    let fleet = controller.fleet().await?;
    Ok(Html(render_dashboard(&fleet, &state.config)))
}

/// Health check simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
