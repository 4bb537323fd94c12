//! Vehicle EMI Tracker
//!
//! Dashboard HTTP que sigue el estado de pago de la cuota (EMI) y la última
//! posición GPS de una flota de vehículos. El estado vive en memoria.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;
pub mod views;

use axum::Router;
use tower_http::trace::TraceLayer;

use middleware::cors::cors_middleware;
use state::AppState;

/// Crear el router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);

    Router::new()
        .merge(routes::dashboard_routes::create_dashboard_router())
        .merge(routes::vehicle_routes::create_vehicle_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
