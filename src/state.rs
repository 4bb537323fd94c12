//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::environment::EnvironmentConfig;
use crate::repositories::vehicle_repository::{InMemoryVehicleRepository, VehicleStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub vehicles: Arc<dyn VehicleStore>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, vehicles: Arc<dyn VehicleStore>) -> Self {
        Self {
            config: Arc::new(config),
            vehicles,
        }
    }

    /// Estado con la flota sembrada en memoria
    pub fn in_memory(config: EnvironmentConfig, now: DateTime<Utc>) -> Self {
        let vehicles = InMemoryVehicleRepository::seeded(&config, now);
        Self::new(config, Arc::new(vehicles))
    }
}
