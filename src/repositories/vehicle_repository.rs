use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::EnvironmentConfig;
use crate::models::{VehicleRecord, VehicleUpdate};
use crate::utils::errors::{not_found_error, AppError};

/// Almacén de vehículos inyectado en los handlers.
///
/// `apply` ejecuta la mutación completa bajo el mismo bloqueo, así dos
/// requests concurrentes nunca se pisan a medias.
#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<VehicleRecord>, AppError>;

    /// Todos los vehículos ordenados por id
    async fn list(&self) -> Result<Vec<VehicleRecord>, AppError>;

    async fn apply(&self, id: &str, update: VehicleUpdate) -> Result<VehicleRecord, AppError>;
}

pub struct InMemoryVehicleRepository {
    vehicles: RwLock<BTreeMap<String, VehicleRecord>>,
}

impl InMemoryVehicleRepository {
    pub fn new(records: impl IntoIterator<Item = VehicleRecord>) -> Self {
        let vehicles = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            vehicles: RwLock::new(vehicles),
        }
    }

    pub fn seeded(config: &EnvironmentConfig, now: DateTime<Utc>) -> Self {
        Self::new(seed_fleet(config, now))
    }
}

/// Flota inicial: el vehículo por defecto más los ids extra configurados
pub fn seed_fleet(config: &EnvironmentConfig, now: DateTime<Utc>) -> Vec<VehicleRecord> {
    let mut ids: Vec<&str> = vec![config.default_vehicle_id.as_str()];
    for id in &config.seed_vehicle_ids {
        if !ids.contains(&id.as_str()) {
            ids.push(id.as_str());
        }
    }
    ids.into_iter().map(|id| VehicleRecord::seed(id, now)).collect()
}

#[async_trait]
impl VehicleStore for InMemoryVehicleRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<VehicleRecord>, AppError> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<VehicleRecord>, AppError> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.values().cloned().collect())
    }

    async fn apply(&self, id: &str, update: VehicleUpdate) -> Result<VehicleRecord, AppError> {
        let mut vehicles = self.vehicles.write().await;
        let vehicle = vehicles
            .get_mut(id)
            .ok_or_else(|| not_found_error("vehicle", id))?;

        vehicle.apply(update);
        debug!("🔄 Vehicle {} updated: {:?}", id, update);

        Ok(vehicle.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> InMemoryVehicleRepository {
        let now = Utc::now();
        InMemoryVehicleRepository::new(vec![
            VehicleRecord::seed("V002", now),
            VehicleRecord::seed("V001", now),
        ])
    }

    #[test]
    fn seed_fleet_dedups_default() {
        let config = EnvironmentConfig {
            seed_vehicle_ids: vec!["V001".to_string(), "V009".to_string()],
            ..EnvironmentConfig::default()
        };
        let fleet = seed_fleet(&config, Utc::now());
        let ids: Vec<&str> = fleet.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["V001", "V009"]);
        assert!(fleet.iter().all(|v| v.paid && v.last_seen.is_none()));
    }

    #[tokio::test]
    async fn list_is_sorted_by_id() {
        let ids: Vec<String> = repository()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec!["V001", "V002"]);
    }

    #[tokio::test]
    async fn unknown_id_leaves_fleet_untouched() {
        let repo = repository();
        let before = repo.list().await.unwrap();

        let result = repo
            .apply("NOPE", VehicleUpdate::CheckPayment { now: Utc::now() })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(repo.list().await.unwrap(), before);
        assert!(repo.find_by_id("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn apply_returns_updated_record() {
        let repo = repository();
        let later = Utc::now() + chrono::Duration::days(30);

        let updated = repo
            .apply("V001", VehicleUpdate::CheckPayment { now: later })
            .await
            .unwrap();

        assert!(!updated.paid);
        assert_eq!(repo.find_by_id("V001").await.unwrap(), Some(updated));
    }
}
