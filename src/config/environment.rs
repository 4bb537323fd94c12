//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables son
//! opcionales; un valor presente pero inválido aborta el arranque.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use chrono::{Duration, FixedOffset, Offset, Utc};
use thiserror::Error;
use tracing::info;

/// Errores de configuración
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    /// Offset usado solo para mostrar fechas en el dashboard
    pub display_offset: FixedOffset,
    /// 0 desactiva el auto-refresh
    pub dashboard_refresh_secs: u32,
    pub default_vehicle_id: String,
    pub seed_vehicle_ids: Vec<String>,
    pub mark_paid_extension_days: u32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            display_offset: Utc.fix(),
            dashboard_refresh_secs: 30,
            default_vehicle_id: "V001".to_string(),
            seed_vehicle_ids: Vec::new(),
            mark_paid_extension_days: 7,
        }
    }
}

impl EnvironmentConfig {
    /// Cargar configuración desde el entorno (el `.env` ya debe estar cargado)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            environment: text_var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: try_load("PORT", defaults.port)?,
            host: text_var("HOST").unwrap_or(defaults.host),
            cors_origins: list_var("CORS_ORIGINS"),
            display_offset: try_load("DISPLAY_UTC_OFFSET", defaults.display_offset)?,
            dashboard_refresh_secs: try_load("DASHBOARD_REFRESH_SECS", defaults.dashboard_refresh_secs)?,
            default_vehicle_id: text_var("DEFAULT_VEHICLE_ID").unwrap_or(defaults.default_vehicle_id),
            seed_vehicle_ids: list_var("SEED_VEHICLE_IDS"),
            mark_paid_extension_days: try_load(
                "MARK_PAID_EXTENSION_DAYS",
                defaults.mark_paid_extension_days,
            )?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección de escucha
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Extensión aplicada por `mark_paid` a un vehículo vencido
    pub fn mark_paid_extension(&self) -> Option<Duration> {
        match self.mark_paid_extension_days {
            0 => None,
            days => Some(Duration::days(i64::from(days))),
        }
    }
}

fn text_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn list_var(key: &str) -> Vec<String> {
    text_var(key).map(|raw| split_list(&raw)).unwrap_or_default()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    parse_value(key, text_var(key), default)
}

fn parse_value<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
            value,
        }),
        None => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}
