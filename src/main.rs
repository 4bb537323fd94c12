use anyhow::Result;
use chrono::Utc;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use vehicle_emi_tracker::config::environment::EnvironmentConfig;
use vehicle_emi_tracker::create_app;
use vehicle_emi_tracker::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚗 Vehicle EMI Tracker");
    info!("================================================");

    let config = match EnvironmentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuración inválida: {}", e);
            return Err(e.into());
        }
    };
    if config.is_development() {
        debug!("🔧 Configuración: {:?}", config);
    }

    let addr = config.server_url();
    let port = config.port;
    let environment = config.environment.clone();

    let state = AppState::in_memory(config, Utc::now());
    let fleet = state.vehicles.list().await?;
    info!(
        "🚙 Flota sembrada: {} vehículo(s), por defecto '{}'",
        fleet.len(),
        state.config.default_vehicle_id
    );

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Dashboard running on http://localhost:{} ({})", port, environment);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  / - Dashboard HTML");
    info!("   GET  /health - Health check");
    info!("   GET  /api/vehicle_status - Estado JSON de un vehículo (?id=)");
    info!("   GET  /api/vehicles - Estado JSON de toda la flota");
    info!("📡 Endpoints del dispositivo:");
    info!("   POST /check_payment - Consultar/recalcular pago");
    info!("   POST /update_loc - Reportar ubicación (alias /update_location)");
    info!("🧾 Endpoints del dashboard:");
    info!("   POST /set_timer - Fijar vencimiento de la cuota");
    info!("   POST /mark_paid - Marcar cuota como pagada");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
