use anyhow::{bail, Context, Result};
use colored::*;
use serde::Deserialize;
use std::io::{self, Write};
use std::time::Duration;

/// Respuesta de /check_payment
#[derive(Debug, Deserialize)]
struct PaymentCheck {
    paid: u8,
}

#[derive(Debug)]
struct Device {
    base_url: String,
    vehicle_id: Option<String>,
    client: reqwest::Client,
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "📡 Simulador de dispositivo GPS".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    // Paso 1: Pedir destino
    let device = get_device()?;

    // Paso 2: Menú principal
    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 📍 Reportar ubicación");
        println!("2. 💳 Consultar pago");
        println!("3. 🛣️  Simular trayecto");
        println!("4. 🚪 Salir");
        let choice = prompt("Selecciona una opción (1-4): ")?;

        let result = match choice.as_str() {
            "1" => report_once(&device).await,
            "2" => check_payment(&device).await.map(|_| ()),
            "3" => simulate_trip(&device).await,
            "4" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                continue;
            }
        };

        if let Err(e) = result {
            println!("{} {:#}", "❌ Error:".bright_red().bold(), e);
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_number<T: std::str::FromStr>(label: &str, default: T) -> Result<T> {
    let raw = prompt(label)?;
    if raw.is_empty() {
        return Ok(default);
    }
    match raw.parse() {
        Ok(value) => Ok(value),
        Err(_) => bail!("'{}' no es un número válido", raw),
    }
}

fn get_device() -> Result<Device> {
    println!("{}", "🔧 CONFIGURACIÓN DEL DISPOSITIVO".bright_cyan().bold());
    println!("{}", "===============================".bright_cyan());

    let base_url = prompt("URL del servidor [http://localhost:3000]: ")?;
    let base_url = if base_url.is_empty() {
        "http://localhost:3000".to_string()
    } else {
        base_url.trim_end_matches('/').to_string()
    };

    let vehicle_id = prompt("Id del vehículo [por defecto]: ")?;
    let vehicle_id = if vehicle_id.is_empty() { None } else { Some(vehicle_id) };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    Ok(Device {
        base_url,
        vehicle_id,
        client,
    })
}

/// Campos de formulario con el id opcional delante
fn form_with_id(device: &Device, fields: &[(&str, String)]) -> Vec<(String, String)> {
    let mut form = Vec::with_capacity(fields.len() + 1);
    if let Some(id) = &device.vehicle_id {
        form.push(("id".to_string(), id.clone()));
    }
    for (key, value) in fields {
        form.push((key.to_string(), value.clone()));
    }
    form
}

async fn send_location(device: &Device, lat: f64, lon: f64) -> Result<()> {
    let url = format!("{}/update_loc", device.base_url);
    let form = form_with_id(device, &[("lat", lat.to_string()), ("lon", lon.to_string())]);

    let response = device
        .client
        .post(&url)
        .form(&form)
        .send()
        .await
        .with_context(|| format!("POST {}", url))?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        bail!("{} -> {}", status, body);
    }

    println!("{} ({:.5}, {:.5}) -> {}", "📤 Ubicación enviada".bright_blue(), lat, lon, body);
    Ok(())
}

async fn check_payment(device: &Device) -> Result<bool> {
    let url = format!("{}/check_payment", device.base_url);
    let form = form_with_id(device, &[]);

    let response = device
        .client
        .post(&url)
        .form(&form)
        .send()
        .await
        .with_context(|| format!("POST {}", url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("{} -> {}", status, response.text().await?);
    }

    let check: PaymentCheck = response.json().await?;
    let paid = check.paid == 1;
    if paid {
        println!("{}", "✅ Cuota al día".bright_green().bold());
    } else {
        println!("{}", "⛔ Cuota vencida, el dispositivo bloquearía el vehículo".bright_red().bold());
    }
    Ok(paid)
}

async fn report_once(device: &Device) -> Result<()> {
    let lat = prompt_number("Latitud [12.9716]: ", 12.9716)?;
    let lon = prompt_number("Longitud [77.5946]: ", 77.5946)?;
    send_location(device, lat, lon).await
}

async fn simulate_trip(device: &Device) -> Result<()> {
    let steps: u32 = prompt_number("Número de reportes [10]: ", 10)?;
    let interval: u64 = prompt_number("Segundos entre reportes [2]: ", 2)?;

    println!();
    println!("{}", "🛣️  SIMULANDO TRAYECTO...".bright_cyan().bold());
    println!("{}", "=========================".bright_cyan());

    // Recorrido recto hacia el noreste desde el centro de Bengaluru
    let (mut lat, mut lon) = (12.9716_f64, 77.5946_f64);
    for step in 1..=steps {
        println!("{}", format!("— Reporte {}/{}", step, steps).bright_white());
        send_location(device, lat, lon).await?;
        check_payment(device).await?;

        lat += 0.0015;
        lon += 0.0012;
        if step < steps {
            tokio::time::sleep(Duration::from_secs(interval)).await;
        }
    }

    println!("{}", "🏁 Trayecto completado".bright_green().bold());
    Ok(())
}
