//! Dashboard HTML
//!
//! Render del lado servidor: una tarjeta por vehículo con estado de pago,
//! vencimiento, última posición y formularios. El mapa es Leaflet sobre
//! OpenStreetMap, cargado en el navegador. El HTML depende solo del estado y
//! de la configuración, nunca del reloj, así que dos GET seguidos sin
//! cambios devuelven exactamente el mismo documento.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::config::EnvironmentConfig;
use crate::models::VehicleRecord;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const MAP_ZOOM: u8 = 14;

#[derive(Serialize)]
struct MapMarker<'a> {
    lat: f64,
    lon: f64,
    label: &'a str,
}

pub fn render_dashboard(vehicles: &[VehicleRecord], config: &EnvironmentConfig) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    if config.dashboard_refresh_secs > 0 {
        html.push_str(&format!(
            "<meta http-equiv=\"refresh\" content=\"{}\">\n",
            config.dashboard_refresh_secs
        ));
    }
    html.push_str("<title>Vehicle EMI Tracker</title>\n");
    html.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\">\n", LEAFLET_CSS));
    html.push_str(
        "<style>body{font-family:sans-serif;margin:2em}\
         .vehicle{border:1px solid #ccc;padding:1em;margin-bottom:1.5em}\
         .map{width:600px;height:400px}</style>\n",
    );
    html.push_str("</head>\n<body>\n<h1>Vehicle EMI Tracker</h1>\n");

    if vehicles.is_empty() {
        html.push_str("<p>No vehicles registered.</p>\n");
    }
    for (index, vehicle) in vehicles.iter().enumerate() {
        html.push_str(&render_vehicle(index, vehicle, config.display_offset));
    }

    html.push_str(&render_map_script(vehicles));
    html.push_str("</body>\n</html>\n");
    html
}

fn render_vehicle(index: usize, vehicle: &VehicleRecord, offset: FixedOffset) -> String {
    let id = escape_html(&vehicle.id);
    let status = if vehicle.paid { "✅ Paid" } else { "❌ Overdue" };
    let last_seen = vehicle
        .last_seen
        .map(|ts| format_timestamp(ts, offset))
        .unwrap_or_else(|| "never".to_string());

    let mut card = format!(
        "<section class=\"vehicle\" id=\"vehicle-{index}\">\n\
         <h2>{registration} <small>({id})</small></h2>\n\
         <p>Owner: {owner} &middot; VIN: {vin}</p>\n\
         <p>Payment status: <b>{status}</b></p>\n\
         <p>Next EMI due: {due}</p>\n\
         <p>Last seen: {last_seen}</p>\n\
         <form method=\"POST\" action=\"/set_timer\">\n\
         <input type=\"hidden\" name=\"id\" value=\"{id}\">\n\
         <label>Set EMI timer:</label><br>\n\
         Days: <input type=\"number\" name=\"days\" min=\"0\" value=\"0\" required><br>\n\
         Hours: <input type=\"number\" name=\"hours\" min=\"0\" max=\"23\" value=\"0\" required><br>\n\
         Minutes: <input type=\"number\" name=\"minutes\" min=\"0\" max=\"59\" value=\"0\" required><br>\n\
         <button type=\"submit\">Update</button>\n\
         </form>\n",
        registration = escape_html(&vehicle.registration),
        owner = escape_html(&vehicle.owner),
        vin = escape_html(&vehicle.vin),
        due = format_timestamp(vehicle.due_at, offset),
    );

    if vehicle.is_overdue() {
        card.push_str(&format!(
            "<form method=\"POST\" action=\"/mark_paid\">\n\
             <input type=\"hidden\" name=\"id\" value=\"{id}\">\n\
             <button type=\"submit\">Mark as paid</button>\n\
             </form>\n"
        ));
    }

    card.push_str(&format!(
        "<h3>Last known location: {lat}, {lon}</h3>\n\
         <div id=\"map-{index}\" class=\"map\"></div>\n\
         </section>\n",
        lat = vehicle.lat,
        lon = vehicle.lon,
    ));
    card
}

fn render_map_script(vehicles: &[VehicleRecord]) -> String {
    let markers: Vec<MapMarker> = vehicles
        .iter()
        .map(|v| MapMarker {
            lat: v.lat,
            lon: v.lon,
            label: &v.registration,
        })
        .collect();
    // `</` dentro de un <script> cerraría la etiqueta antes de tiempo
    let markers_json = serde_json::to_string(&markers)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/");

    format!(
        "<script src=\"{LEAFLET_JS}\"></script>\n\
         <script>\n\
         const vehicles = {markers_json};\n\
         vehicles.forEach((v, i) => {{\n\
         \x20 const map = L.map('map-' + i).setView([v.lat, v.lon], {MAP_ZOOM});\n\
         \x20 L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{\n\
         \x20   attribution: '&copy; OpenStreetMap contributors'\n\
         \x20 }}).addTo(map);\n\
         \x20 L.marker([v.lat, v.lon]).addTo(map).bindPopup(v.label);\n\
         }});\n\
         </script>\n"
    )
}

pub fn format_timestamp(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S %:z").to_string()
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
