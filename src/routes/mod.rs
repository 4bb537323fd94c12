pub mod dashboard_routes;
pub mod vehicle_routes;
