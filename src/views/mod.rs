//! Vistas HTML renderizadas en el servidor

pub mod dashboard;
