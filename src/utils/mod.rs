//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación de
//! campos y extracción de cuerpos de request.

pub mod errors;
pub mod extract;
pub mod validation;
