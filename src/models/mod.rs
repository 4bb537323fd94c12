//! Modelos de datos
//!
//! Este módulo contiene los modelos de dominio del tracker.

pub mod vehicle;

pub use vehicle::*;
