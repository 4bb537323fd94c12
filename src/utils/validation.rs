//! Utilidades de validación
//!
//! Este módulo convierte los campos crudos de los requests en valores
//! tipados. Cualquier valor que no se pueda interpretar termina en un
//! `AppError::BadRequest`, nunca en un NaN guardado.

use crate::dto::vehicle_dto::FieldValue;
use crate::utils::errors::AppError;

/// Campo obligatorio presente y no vacío
fn required<'a>(field: &str, value: Option<&'a FieldValue>) -> Result<&'a FieldValue, AppError> {
    match value {
        Some(v) if v.as_text().is_some() => Ok(v),
        _ => Err(AppError::BadRequest(format!("Missing field '{}'", field))),
    }
}

/// Validar y convertir a coordenada (número decimal finito)
pub fn parse_coordinate(field: &str, value: Option<&FieldValue>) -> Result<f64, AppError> {
    let parsed = match required(field, value)? {
        FieldValue::Integer(n) => Some(*n as f64),
        FieldValue::Float(n) => Some(*n),
        FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
    };

    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| AppError::BadRequest(format!("Field '{}' must be a finite number", field)))
}

/// Validar y convertir a entero
pub fn parse_whole_number(field: &str, value: Option<&FieldValue>) -> Result<i64, AppError> {
    let parsed = match required(field, value)? {
        FieldValue::Integer(n) => Some(*n),
        FieldValue::Float(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Some(*n as i64),
        FieldValue::Float(_) => None,
        FieldValue::Text(s) => s.trim().parse::<i64>().ok(),
    };

    parsed.ok_or_else(|| AppError::BadRequest(format!("Field '{}' must be a whole number", field)))
}
