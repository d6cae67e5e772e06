//! Field checks shared by the resource DTOs.

use crate::error::AppError;

/// Trims `value` in place and rejects it when nothing is left.
pub fn required_text(field: &str, value: &mut String) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
    Ok(())
}

/// Trims an optional text field; blank input becomes `None`.
pub fn optional_text(value: &mut Option<String>) {
    if let Some(v) = value.take() {
        let trimmed = v.trim();
        if !trimmed.is_empty() {
            *value = Some(trimmed.to_string());
        }
    }
}

/// Trims an optional text field of a patch. `Some("")` is kept and means
/// "clear the stored value"; see [`cleared`].
pub fn patch_text(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        let trimmed = v.trim();
        if trimmed.len() != v.len() {
            *v = trimmed.to_string();
        }
    }
}

/// Stored form of a patched optional text: empty becomes `None`.
pub fn cleared(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

pub fn amount(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

pub fn optional_amount(field: &str, value: Option<f64>) -> Result<(), AppError> {
    value.map_or(Ok(()), |v| amount(field, v))
}
