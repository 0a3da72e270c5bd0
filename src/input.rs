//! Validation of text typed into the controls
//!
//! Every numeric field goes through here before an intent is built, so the
//! session only ever sees finite numbers.

use crate::color::Color;
use crate::error::InputError;
use crate::sim::Vec2;

/// Finite decimal number
///
/// Accepts a comma as the decimal separator (`"9,8"`), as typed on
/// Spanish-locale keyboards.
pub fn parse_decimal(field: &str, text: &str) -> Result<f64, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty {
            field: field.to_string(),
        });
    }
    let normalized = trimmed.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::NotANumber {
            field: field.to_string(),
            text: trimmed.to_string(),
        }),
    }
}

/// Whole number; `"3.0"` is accepted, `"3.5"` is not
pub fn parse_integer(field: &str, text: &str) -> Result<i64, InputError> {
    let value = parse_decimal(field, text)?;
    if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return Err(InputError::NotAnInteger {
            field: field.to_string(),
            text: text.trim().to_string(),
        });
    }
    Ok(value as i64)
}

/// Decimal number within `min..=max`
pub fn parse_in_range(field: &str, text: &str, min: f64, max: f64) -> Result<f64, InputError> {
    let value = parse_decimal(field, text)?;
    if !(min..=max).contains(&value) {
        return Err(InputError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        });
    }
    Ok(value)
}

/// `#rrggbb` from a color picker
pub fn parse_color(field: &str, text: &str) -> Result<Color, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty {
            field: field.to_string(),
        });
    }
    Color::from_hex(trimmed).ok_or_else(|| InputError::NotAColor {
        field: field.to_string(),
        text: trimmed.to_string(),
    })
}

/// Two-axis vector from a pair of x/y fields
pub fn parse_vec2(field: &str, x: &str, y: &str) -> Result<Vec2, InputError> {
    Ok(Vec2::new(
        parse_decimal(&format!("{field} x"), x)?,
        parse_decimal(&format!("{field} y"), y)?,
    ))
}
