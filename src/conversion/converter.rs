//! Unit conversion engine
//!
//! Converts a quantity between two units of the same category. Linear
//! categories go through the category's base unit; temperature goes through
//! Celsius with explicit formulas.

use serde::Serialize;
use thiserror::Error;

use super::format::{clipboard_text, format_quantity};
use super::registry::UnitRegistry;
use super::units::{Category, Unit};

/// Conversion failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConversionError {
    #[error("No quantity entered")]
    EmptyInput,

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    #[error("Unknown {category} unit '{unit}'")]
    UnknownUnit { category: Category, unit: String },

    #[error("Unsupported category '{0}'")]
    UnsupportedCategory(String),

    #[error("Conversion result is out of range")]
    NonFiniteResult,
}

impl ConversionError {
    /// Errors caused by what the user typed or picked, as opposed to a
    /// caller passing a category that does not exist
    pub fn is_input_error(&self) -> bool {
        !matches!(self, ConversionError::UnsupportedCategory(_))
    }
}

/// A single conversion to perform
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub category: Category,
    pub from_unit: String,
    pub to_unit: String,
    pub input: String,
}

impl ConversionRequest {
    pub fn new(category: Category, from_unit: &str, to_unit: &str, input: &str) -> Self {
        Self {
            category,
            from_unit: from_unit.to_string(),
            to_unit: to_unit.to_string(),
            input: input.to_string(),
        }
    }
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    /// Full-precision result
    pub value: f64,
    /// Display form of `value`
    pub formatted: String,
    pub from_unit: String,
    pub to_unit: String,
    /// Symbol of the target unit
    pub symbol: String,
}

impl ConversionResult {
    /// Value and target symbol for copying, e.g. "2.5 kg"
    pub fn clipboard_text(&self) -> String {
        clipboard_text(&self.formatted, &self.symbol)
    }
}

/// Parse a user-typed quantity
pub fn parse_quantity(input: &str) -> Result<f64, ConversionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::EmptyInput);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConversionError::InvalidNumber(trimmed.to_string())),
    }
}

fn lookup<'a>(
    registry: &'a UnitRegistry,
    category: Category,
    key: &str,
) -> Result<&'a Unit, ConversionError> {
    registry
        .find(category, key)
        .ok_or_else(|| ConversionError::UnknownUnit {
            category,
            unit: key.trim().to_string(),
        })
}

/// Temperature scales supported by the pairwise formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    fn of(unit: &Unit) -> Option<Self> {
        match unit.id.as_str() {
            "celsius" => Some(TemperatureScale::Celsius),
            "fahrenheit" => Some(TemperatureScale::Fahrenheit),
            "kelvin" => Some(TemperatureScale::Kelvin),
            _ => None,
        }
    }

    fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => value,
            TemperatureScale::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureScale::Kelvin => value - 273.15,
        }
    }

    fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureScale::Kelvin => celsius + 273.15,
        }
    }
}

fn convert_temperature(value: f64, from: &Unit, to: &Unit) -> Result<f64, ConversionError> {
    let unknown = |unit: &Unit| ConversionError::UnknownUnit {
        category: Category::Temperature,
        unit: unit.id.clone(),
    };
    let from_scale = TemperatureScale::of(from).ok_or_else(|| unknown(from))?;
    let to_scale = TemperatureScale::of(to).ok_or_else(|| unknown(to))?;

    Ok(to_scale.from_celsius(from_scale.to_celsius(value)))
}

fn convert_linear(value: f64, from: &Unit, to: &Unit) -> f64 {
    let base_value = value * from.to_base;
    if base_value.is_finite() {
        base_value / to.to_base
    } else {
        // Base value overflowed; the direct ratio may still land in range
        value * (from.to_base / to.to_base)
    }
}

fn convert_between(
    category: Category,
    from: &Unit,
    to: &Unit,
    value: f64,
) -> Result<f64, ConversionError> {
    // Same unit: no round trip through the base (or Celsius) to pick up
    // rounding error
    if from.id == to.id {
        return Ok(value);
    }

    let result = if category.is_linear() {
        convert_linear(value, from, to)
    } else {
        convert_temperature(value, from, to)?
    };

    if !result.is_finite() {
        return Err(ConversionError::NonFiniteResult);
    }
    Ok(result)
}

/// Convert a numeric quantity between two units of `category`
pub fn convert_value(
    registry: &UnitRegistry,
    category: Category,
    from_unit: &str,
    to_unit: &str,
    value: f64,
) -> Result<f64, ConversionError> {
    let from = lookup(registry, category, from_unit)?;
    let to = lookup(registry, category, to_unit)?;
    convert_between(category, from, to, value)
}

/// Convert a typed quantity, keeping every failure distinguishable
pub fn convert(
    registry: &UnitRegistry,
    category: Category,
    from_unit: &str,
    to_unit: &str,
    input: &str,
) -> Result<ConversionResult, ConversionError> {
    let value = parse_quantity(input)?;
    let from = lookup(registry, category, from_unit)?;
    let to = lookup(registry, category, to_unit)?;
    let result = convert_between(category, from, to, value)?;

    Ok(ConversionResult {
        value: result,
        formatted: format_quantity(result),
        from_unit: from.id.clone(),
        to_unit: to.id.clone(),
        symbol: to.symbol.clone(),
    })
}

/// Run a [`ConversionRequest`]
pub fn convert_request(
    registry: &UnitRegistry,
    request: &ConversionRequest,
) -> Result<ConversionResult, ConversionError> {
    convert(
        registry,
        request.category,
        &request.from_unit,
        &request.to_unit,
        &request.input,
    )
}

/// Convert for a live display: any input problem shows as "0"
pub fn convert_for_display(
    registry: &UnitRegistry,
    category: Category,
    from_unit: &str,
    to_unit: &str,
    input: &str,
) -> String {
    match convert(registry, category, from_unit, to_unit, input) {
        Ok(result) => result.formatted,
        Err(e) => {
            tracing::debug!(
                "Conversion {} -> {} of '{}' shown as 0: {}",
                from_unit,
                to_unit,
                input,
                e
            );
            "0".to_string()
        }
    }
}
