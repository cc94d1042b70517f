//! Unit types and conversion constants
//!
//! Provides the measurement categories, the unit record, and the built-in
//! kitchen unit table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::converter::ConversionError;

/// Measurement category a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Mass units, base unit gram
    Weight,
    /// Volume units, base unit milliliter
    Volume,
    /// Temperature scales, no shared linear base
    Temperature,
    /// Length units, base unit millimeter
    Length,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Weight,
        Category::Volume,
        Category::Temperature,
        Category::Length,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Weight => "weight",
            Category::Volume => "volume",
            Category::Temperature => "temperature",
            Category::Length => "length",
        }
    }

    /// Id of the base unit all `to_base` multipliers refer to
    pub fn base_unit(&self) -> Option<&'static str> {
        match self {
            Category::Weight => Some("g"),
            Category::Volume => Some("ml"),
            Category::Length => Some("mm"),
            Category::Temperature => None,
        }
    }

    /// Whether conversions go through a shared multiplicative base
    pub fn is_linear(&self) -> bool {
        !matches!(self, Category::Temperature)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weight" => Ok(Category::Weight),
            "volume" => Ok(Category::Volume),
            "temperature" => Ok(Category::Temperature),
            "length" => Ok(Category::Length),
            other => Err(ConversionError::UnsupportedCategory(other.to_string())),
        }
    }
}

/// Where a unit definition came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSource {
    Builtin,
    Custom,
}

/// A measurement unit within one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub symbol: String,
    /// Multiplier to the category base unit (ignored for temperature)
    pub to_base: f64,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub source: UnitSource,
}

impl Unit {
    /// Create a custom linear unit
    pub fn custom(id: &str, name: &str, symbol: &str, to_base: f64, category: Category) -> Self {
        Self {
            id: id.trim().to_lowercase(),
            name: name.trim().to_string(),
            symbol: symbol.trim().to_string(),
            to_base,
            category,
            aliases: Vec::new(),
            source: UnitSource::Custom,
        }
    }

    /// Whether `key` (already lowercased) names this unit
    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.aliases.iter().any(|a| a == key)
    }
}

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

pub const G_PER_MG: f64 = 0.001;
pub const G_PER_KG: f64 = 1000.0;
pub const G_PER_OZ: f64 = 28.3495;
pub const G_PER_LB: f64 = 453.592;
/// Grams per cup of all-purpose flour (spooned and leveled)
pub const G_PER_CUP_FLOUR: f64 = 120.0;
/// Grams per cup of granulated sugar
pub const G_PER_CUP_SUGAR: f64 = 200.0;
/// Grams per cup of butter (two sticks)
pub const G_PER_CUP_BUTTER: f64 = 227.0;

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

pub const ML_PER_TSP: f64 = 4.92892;
pub const ML_PER_TBSP: f64 = 14.7868;
pub const ML_PER_FL_OZ: f64 = 29.5735;
pub const ML_PER_CUP: f64 = 236.588;
pub const ML_PER_PINT: f64 = 473.176;
pub const ML_PER_QUART: f64 = 946.353;
pub const ML_PER_LITER: f64 = 1000.0;
pub const ML_PER_GALLON: f64 = 3785.41;

// ============================================================================
// Length Conversion Constants (to millimeters)
// ============================================================================

pub const MM_PER_CM: f64 = 10.0;
pub const MM_PER_M: f64 = 1000.0;
pub const MM_PER_INCH: f64 = 25.4;
pub const MM_PER_FOOT: f64 = 304.8;

// ============================================================================
// Built-in Unit Table
// ============================================================================

/// Static definition of a built-in unit
#[derive(Debug, Clone, Copy)]
pub struct BuiltinUnit {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub to_base: f64,
    pub category: Category,
    pub aliases: &'static [&'static str],
}

impl From<&BuiltinUnit> for Unit {
    fn from(def: &BuiltinUnit) -> Self {
        Self {
            id: def.id.to_string(),
            name: def.name.to_string(),
            symbol: def.symbol.to_string(),
            to_base: def.to_base,
            category: def.category,
            aliases: def.aliases.iter().map(|a| a.to_string()).collect(),
            source: UnitSource::Builtin,
        }
    }
}

const fn unit(
    id: &'static str,
    name: &'static str,
    symbol: &'static str,
    to_base: f64,
    category: Category,
    aliases: &'static [&'static str],
) -> BuiltinUnit {
    BuiltinUnit { id, name, symbol, to_base, category, aliases }
}

/// Built-in kitchen units. Order within a category is display order; the
/// first two entries are the default from/to pair. No linear unit may have
/// a zero multiplier.
pub const BUILTIN_UNITS: &[BuiltinUnit] = &[
    // Weight
    unit("g", "Gram", "g", 1.0, Category::Weight, &["gram", "grams"]),
    unit("kg", "Kilogram", "kg", G_PER_KG, Category::Weight, &["kilogram", "kilograms"]),
    unit("mg", "Milligram", "mg", G_PER_MG, Category::Weight, &["milligram", "milligrams"]),
    unit("oz", "Ounce", "oz", G_PER_OZ, Category::Weight, &["ounce", "ounces"]),
    unit("lb", "Pound", "lb", G_PER_LB, Category::Weight, &["lbs", "pound", "pounds"]),
    unit("cup_flour", "Cup (flour)", "cup (flour)", G_PER_CUP_FLOUR, Category::Weight, &[]),
    unit("cup_sugar", "Cup (sugar)", "cup (sugar)", G_PER_CUP_SUGAR, Category::Weight, &[]),
    unit("cup_butter", "Cup (butter)", "cup (butter)", G_PER_CUP_BUTTER, Category::Weight, &[]),
    // Volume
    unit("ml", "Milliliter", "ml", 1.0, Category::Volume, &["milliliter", "milliliters", "millilitre", "millilitres"]),
    unit("l", "Liter", "L", ML_PER_LITER, Category::Volume, &["liter", "liters", "litre", "litres"]),
    unit("tsp", "Teaspoon", "tsp", ML_PER_TSP, Category::Volume, &["teaspoon", "teaspoons"]),
    unit("tbsp", "Tablespoon", "tbsp", ML_PER_TBSP, Category::Volume, &["tablespoon", "tablespoons"]),
    unit("fl_oz", "Fluid ounce", "fl oz", ML_PER_FL_OZ, Category::Volume, &["fl oz", "floz", "fluid ounce", "fluid ounces"]),
    unit("cup", "Cup", "cup", ML_PER_CUP, Category::Volume, &["cups"]),
    unit("pint", "Pint", "pt", ML_PER_PINT, Category::Volume, &["pints"]),
    unit("quart", "Quart", "qt", ML_PER_QUART, Category::Volume, &["quarts"]),
    unit("gallon", "Gallon", "gal", ML_PER_GALLON, Category::Volume, &["gallons"]),
    // Temperature
    unit("celsius", "Celsius", "°C", 1.0, Category::Temperature, &["c"]),
    unit("fahrenheit", "Fahrenheit", "°F", 1.0, Category::Temperature, &["f"]),
    unit("kelvin", "Kelvin", "K", 1.0, Category::Temperature, &["k"]),
    // Length
    unit("cm", "Centimeter", "cm", MM_PER_CM, Category::Length, &["centimeter", "centimeters"]),
    unit("inch", "Inch", "in", MM_PER_INCH, Category::Length, &["in", "inches"]),
    unit("mm", "Millimeter", "mm", 1.0, Category::Length, &["millimeter", "millimeters"]),
    unit("m", "Meter", "m", MM_PER_M, Category::Length, &["meter", "meters"]),
    unit("ft", "Foot", "ft", MM_PER_FOOT, Category::Length, &["foot", "feet"]),
];
