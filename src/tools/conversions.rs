//! Conversion MCP Tools
//!
//! Tools for converting quantities and browsing the unit table.

use serde::Serialize;

use crate::conversion::{convert, Category, ConverterState, Unit, UnitRegistry, UnitSource};

/// Response for convert_units
#[derive(Debug, Serialize)]
pub struct ConvertUnitsResponse {
    pub category: Category,
    pub from_unit: String,
    pub to_unit: String,
    pub input: String,
    /// Display value; "0" when the input could not be converted
    pub value: String,
    /// Full-precision value, absent when the input could not be converted
    pub numeric_value: Option<f64>,
    pub symbol: String,
    pub clipboard_text: String,
    pub error: Option<String>,
}

/// Response for swap_conversion
#[derive(Debug, Serialize)]
pub struct SwapConversionResponse {
    pub before: ConverterState,
    pub after: ConverterState,
    pub clipboard_text: String,
}

/// Summary of one unit for list results
#[derive(Debug, Serialize)]
pub struct UnitSummary {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub category: Category,
    /// Multiplier to the base unit; absent for temperature
    pub to_base: Option<f64>,
    pub aliases: Vec<String>,
    pub source: UnitSource,
}

impl From<&Unit> for UnitSummary {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id.clone(),
            name: unit.name.clone(),
            symbol: unit.symbol.clone(),
            category: unit.category,
            to_base: unit.category.is_linear().then_some(unit.to_base),
            aliases: unit.aliases.clone(),
            source: unit.source,
        }
    }
}

/// Response for list_units
#[derive(Debug, Serialize)]
pub struct ListUnitsResponse {
    pub units: Vec<UnitSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub base_unit: Option<&'static str>,
    pub linear: bool,
    pub unit_count: usize,
    pub default_from: Option<String>,
    pub default_to: Option<String>,
}

/// Response for list_categories
#[derive(Debug, Serialize)]
pub struct ListCategoriesResponse {
    pub categories: Vec<CategorySummary>,
}

fn parse_category(category: &str) -> Result<Category, String> {
    category.parse::<Category>().map_err(|e| {
        format!(
            "{}. Expected one of: weight, volume, temperature, length",
            e
        )
    })
}

/// Convert a quantity. Input problems (empty or malformed value, unknown
/// unit) still succeed with value "0" and an `error` note; an unknown
/// category is an error.
pub fn convert_units(
    registry: &UnitRegistry,
    category: &str,
    from_unit: &str,
    to_unit: &str,
    value: &str,
) -> Result<ConvertUnitsResponse, String> {
    let category = parse_category(category)?;

    match convert(registry, category, from_unit, to_unit, value) {
        Ok(result) => Ok(ConvertUnitsResponse {
            category,
            clipboard_text: result.clipboard_text(),
            from_unit: result.from_unit,
            to_unit: result.to_unit,
            input: value.to_string(),
            value: result.formatted,
            numeric_value: Some(result.value),
            symbol: result.symbol,
            error: None,
        }),
        Err(e) if e.is_input_error() => {
            tracing::debug!("convert_units input error: {}", e);
            let symbol = registry
                .find(category, to_unit)
                .map(|u| u.symbol.clone())
                .unwrap_or_else(|| to_unit.trim().to_string());
            Ok(ConvertUnitsResponse {
                category,
                from_unit: from_unit.trim().to_string(),
                to_unit: to_unit.trim().to_string(),
                input: value.to_string(),
                value: "0".to_string(),
                numeric_value: None,
                clipboard_text: format!("0 {}", symbol),
                symbol,
                error: Some(e.to_string()),
            })
        }
        Err(e) => Err(e.to_string()),
    }
}

/// Swap source and target of a conversion and recompute
pub fn swap_conversion(
    registry: &UnitRegistry,
    category: &str,
    from_unit: &str,
    to_unit: &str,
    from_value: &str,
) -> Result<SwapConversionResponse, String> {
    let category = parse_category(category)?;

    let before = ConverterState::with_selection(registry, category, from_unit, to_unit, from_value);
    let mut after = before.clone();
    after.swap(registry);
    let clipboard_text = after.clipboard_text(registry);

    Ok(SwapConversionResponse {
        before,
        after,
        clipboard_text,
    })
}

/// List units, optionally within one category
pub fn list_units(registry: &UnitRegistry, category: Option<&str>) -> Result<ListUnitsResponse, String> {
    let units: Vec<UnitSummary> = match category {
        Some(c) => {
            let category = parse_category(c)?;
            registry.units(category).map(UnitSummary::from).collect()
        }
        None => registry.all().iter().map(UnitSummary::from).collect(),
    };
    let total = units.len();

    Ok(ListUnitsResponse { units, total })
}

/// List the supported categories with their base and default units
pub fn list_categories(registry: &UnitRegistry) -> ListCategoriesResponse {
    let categories = registry
        .categories()
        .iter()
        .map(|&category| {
            let default_pair = registry.default_pair(category);
            CategorySummary {
                category,
                base_unit: category.base_unit(),
                linear: category.is_linear(),
                unit_count: registry.units(category).count(),
                default_from: default_pair.map(|(from, _)| from.id.clone()),
                default_to: default_pair.map(|(_, to)| to.id.clone()),
            }
        })
        .collect();

    ListCategoriesResponse { categories }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_units_success() {
        let registry = UnitRegistry::builtin();
        let resp = convert_units(&registry, "weight", "g", "kg", "2500").unwrap();
        assert_eq!(resp.value, "2.5");
        assert_eq!(resp.numeric_value, Some(2.5));
        assert_eq!(resp.clipboard_text, "2.5 kg");
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_convert_units_accepts_aliases() {
        let registry = UnitRegistry::builtin();
        let resp = convert_units(&registry, "Volume", "Tablespoons", "ml", "2").unwrap();
        assert_eq!(resp.from_unit, "tbsp");
        assert_eq!(resp.value, "29.5736");
    }

    #[test]
    fn test_convert_units_input_error_shows_zero() {
        let registry = UnitRegistry::builtin();
        let resp = convert_units(&registry, "length", "inch", "cm", "abc").unwrap();
        assert_eq!(resp.value, "0");
        assert_eq!(resp.numeric_value, None);
        assert_eq!(resp.clipboard_text, "0 cm");
        assert!(resp.error.unwrap().contains("abc"));

        let resp = convert_units(&registry, "length", "furlong", "cm", "1").unwrap();
        assert_eq!(resp.value, "0");
        assert!(resp.error.is_some());
    }

    #[test]
    fn test_convert_units_unknown_category_is_error() {
        let registry = UnitRegistry::builtin();
        let err = convert_units(&registry, "speed", "kmh", "mph", "1").unwrap_err();
        assert!(err.contains("speed"));
    }

    #[test]
    fn test_swap_conversion() {
        let registry = UnitRegistry::builtin();
        let resp = swap_conversion(&registry, "weight", "cup_flour", "g", "2").unwrap();
        assert_eq!(resp.before.to_value, "240");
        assert_eq!(resp.after.from_unit, "g");
        assert_eq!(resp.after.to_unit, "cup_flour");
        assert_eq!(resp.after.from_value, "240");
        assert_eq!(resp.after.to_value, "2");
        assert_eq!(resp.clipboard_text, "2 cup (flour)");
    }

    #[test]
    fn test_list_units() {
        let registry = UnitRegistry::builtin();
        let temps = list_units(&registry, Some("temperature")).unwrap();
        assert_eq!(temps.total, 3);
        assert!(temps.units.iter().all(|u| u.to_base.is_none()));

        let all = list_units(&registry, None).unwrap();
        assert_eq!(all.total, registry.all().len());

        assert!(list_units(&registry, Some("time")).is_err());
    }

    #[test]
    fn test_list_categories() {
        let registry = UnitRegistry::builtin();
        let resp = list_categories(&registry);
        assert_eq!(resp.categories.len(), 4);
        let length = resp
            .categories
            .iter()
            .find(|c| c.category == Category::Length)
            .unwrap();
        assert_eq!(length.base_unit, Some("mm"));
        assert_eq!(length.default_from.as_deref(), Some("cm"));
        assert_eq!(length.default_to.as_deref(), Some("inch"));
    }
}
