//! Converter state
//!
//! The selection and values of one converter widget. Every change recomputes
//! the output with the display policy, so `to_value` is always showable.

use serde::{Deserialize, Serialize};

use super::converter::{convert_for_display, ConversionRequest};
use super::format::clipboard_text;
use super::registry::UnitRegistry;
use super::units::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterState {
    pub category: Category,
    pub from_unit: String,
    pub to_unit: String,
    /// What the user typed
    pub from_value: String,
    /// Formatted conversion of `from_value`
    pub to_value: String,
}

impl ConverterState {
    /// Fresh state for `category` with its default unit pair
    pub fn new(registry: &UnitRegistry, category: Category) -> Self {
        let (from_unit, to_unit) = default_units(registry, category);
        Self {
            category,
            from_unit,
            to_unit,
            from_value: String::new(),
            to_value: "0".to_string(),
        }
    }

    /// Restore a state from explicit selections and recompute the output
    pub fn with_selection(
        registry: &UnitRegistry,
        category: Category,
        from_unit: &str,
        to_unit: &str,
        from_value: &str,
    ) -> Self {
        let mut state = Self {
            category,
            from_unit: from_unit.trim().to_string(),
            to_unit: to_unit.trim().to_string(),
            from_value: from_value.to_string(),
            to_value: String::new(),
        };
        state.recompute(registry);
        state
    }

    /// Switch category; unit selections reset to the new category's defaults
    pub fn set_category(&mut self, registry: &UnitRegistry, category: Category) {
        if self.category == category {
            return;
        }
        let (from_unit, to_unit) = default_units(registry, category);
        self.category = category;
        self.from_unit = from_unit;
        self.to_unit = to_unit;
        self.recompute(registry);
    }

    pub fn set_from_unit(&mut self, registry: &UnitRegistry, unit: &str) {
        self.from_unit = unit.trim().to_string();
        self.recompute(registry);
    }

    pub fn set_to_unit(&mut self, registry: &UnitRegistry, unit: &str) {
        self.to_unit = unit.trim().to_string();
        self.recompute(registry);
    }

    pub fn set_input(&mut self, registry: &UnitRegistry, input: &str) {
        self.from_value = input.to_string();
        self.recompute(registry);
    }

    /// Exchange units and values, then recompute from the new input.
    /// Swapping twice lands back on the original input (up to display
    /// rounding).
    pub fn swap(&mut self, registry: &UnitRegistry) {
        std::mem::swap(&mut self.from_unit, &mut self.to_unit);
        std::mem::swap(&mut self.from_value, &mut self.to_value);
        self.recompute(registry);
    }

    /// Converted value with the target symbol, e.g. "2.5 kg"
    pub fn clipboard_text(&self, registry: &UnitRegistry) -> String {
        let symbol = registry
            .find(self.category, &self.to_unit)
            .map(|u| u.symbol.as_str())
            .unwrap_or(self.to_unit.as_str());
        clipboard_text(&self.to_value, symbol)
    }

    /// The request this state currently represents
    pub fn request(&self) -> ConversionRequest {
        ConversionRequest::new(self.category, &self.from_unit, &self.to_unit, &self.from_value)
    }

    fn recompute(&mut self, registry: &UnitRegistry) {
        self.to_value = convert_for_display(
            registry,
            self.category,
            &self.from_unit,
            &self.to_unit,
            &self.from_value,
        );
    }
}

fn default_units(registry: &UnitRegistry, category: Category) -> (String, String) {
    registry
        .default_pair(category)
        .map(|(from, to)| (from.id.clone(), to.id.clone()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_uses_defaults() {
        let registry = UnitRegistry::builtin();
        let state = ConverterState::new(&registry, Category::Volume);
        assert_eq!(state.from_unit, "ml");
        assert_eq!(state.to_unit, "l");
        assert_eq!(state.from_value, "");
        assert_eq!(state.to_value, "0");
    }

    #[test]
    fn test_input_recomputes_output() {
        let registry = UnitRegistry::builtin();
        let mut state = ConverterState::new(&registry, Category::Weight);
        state.set_input(&registry, "2500");
        assert_eq!(state.to_value, "2.5");
        assert_eq!(state.clipboard_text(&registry), "2.5 kg");

        state.set_input(&registry, "25x");
        assert_eq!(state.to_value, "0");
    }

    #[test]
    fn test_unit_changes_recompute_output() {
        let registry = UnitRegistry::builtin();
        let mut state = ConverterState::new(&registry, Category::Weight);
        state.set_input(&registry, "1");
        state.set_from_unit(&registry, "cup_flour");
        state.set_to_unit(&registry, "g");
        assert_eq!(state.to_value, "120");
    }

    #[test]
    fn test_category_change_resets_units() {
        let registry = UnitRegistry::builtin();
        let mut state = ConverterState::new(&registry, Category::Weight);
        state.set_input(&registry, "100");
        state.set_category(&registry, Category::Temperature);
        assert_eq!(state.from_unit, "celsius");
        assert_eq!(state.to_unit, "fahrenheit");
        assert_eq!(state.to_value, "212");
    }

    #[test]
    fn test_swap_round_trip() {
        let registry = UnitRegistry::builtin();
        let mut state = ConverterState::with_selection(&registry, Category::Length, "inch", "cm", "3");
        assert_eq!(state.to_value, "7.62");

        state.swap(&registry);
        assert_eq!(state.from_unit, "cm");
        assert_eq!(state.to_unit, "inch");
        assert_eq!(state.from_value, "7.62");
        assert_eq!(state.to_value, "3");

        state.swap(&registry);
        assert_eq!(state.from_unit, "inch");
        let back: f64 = state.from_value.parse().unwrap();
        assert!((back - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_swap_temperature() {
        let registry = UnitRegistry::builtin();
        let mut state =
            ConverterState::with_selection(&registry, Category::Temperature, "fahrenheit", "celsius", "350");
        assert_eq!(state.to_value, "176.666667");
        state.swap(&registry);
        let back: f64 = state.to_value.parse().unwrap();
        assert!((back - 350.0).abs() < 1e-5);
    }

    #[test]
    fn test_request_reflects_state() {
        let registry = UnitRegistry::builtin();
        let state = ConverterState::with_selection(&registry, Category::Weight, "lb", "oz", "1");
        let request = state.request();
        assert_eq!(request.from_unit, "lb");
        assert_eq!(request.to_unit, "oz");
        assert_eq!(request.input, "1");
    }
}
