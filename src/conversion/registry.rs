//! Unit registry
//!
//! Lookup over the built-in unit table, optionally extended with custom
//! units. A registry is built once and then only read; adding custom units
//! at runtime means building a new registry and swapping it in.

use std::sync::OnceLock;

use thiserror::Error;

use super::units::{Category, Unit, BUILTIN_UNITS};

/// Reasons a unit cannot be registered
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Unit key cannot be empty")]
    EmptyKey,

    #[error("Temperature scales are not linear; custom temperature units are not supported")]
    TemperatureNotExtensible,

    #[error("Unit '{key}' needs a finite multiplier greater than 0, got {to_base}")]
    InvalidMultiplier { key: String, to_base: f64 },

    #[error("Unit '{0}' already exists")]
    DuplicateUnit(String),
}

/// Immutable-after-build unit lookup
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: Vec<Unit>,
}

impl UnitRegistry {
    /// Registry holding only the built-in table
    pub fn builtin() -> Self {
        Self {
            units: BUILTIN_UNITS.iter().map(Unit::from).collect(),
        }
    }

    /// Built-in table plus custom units. Rows that fail validation are
    /// skipped so one bad stored unit cannot take the converter down.
    pub fn with_custom_units<I>(custom: I) -> Self
    where
        I: IntoIterator<Item = Unit>,
    {
        let mut registry = Self::builtin();
        for unit in custom {
            let id = unit.id.clone();
            if let Err(e) = registry.register(unit) {
                tracing::warn!("Skipping custom unit '{}': {}", id, e);
            }
        }
        registry
    }

    /// Validate a custom unit against the registry without adding it
    pub fn validate(&self, unit: &Unit) -> Result<(), RegistryError> {
        if unit.id.trim().is_empty() {
            return Err(RegistryError::EmptyKey);
        }
        if !unit.category.is_linear() {
            return Err(RegistryError::TemperatureNotExtensible);
        }
        if !unit.to_base.is_finite() || unit.to_base <= 0.0 {
            return Err(RegistryError::InvalidMultiplier {
                key: unit.id.clone(),
                to_base: unit.to_base,
            });
        }
        let taken = std::iter::once(&unit.id)
            .chain(unit.aliases.iter())
            .find(|key| self.get(key).is_some());
        if let Some(key) = taken {
            return Err(RegistryError::DuplicateUnit(key.clone()));
        }
        Ok(())
    }

    /// Add a unit to this registry
    pub fn register(&mut self, unit: Unit) -> Result<(), RegistryError> {
        self.validate(&unit)?;
        self.units.push(unit);
        Ok(())
    }

    /// Find a unit by id or alias anywhere in the registry
    pub fn get(&self, key: &str) -> Option<&Unit> {
        let key = key.trim().to_lowercase();
        self.units.iter().find(|u| u.matches(&key))
    }

    /// Find a unit by id or alias within one category
    pub fn find(&self, category: Category, key: &str) -> Option<&Unit> {
        self.get(key).filter(|u| u.category == category)
    }

    /// Units of a category in display order
    pub fn units(&self, category: Category) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.category == category)
    }

    pub fn all(&self) -> &[Unit] {
        &self.units
    }

    pub fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    /// Default from/to selection for a category (its first two units)
    pub fn default_pair(&self, category: Category) -> Option<(&Unit, &Unit)> {
        let mut units = self.units(category);
        let from = units.next()?;
        let to = units.next().unwrap_or(from);
        Some((from, to))
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Process-wide built-in registry, built on first use
pub fn builtin_registry() -> &'static UnitRegistry {
    static REGISTRY: OnceLock<UnitRegistry> = OnceLock::new();
    REGISTRY.get_or_init(UnitRegistry::builtin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_id_and_alias() {
        let registry = UnitRegistry::builtin();
        assert_eq!(registry.find(Category::Weight, "kg").unwrap().id, "kg");
        assert_eq!(registry.find(Category::Weight, "Grams").unwrap().id, "g");
        assert_eq!(registry.find(Category::Volume, " tablespoon ").unwrap().id, "tbsp");
        assert_eq!(registry.find(Category::Length, "in").unwrap().id, "inch");
    }

    #[test]
    fn test_find_is_category_scoped() {
        let registry = UnitRegistry::builtin();
        assert!(registry.find(Category::Volume, "kg").is_none());
        assert!(registry.find(Category::Weight, "nope").is_none());
    }

    #[test]
    fn test_default_pairs() {
        let registry = UnitRegistry::builtin();
        let expected = [
            (Category::Weight, "g", "kg"),
            (Category::Volume, "ml", "l"),
            (Category::Temperature, "celsius", "fahrenheit"),
            (Category::Length, "cm", "inch"),
        ];
        assert_eq!(expected.len(), Category::ALL.len());
        for (category, from_id, to_id) in expected {
            let (from, to) = registry.default_pair(category).unwrap();
            assert_eq!((from.id.as_str(), to.id.as_str()), (from_id, to_id), "{}", category);
        }
    }

    #[test]
    fn test_register_custom_unit() {
        let mut registry = UnitRegistry::builtin();
        let unit = Unit::custom("Cup_Rice", "Cup (rice)", "cup (rice)", 185.0, Category::Weight);
        registry.register(unit).unwrap();
        let found = registry.find(Category::Weight, "cup_rice").unwrap();
        assert_eq!(found.to_base, 185.0);
    }

    #[test]
    fn test_register_rejects_invalid_units() {
        let mut registry = UnitRegistry::builtin();

        let temp = Unit::custom("rankine", "Rankine", "°R", 1.0, Category::Temperature);
        assert_eq!(registry.register(temp), Err(RegistryError::TemperatureNotExtensible));

        let zero = Unit::custom("nothing", "Nothing", "-", 0.0, Category::Weight);
        assert!(matches!(
            registry.register(zero),
            Err(RegistryError::InvalidMultiplier { .. })
        ));

        let nan = Unit::custom("nan_unit", "NaN", "-", f64::NAN, Category::Length);
        assert!(matches!(
            registry.register(nan),
            Err(RegistryError::InvalidMultiplier { .. })
        ));

        let dup = Unit::custom("grams", "Grams again", "g", 1.0, Category::Weight);
        assert_eq!(
            registry.register(dup),
            Err(RegistryError::DuplicateUnit("grams".to_string()))
        );

        let empty = Unit::custom("  ", "Blank", "-", 1.0, Category::Weight);
        assert_eq!(registry.register(empty), Err(RegistryError::EmptyKey));
    }

    #[test]
    fn test_with_custom_units_skips_invalid() {
        let registry = UnitRegistry::with_custom_units(vec![
            Unit::custom("stick_butter", "Stick (butter)", "stick", 113.0, Category::Weight),
            Unit::custom("bad", "Bad", "-", -1.0, Category::Weight),
        ]);
        assert!(registry.get("stick_butter").is_some());
        assert!(registry.get("bad").is_none());
        assert_eq!(registry.all().len(), BUILTIN_UNITS.len() + 1);
    }

    #[test]
    fn test_builtin_registry_is_shared() {
        let a = builtin_registry() as *const UnitRegistry;
        let b = builtin_registry() as *const UnitRegistry;
        assert_eq!(a, b);
    }
}
