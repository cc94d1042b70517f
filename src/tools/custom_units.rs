//! Custom Unit MCP Tools
//!
//! Tools for managing user-defined units. Every mutation rebuilds the
//! shared registry so conversions see the change immediately.

use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::conversion::{Category, Unit, UnitRegistry};
use crate::db::Database;
use crate::models::{CustomUnit, CustomUnitCreate, CustomUnitUpdate};

/// Registry shared between tool calls
pub type SharedRegistry = Arc<RwLock<UnitRegistry>>;

/// Response for add_custom_unit
#[derive(Debug, Serialize)]
pub struct AddCustomUnitResponse {
    pub id: i64,
    pub unit_key: String,
    pub category: Category,
    pub to_base: f64,
    pub created_at: String,
}

/// Response for list_custom_units
#[derive(Debug, Serialize)]
pub struct ListCustomUnitsResponse {
    pub units: Vec<CustomUnit>,
    pub total: usize,
}

/// Response for update_custom_unit
#[derive(Debug, Serialize)]
pub struct UpdateCustomUnitResponse {
    pub success: bool,
    pub unit: CustomUnit,
}

/// Response for delete_custom_unit
#[derive(Debug, Serialize)]
pub struct DeleteCustomUnitResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Build a registry from the built-in table plus every stored custom unit
pub fn load_registry(db: &Database) -> Result<UnitRegistry, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let custom = CustomUnit::list(&conn, None)
        .map_err(|e| format!("Failed to load custom units: {}", e))?;
    Ok(UnitRegistry::with_custom_units(custom.iter().map(CustomUnit::to_unit)))
}

/// Rebuild the shared registry from the database
pub fn reload_registry(db: &Database, shared: &SharedRegistry) -> Result<usize, String> {
    let registry = load_registry(db)?;
    let count = registry.all().len();
    let mut guard = shared
        .write()
        .map_err(|_| "Unit registry lock poisoned".to_string())?;
    *guard = registry;
    tracing::info!("Unit registry reloaded with {} units", count);
    Ok(count)
}

fn validate_multiplier(to_base: f64) -> Result<(), String> {
    if !to_base.is_finite() || to_base <= 0.0 {
        return Err("to_base must be a finite number greater than 0".to_string());
    }
    Ok(())
}

/// Add a new custom unit
pub fn add_custom_unit(
    db: &Database,
    shared: &SharedRegistry,
    data: CustomUnitCreate,
) -> Result<AddCustomUnitResponse, String> {
    if data.name.trim().is_empty() {
        return Err("Unit name cannot be empty".to_string());
    }
    if data.symbol.trim().is_empty() {
        return Err("Unit symbol cannot be empty".to_string());
    }

    let candidate = Unit::custom(&data.unit_key, &data.name, &data.symbol, data.to_base, data.category);
    {
        let registry = shared
            .read()
            .map_err(|_| "Unit registry lock poisoned".to_string())?;
        registry.validate(&candidate).map_err(|e| e.to_string())?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let unit = CustomUnit::create(&conn, &data)
        .map_err(|e| format!("Failed to create custom unit: {}", e))?;
    drop(conn);

    reload_registry(db, shared)?;

    Ok(AddCustomUnitResponse {
        id: unit.id,
        unit_key: unit.unit_key,
        category: unit.category,
        to_base: unit.to_base,
        created_at: unit.created_at,
    })
}

/// Get a custom unit by ID
pub fn get_custom_unit(db: &Database, id: i64) -> Result<Option<CustomUnit>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    CustomUnit::get_by_id(&conn, id).map_err(|e| format!("Failed to get custom unit: {}", e))
}

/// List custom units, optionally within one category
pub fn list_custom_units(db: &Database, category: Option<&str>) -> Result<ListCustomUnitsResponse, String> {
    let category = category
        .map(|c| c.parse::<Category>().map_err(|e| e.to_string()))
        .transpose()?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let units = CustomUnit::list(&conn, category)
        .map_err(|e| format!("Failed to list custom units: {}", e))?;
    let total = units.len();

    Ok(ListCustomUnitsResponse { units, total })
}

/// Update a custom unit's name, symbol, multiplier or notes
pub fn update_custom_unit(
    db: &Database,
    shared: &SharedRegistry,
    id: i64,
    data: CustomUnitUpdate,
) -> Result<Option<UpdateCustomUnitResponse>, String> {
    if data.is_empty() {
        return Err("No fields to update".to_string());
    }
    if let Some(to_base) = data.to_base {
        validate_multiplier(to_base)?;
    }
    if data.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err("Unit name cannot be empty".to_string());
    }
    if data.symbol.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err("Unit symbol cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let updated = CustomUnit::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update custom unit: {}", e))?;
    drop(conn);

    match updated {
        Some(unit) => {
            reload_registry(db, shared)?;
            Ok(Some(UpdateCustomUnitResponse { success: true, unit }))
        }
        None => Ok(None),
    }
}

/// Delete a custom unit; None if no unit has this ID
pub fn delete_custom_unit(
    db: &Database,
    shared: &SharedRegistry,
    id: i64,
) -> Result<Option<DeleteCustomUnitResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = CustomUnit::delete(&conn, id)
        .map_err(|e| format!("Failed to delete custom unit: {}", e))?;
    drop(conn);

    if !deleted {
        return Ok(None);
    }
    reload_registry(db, shared)?;

    Ok(Some(DeleteCustomUnitResponse {
        success: true,
        deleted_id: id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::convert_for_display;
    use crate::db::migrations::run_migrations;

    fn setup() -> (Database, SharedRegistry) {
        let db = Database::in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        let shared = Arc::new(RwLock::new(load_registry(&db).unwrap()));
        (db, shared)
    }

    fn stick() -> CustomUnitCreate {
        CustomUnitCreate {
            unit_key: "stick_butter".to_string(),
            name: "Stick (butter)".to_string(),
            symbol: "stick".to_string(),
            category: Category::Weight,
            to_base: 113.0,
            notes: None,
        }
    }

    #[test]
    fn test_added_unit_is_convertible() {
        let (db, shared) = setup();
        add_custom_unit(&db, &shared, stick()).unwrap();

        let registry = shared.read().unwrap();
        let out = convert_for_display(&registry, Category::Weight, "stick_butter", "g", "2");
        assert_eq!(out, "226");
    }

    #[test]
    fn test_add_rejects_invalid_units() {
        let (db, shared) = setup();

        let mut temp = stick();
        temp.unit_key = "rankine".to_string();
        temp.category = Category::Temperature;
        assert!(add_custom_unit(&db, &shared, temp).is_err());

        let mut zero = stick();
        zero.to_base = 0.0;
        assert!(add_custom_unit(&db, &shared, zero).is_err());

        let mut builtin = stick();
        builtin.unit_key = "kg".to_string();
        assert!(add_custom_unit(&db, &shared, builtin).unwrap_err().contains("already exists"));

        add_custom_unit(&db, &shared, stick()).unwrap();
        assert!(add_custom_unit(&db, &shared, stick()).is_err());
    }

    #[test]
    fn test_update_changes_conversion() {
        let (db, shared) = setup();
        let added = add_custom_unit(&db, &shared, stick()).unwrap();

        let update = CustomUnitUpdate {
            to_base: Some(100.0),
            ..Default::default()
        };
        let resp = update_custom_unit(&db, &shared, added.id, update).unwrap().unwrap();
        assert_eq!(resp.unit.to_base, 100.0);

        let registry = shared.read().unwrap();
        let out = convert_for_display(&registry, Category::Weight, "stick_butter", "g", "2");
        assert_eq!(out, "200");
    }

    #[test]
    fn test_update_validation() {
        let (db, shared) = setup();
        let added = add_custom_unit(&db, &shared, stick()).unwrap();

        assert!(update_custom_unit(&db, &shared, added.id, CustomUnitUpdate::default()).is_err());
        let negative = CustomUnitUpdate {
            to_base: Some(-3.0),
            ..Default::default()
        };
        assert!(update_custom_unit(&db, &shared, added.id, negative).is_err());

        let missing = CustomUnitUpdate {
            notes: Some("x".to_string()),
            ..Default::default()
        };
        assert!(update_custom_unit(&db, &shared, 999, missing).unwrap().is_none());
    }

    #[test]
    fn test_delete_removes_from_registry() {
        let (db, shared) = setup();
        let added = add_custom_unit(&db, &shared, stick()).unwrap();

        let resp = delete_custom_unit(&db, &shared, added.id).unwrap().unwrap();
        assert_eq!(resp.deleted_id, added.id);
        assert!(shared.read().unwrap().get("stick_butter").is_none());
        assert!(delete_custom_unit(&db, &shared, added.id).unwrap().is_none());
    }

    #[test]
    fn test_list_custom_units() {
        let (db, shared) = setup();
        add_custom_unit(&db, &shared, stick()).unwrap();

        assert_eq!(list_custom_units(&db, None).unwrap().total, 1);
        assert_eq!(list_custom_units(&db, Some("volume")).unwrap().total, 0);
        assert!(list_custom_units(&db, Some("temperature ")).unwrap().units.is_empty());
        assert!(list_custom_units(&db, Some("speed")).is_err());

        let id = list_custom_units(&db, None).unwrap().units[0].id;
        assert_eq!(get_custom_unit(&db, id).unwrap().unwrap().unit_key, "stick_butter");
    }
}
