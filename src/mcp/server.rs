//! SKM MCP Server Implementation
//!
//! Implements the MCP server with all SKM tools.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::conversion::{Category, UnitRegistry};
use crate::db::Database;
use crate::models::{CustomUnitCreate, CustomUnitUpdate};
use crate::tools::conversions;
use crate::tools::custom_units::{self, SharedRegistry};
use crate::tools::status::StatusTracker;

/// SKM MCP Service
#[derive(Clone)]
pub struct SkmService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    registry: SharedRegistry,
    tool_router: ToolRouter<SkmService>,
}

impl SkmService {
    pub fn new(database_path: PathBuf, database: Database, registry: UnitRegistry) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            registry: Arc::new(RwLock::new(registry)),
            tool_router: Self::tool_router(),
        }
    }

    /// Run `f` against the current registry
    fn with_registry<T>(&self, f: impl FnOnce(&UnitRegistry) -> T) -> Result<T, McpError> {
        let registry = self
            .registry
            .read()
            .map_err(|_| McpError::internal_error("Unit registry lock poisoned", None))?;
        Ok(f(&registry))
    }
}

/// Serialize a tool response as pretty JSON text content
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(kind: &str, id: i64) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        kind, id
    ))]))
}

// ============================================================================
// Conversion Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertUnitsParams {
    /// Category: weight, volume, temperature, or length
    pub category: String,
    /// Source unit id or name (e.g. "cup_flour", "tbsp", "fahrenheit")
    pub from_unit: String,
    /// Target unit id or name
    pub to_unit: String,
    /// Quantity as typed (e.g. "1.5"); empty or non-numeric yields "0"
    pub value: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SwapConversionParams {
    /// Category: weight, volume, temperature, or length
    pub category: String,
    /// Current source unit
    pub from_unit: String,
    /// Current target unit
    pub to_unit: String,
    /// Current source value
    pub from_value: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListUnitsParams {
    /// Restrict to one category (optional)
    pub category: Option<String>,
}

// ============================================================================
// Custom Unit Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddCustomUnitParams {
    /// Lookup key, e.g. "cup_rice"
    pub unit_key: String,
    /// Display name, e.g. "Cup (rice)"
    pub name: String,
    /// Display symbol, e.g. "cup (rice)"
    pub symbol: String,
    /// Category: weight, volume, or length
    pub category: String,
    /// Amount of the base unit (g, ml, mm) in one of this unit
    pub to_base: f64,
    /// Optional notes
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetCustomUnitParams {
    /// Custom unit ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListCustomUnitsParams {
    /// Restrict to one category (optional)
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateCustomUnitParams {
    /// Custom unit ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New symbol (optional)
    pub symbol: Option<String>,
    /// New base multiplier (optional)
    pub to_base: Option<f64>,
    /// New notes (optional); an empty string clears them
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteCustomUnitParams {
    /// Custom unit ID to delete
    pub id: i64,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl SkmService {
    // --- Status ---

    #[tool(description = "Get the current status of the SKM service including build info, database status, and process information")]
    async fn skm_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        json_result(&status)
    }

    #[tool(description = "Get instructions for converting kitchen units and managing custom units. Call this when unsure how to use the conversion tools.")]
    fn conversion_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CONVERSION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CONVERSION_INSTRUCTIONS)]))
    }

    // --- Conversions ---

    #[tool(description = "Convert a quantity between two units of the same category (weight, volume, temperature, length). Invalid input yields value \"0\" with an error note.")]
    fn convert_units(&self, Parameters(p): Parameters<ConvertUnitsParams>) -> Result<CallToolResult, McpError> {
        let result = self
            .with_registry(|r| conversions::convert_units(r, &p.category, &p.from_unit, &p.to_unit, &p.value))?
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Swap the source and target of a conversion and recompute from the previous result")]
    fn swap_conversion(&self, Parameters(p): Parameters<SwapConversionParams>) -> Result<CallToolResult, McpError> {
        let result = self
            .with_registry(|r| conversions::swap_conversion(r, &p.category, &p.from_unit, &p.to_unit, &p.from_value))?
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List the supported categories with base unit and default unit pair")]
    fn list_categories(&self) -> Result<CallToolResult, McpError> {
        let result = self.with_registry(conversions::list_categories)?;
        json_result(&result)
    }

    #[tool(description = "List available units (built-in and custom), optionally for one category")]
    fn list_units(&self, Parameters(p): Parameters<ListUnitsParams>) -> Result<CallToolResult, McpError> {
        let result = self
            .with_registry(|r| conversions::list_units(r, p.category.as_deref()))?
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Custom Units ---

    #[tool(description = "Add a custom unit (e.g. cup of rice = 185 g). Temperature units cannot be added; to_base must be greater than 0.")]
    fn add_custom_unit(&self, Parameters(p): Parameters<AddCustomUnitParams>) -> Result<CallToolResult, McpError> {
        let category = p
            .category
            .parse::<Category>()
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let data = CustomUnitCreate {
            unit_key: p.unit_key,
            name: p.name,
            symbol: p.symbol,
            category,
            to_base: p.to_base,
            notes: p.notes,
        };
        let result = custom_units::add_custom_unit(&self.database, &self.registry, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a custom unit by ID")]
    fn get_custom_unit(&self, Parameters(p): Parameters<GetCustomUnitParams>) -> Result<CallToolResult, McpError> {
        let result = custom_units::get_custom_unit(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(unit) => json_result(&unit),
            None => not_found("Custom unit", p.id),
        }
    }

    #[tool(description = "List custom units, optionally filtered by category")]
    fn list_custom_units(&self, Parameters(p): Parameters<ListCustomUnitsParams>) -> Result<CallToolResult, McpError> {
        let result = custom_units::list_custom_units(&self.database, p.category.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a custom unit's name, symbol, multiplier, or notes")]
    fn update_custom_unit(&self, Parameters(p): Parameters<UpdateCustomUnitParams>) -> Result<CallToolResult, McpError> {
        let data = CustomUnitUpdate {
            name: p.name,
            symbol: p.symbol,
            to_base: p.to_base,
            notes: p.notes,
        };
        let result = custom_units::update_custom_unit(&self.database, &self.registry, p.id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(resp) => json_result(&resp),
            None => not_found("Custom unit", p.id),
        }
    }

    #[tool(description = "Delete a custom unit")]
    fn delete_custom_unit(&self, Parameters(p): Parameters<DeleteCustomUnitParams>) -> Result<CallToolResult, McpError> {
        let result = custom_units::delete_custom_unit(&self.database, &self.registry, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(resp) => json_result(&resp),
            None => not_found("Custom unit", p.id),
        }
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for SkmService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "skm".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Smart Kitchen Manager Unit Converter".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Smart Kitchen Manager (SKM) - kitchen unit conversion. \
                 Call conversion_instructions first if unsure. \
                 Convert: convert_units, swap_conversion. \
                 Browse: list_categories, list_units. \
                 Custom units: add/get/list/update/delete_custom_unit. \
                 Status: skm_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use rmcp::model::ErrorCode;

    fn service() -> SkmService {
        let database = Database::in_memory().unwrap();
        database.with_conn(run_migrations).unwrap();
        SkmService::new(PathBuf::from(":memory:"), database, UnitRegistry::builtin())
    }

    fn text(result: &CallToolResult) -> String {
        result.content[0].as_text().unwrap().text.clone()
    }

    #[test]
    fn test_convert_units_tool() {
        let service = service();
        let result = service
            .convert_units(Parameters(ConvertUnitsParams {
                category: "weight".to_string(),
                from_unit: "cup_flour".to_string(),
                to_unit: "g".to_string(),
                value: "2".to_string(),
            }))
            .unwrap();
        assert!(text(&result).contains("\"240\""));
    }

    #[test]
    fn test_tool_errors_are_internal_errors() {
        let service = service();

        let err = service
            .convert_units(Parameters(ConvertUnitsParams {
                category: "speed".to_string(),
                from_unit: "g".to_string(),
                to_unit: "kg".to_string(),
                value: "1".to_string(),
            }))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);

        let err = service
            .swap_conversion(Parameters(SwapConversionParams {
                category: "speed".to_string(),
                from_unit: "g".to_string(),
                to_unit: "kg".to_string(),
                from_value: "1".to_string(),
            }))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);

        let err = service
            .list_units(Parameters(ListUnitsParams {
                category: Some("speed".to_string()),
            }))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn test_missing_custom_unit_is_not_found() {
        let service = service();

        let get = service
            .get_custom_unit(Parameters(GetCustomUnitParams { id: 42 }))
            .unwrap();
        let delete = service
            .delete_custom_unit(Parameters(DeleteCustomUnitParams { id: 42 }))
            .unwrap();
        assert_eq!(text(&get), text(&delete));
        assert!(text(&delete).contains("not found"));
    }
}
