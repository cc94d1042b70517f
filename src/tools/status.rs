//! SKM Status Tool
//!
//! Provides runtime status information about the SKM service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{migrations, Database};
use crate::models::CustomUnit;

/// Unit conversion instructions for AI assistants
pub const CONVERSION_INSTRUCTIONS: &str = r#"
# SKM Unit Conversion Instructions

The Smart Kitchen Manager converts kitchen quantities between units of the
same category. Cross-category conversion (e.g. cups of flour to ml) is not
possible unless a unit exists for it in the target category.

## Categories

| Category | Base unit | Notes |
|----------|-----------|-------|
| weight | g | includes ingredient cups: cup_flour, cup_sugar, cup_butter |
| volume | ml | tsp, tbsp, fl_oz, cup, pint, quart, gallon, l |
| temperature | - | celsius, fahrenheit, kelvin (not extensible) |
| length | mm | mm, cm, m, inch, ft |

Call `list_categories` or `list_units` to see the current table, including
custom units.

## Converting

`convert_units` takes `category`, `from_unit`, `to_unit` and `value` (a
string, exactly as typed). Units accept ids or common names ("tablespoons",
"grams").

- The result is shown with up to 6 decimals, trailing zeros removed
  ("2.5", "3", "176.666667").
- If the value is empty or not a number, or a unit is unknown, the result is
  "0" and the `error` field explains why. Always check `error` before
  reporting "0" to the user.
- An unknown category is a hard error.

`swap_conversion` flips source and target and recomputes from the previous
result.

## Custom Units

Use `add_custom_unit` for ingredient-specific measures, e.g. a cup of rice:

- `unit_key: "cup_rice"`, `category: "weight"`, `to_base: 185` (grams per cup)

Rules:
- `to_base` is the amount of the category base unit (g, ml, mm) in ONE of
  the new unit, and must be greater than 0
- temperature units cannot be added
- the key must not clash with an existing unit id or alias

Update multipliers with `update_custom_unit`; remove with
`delete_custom_unit`.
"#;

/// Current status of the SKM service
#[derive(Debug, Clone, Serialize)]
pub struct SkmStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: Option<i32>,
    pub custom_unit_count: Option<i64>,

    /// Process information
    pub started_at: String,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    started_at: String,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            database_path,
        }
    }

    /// Get the current status; database figures are omitted if unavailable
    pub fn get_status(&self, db: &Database) -> SkmStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let (schema_version, custom_unit_count) = match db.get_conn() {
            Ok(conn) => (
                migrations::get_schema_version(&conn).ok(),
                CustomUnit::count(&conn).ok(),
            ),
            Err(e) => {
                tracing::warn!("Status check could not reach database: {}", e);
                (None, None)
            }
        };

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        SkmStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            custom_unit_count,
            started_at: self.started_at.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
