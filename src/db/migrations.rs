//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        tracing::info!("Applying schema migration v1");
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: custom units
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- CUSTOM UNITS
        -- User-defined linear units layered over the built-in table
        -- ============================================
        CREATE TABLE custom_units (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            unit_key TEXT NOT NULL UNIQUE,       -- lookup id, e.g. "cup_rice"
            name TEXT NOT NULL,
            symbol TEXT NOT NULL,
            category TEXT NOT NULL CHECK(category IN ('weight', 'volume', 'length')),
            to_base REAL NOT NULL CHECK(to_base > 0),  -- multiplier to g / ml / mm

            -- Metadata
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_custom_units_category ON custom_units(category);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap());

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_schema_rejects_temperature_and_zero_multiplier() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let temp = conn.execute(
            "INSERT INTO custom_units (unit_key, name, symbol, category, to_base)
             VALUES ('rankine', 'Rankine', 'R', 'temperature', 1.0)",
            [],
        );
        assert!(temp.is_err());

        let zero = conn.execute(
            "INSERT INTO custom_units (unit_key, name, symbol, category, to_base)
             VALUES ('zero', 'Zero', 'z', 'weight', 0)",
            [],
        );
        assert!(zero.is_err());
    }
}
