//! Custom unit model
//!
//! User-defined linear units stored in SQLite and layered over the built-in
//! unit table (e.g. "cup_rice" = 185 g).

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::conversion::{Category, Unit};
use crate::db::DbResult;

/// A stored custom unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomUnit {
    pub id: i64,
    pub unit_key: String,
    pub name: String,
    pub symbol: String,
    pub category: Category,
    pub to_base: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a custom unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomUnitCreate {
    pub unit_key: String,
    pub name: String,
    pub symbol: String,
    pub category: Category,
    pub to_base: f64,
    pub notes: Option<String>,
}

/// Data for updating a custom unit. Key and category are fixed once created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomUnitUpdate {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub to_base: Option<f64>,
    pub notes: Option<String>,
}

impl CustomUnitUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.symbol.is_none() && self.to_base.is_none() && self.notes.is_none()
    }
}

impl CustomUnit {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let category: String = row.get("category")?;
        let category = category
            .parse::<Category>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

        Ok(Self {
            id: row.get("id")?,
            unit_key: row.get("unit_key")?,
            name: row.get("name")?,
            symbol: row.get("symbol")?,
            category,
            to_base: row.get("to_base")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Registry form of this unit
    pub fn to_unit(&self) -> Unit {
        Unit::custom(&self.unit_key, &self.name, &self.symbol, self.to_base, self.category)
    }

    /// Insert a new custom unit
    pub fn create(conn: &Connection, data: &CustomUnitCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO custom_units (unit_key, name, symbol, category, to_base, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                data.unit_key.trim().to_lowercase(),
                data.name.trim(),
                data.symbol.trim(),
                data.category.as_str(),
                data.to_base,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a custom unit by row ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM custom_units WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(unit) => Ok(Some(unit)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a custom unit by its lookup key
    pub fn get_by_key(conn: &Connection, key: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM custom_units WHERE unit_key = ?1")?;

        match stmt.query_row([key.trim().to_lowercase()], Self::from_row) {
            Ok(unit) => Ok(Some(unit)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List custom units, optionally within one category
    pub fn list(conn: &Connection, category: Option<Category>) -> DbResult<Vec<Self>> {
        let units = match category {
            Some(category) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM custom_units WHERE category = ?1 ORDER BY unit_key ASC",
                )?;
                let units = stmt
                    .query_map([category.as_str()], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                units
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT * FROM custom_units ORDER BY category ASC, unit_key ASC")?;
                let units = stmt
                    .query_map([], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                units
            }
        };
        Ok(units)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM custom_units", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Apply an update; returns the updated unit, or None if it does not exist
    pub fn update(conn: &Connection, id: i64, data: &CustomUnitUpdate) -> DbResult<Option<Self>> {
        let Some(existing) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };

        // Empty notes clear the stored value
        let notes = match data.notes.as_deref().map(str::trim) {
            Some("") => None,
            Some(notes) => Some(notes),
            None => existing.notes.as_deref(),
        };

        conn.execute(
            r#"
            UPDATE custom_units
            SET name = ?1, symbol = ?2, to_base = ?3, notes = ?4, updated_at = datetime('now')
            WHERE id = ?5
            "#,
            params![
                data.name.as_deref().map(str::trim).unwrap_or(&existing.name),
                data.symbol.as_deref().map(str::trim).unwrap_or(&existing.symbol),
                data.to_base.unwrap_or(existing.to_base),
                notes,
                id,
            ],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Delete a custom unit; returns whether a row was removed
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let affected = conn.execute("DELETE FROM custom_units WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }
}
