//! Schema introspection for the rowmap engine.
//!
//! A repository binds to a live table by asking the backend to describe
//! it. `PRAGMA table_info` reports columns in schema order, and that
//! order is preserved everywhere compiled SQL enumerates columns.

use crate::core::db::connection::Db;
use crate::core::{Result, RowmapError};

/// Returns true if `name` is usable as a bare SQL identifier.
///
/// Table and column names are interpolated into compiled SQL text, so
/// anything that is not identifier-shaped is rejected at the boundary.
pub(crate) fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The shape of a bound table: its name and ordered column list.
///
/// Resolved once when a repository opens, not on every record
/// construction. Column order is the schema-reported order.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Table name this schema describes.
    pub table: String,
    /// Column names in schema-reported order.
    pub columns: Vec<String>,
}

impl TableSchema {
    /// Introspects the backend for `table` and records its columns.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::Schema` if the table cannot be described
    /// (it does not exist, or its name is not a valid identifier).
    pub fn introspect(db: &Db, table: &str) -> Result<Self> {
        if !is_sql_identifier(table) {
            return Err(RowmapError::Schema(format!(
                "'{}' is not a valid table name",
                table
            )));
        }

        db.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
            let column_iter = stmt.query_map([], |row| row.get::<_, String>(1))?;

            let mut columns = Vec::new();
            for column_result in column_iter {
                columns.push(column_result?);
            }

            if columns.is_empty() {
                return Err(RowmapError::Schema(format!(
                    "couldn't read table '{}'",
                    table
                )));
            }

            Ok(TableSchema {
                table: table.to_string(),
                columns,
            })
        })
    }

    /// Returns true if `name` is one of this table's columns.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}
