//! The INSERT statement compiler.

use crate::core::db::connection::Db;
use crate::core::db::schema::TableSchema;
use crate::core::{Result, RowmapError};
use crate::record::{Record, ID_COLUMN};
use crate::value::Value;
use tracing::debug;

/// A compiled insert for one record.
///
/// Takes the record's current fields, excluding the identity column, and
/// emits `INSERT INTO <table> (c1,c2,...) VALUES (?,?,...)` with
/// parameters in schema column order. On success the backend-assigned
/// identity is captured for retrieval by the caller.
#[derive(Debug)]
pub struct Insert {
    table: String,
    columns: Vec<String>,
    params: Vec<Value>,
    last_id: Option<i64>,
}

impl Insert {
    /// Builds an insert from a record's current fields.
    ///
    /// Columns the record never set are inserted as NULL; field keys that
    /// are not schema columns are ignored.
    pub fn from_record(schema: &TableSchema, record: &Record) -> Self {
        let columns: Vec<String> = schema
            .columns
            .iter()
            .filter(|c| c.as_str() != ID_COLUMN)
            .cloned()
            .collect();
        let params = columns
            .iter()
            .map(|c| record.get(c).cloned().unwrap_or(Value::Null))
            .collect();

        Insert {
            table: schema.table.clone(),
            columns,
            params,
            last_id: None,
        }
    }

    /// Compiles the SQL text and its ordered parameters.
    pub fn compile(&self) -> (String, Vec<Value>) {
        // A table whose only column is the identity still has to insert a row.
        let sql = if self.columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.table)
        } else {
            let placeholders = vec!["?"; self.columns.len()].join(",");
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table,
                self.columns.join(","),
                placeholders
            )
        };
        (sql, self.params.clone())
    }

    /// Executes the insert and captures the backend-assigned identity.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::Persistence` if the backend rejects the
    /// statement.
    pub fn execute(&mut self, db: &Db) -> Result<()> {
        let (sql, params) = self.compile();
        debug!(%sql, params = params.len(), "executing insert");

        // The identity must be read under the same lock as the insert.
        let last_id = db.with_connection(|conn| {
            conn.execute(&sql, rusqlite::params_from_iter(params.iter()))
                .map_err(|e| {
                    RowmapError::Persistence(format!("insert on {} failed: {}", self.table, e))
                })?;
            Ok(conn.last_insert_rowid())
        })?;
        self.last_id = Some(last_id);
        Ok(())
    }

    /// The identity assigned by a successfully executed insert.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::QueryBuild` if the insert has not executed
    /// successfully.
    pub fn last_id(&self) -> Result<i64> {
        self.last_id.ok_or_else(|| {
            RowmapError::QueryBuild(
                "can't get last id, this statement wasn't executed or isn't an insert".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_db() -> (Db, TableSchema) {
        let db = Db::open_in_memory().unwrap();
        db.with_connection(|conn| {
            conn.execute_batch(
                "CREATE TABLE users (
                    id INTEGER PRIMARY KEY,
                    username TEXT,
                    password TEXT
                )",
            )?;
            Ok(())
        })
        .unwrap();
        let schema = TableSchema::introspect(&db, "users").unwrap();
        (db, schema)
    }

    #[test]
    fn test_compile_excludes_identity() {
        let (_db, schema) = users_db();
        let mut record = Record::transient();
        record.set("username", "alice");
        // A field key that is not a schema column never reaches the SQL.
        record.set("password_hash", "h1");

        let insert = Insert::from_record(&schema, &record);
        let (sql, params) = insert.compile();

        assert_eq!(sql, "INSERT INTO users (username,password) VALUES (?,?)");
        assert_eq!(
            params,
            vec![Value::Text("alice".to_string()), Value::Null]
        );
    }

    #[test]
    fn test_execute_assigns_identity() {
        let (db, schema) = users_db();
        let mut record = Record::transient();
        record.set("username", "alice");
        record.set("password", "h1");

        let mut insert = Insert::from_record(&schema, &record);
        insert.execute(&db).unwrap();
        assert_eq!(insert.last_id().unwrap(), 1);
    }

    #[test]
    fn test_last_id_before_execute() {
        let (_db, schema) = users_db();
        let insert = Insert::from_record(&schema, &Record::transient());
        match insert.last_id().unwrap_err() {
            RowmapError::QueryBuild(_) => {}
            other => panic!("Expected QueryBuild error, got {:?}", other),
        }
    }

    #[test]
    fn test_execute_failure_is_persistence_error() {
        let (db, schema) = users_db();
        db.with_connection(|conn| {
            conn.execute_batch("DROP TABLE users")?;
            Ok(())
        })
        .unwrap();

        let mut insert = Insert::from_record(&schema, &Record::transient());
        match insert.execute(&db).unwrap_err() {
            RowmapError::Persistence(msg) => assert!(msg.contains("users")),
            other => panic!("Expected Persistence error, got {:?}", other),
        }
    }
}
