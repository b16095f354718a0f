//! The DELETE statement compiler.

use crate::core::db::connection::Db;
use crate::core::Result;
use crate::query::execute_write;
use crate::record::ID_COLUMN;
use crate::value::Value;

/// A compiled delete keyed on the identity column.
#[derive(Debug)]
pub struct Delete {
    table: String,
    id: Value,
}

impl Delete {
    /// Builds a delete for the row of `table` with identity `id`.
    pub fn new(table: &str, id: Value) -> Self {
        Delete {
            table: table.to_string(),
            id,
        }
    }

    /// Compiles the SQL text and its single parameter.
    pub fn compile(&self) -> (String, Vec<Value>) {
        (
            format!("DELETE FROM {} WHERE {} = ?", self.table, ID_COLUMN),
            vec![self.id.clone()],
        )
    }

    /// Executes the delete.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::Persistence` if the backend rejects the
    /// statement.
    pub fn execute(&self, db: &Db) -> Result<()> {
        let (sql, params) = self.compile();
        execute_write(db, "delete", &self.table, &sql, &params)?;
        Ok(())
    }
}
