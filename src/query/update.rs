//! The UPDATE statement compiler.

use crate::core::db::connection::Db;
use crate::core::Result;
use crate::query::execute_write;
use crate::record::ID_COLUMN;
use crate::value::Value;

/// A compiled update touching only changed columns.
///
/// The changed-column set is computed by the record layer, not here;
/// this statement just emits `UPDATE <table> SET c1 = ?, c2 = ? WHERE
/// id = ?` with the changed values followed by the identity value.
#[derive(Debug)]
pub struct Update {
    table: String,
    assignments: Vec<(String, Value)>,
    id: Value,
}

impl Update {
    /// Builds an update for `table` setting `assignments`, keyed on `id`.
    ///
    /// Callers must not hand in an empty assignment list; a persisted
    /// record with no changes is a save-time no-op upstream.
    pub fn new(table: &str, assignments: Vec<(String, Value)>, id: Value) -> Self {
        debug_assert!(!assignments.is_empty());
        Update {
            table: table.to_string(),
            assignments,
            id,
        }
    }

    /// Compiles the SQL text and its ordered parameters.
    pub fn compile(&self) -> (String, Vec<Value>) {
        let set_list: Vec<String> = self
            .assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            self.table,
            set_list.join(", "),
            ID_COLUMN
        );

        let mut params: Vec<Value> = self
            .assignments
            .iter()
            .map(|(_, value)| value.clone())
            .collect();
        params.push(self.id.clone());
        (sql, params)
    }

    /// Executes the update.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::Persistence` if the backend rejects the
    /// statement.
    pub fn execute(&self, db: &Db) -> Result<()> {
        let (sql, params) = self.compile();
        execute_write(db, "update", &self.table, &sql, &params)?;
        Ok(())
    }
}
