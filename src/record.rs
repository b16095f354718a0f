//! Records and repositories: table binding, field state, dirty
//! tracking, and the save/delete/find lifecycle.
//!
//! A [`Record`] is an in-memory object bound one-to-one with a row in a
//! named table. It holds the current field values and, for records
//! obtained through a load path, a snapshot of values-as-loaded that
//! drives partial updates. A [`Repository`] binds a table's introspected
//! shape to the shared connection and carries the type-level operations
//! the original expressed as static methods.

use std::collections::HashMap;

use crate::core::db::connection::Db;
use crate::core::db::schema::TableSchema;
use crate::core::{Result, RowmapError};
use crate::query::{Delete, Insert, Select, Update};
use crate::value::Value;

/// Conventional name of the identity column.
pub const ID_COLUMN: &str = "id";

/// One row's worth of state.
///
/// Freshly created records are transient: empty fields, empty snapshot,
/// no identity. Hydrated records carry both maps filled with the row's
/// values and are persisted. Dirty detection compares `fields` against
/// `snapshot` with strict typed equality.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: HashMap<String, Value>,
    snapshot: HashMap<String, Value>,
    persisted: bool,
}

impl Record {
    /// Creates a transient record with no fields and no identity.
    pub fn transient() -> Self {
        Record::default()
    }

    /// Builds a persisted record from a raw row; fields and snapshot
    /// both receive the row's values, so the record starts clean.
    pub(crate) fn hydrate(columns: &[String], values: Vec<Value>) -> Self {
        let mut fields = HashMap::with_capacity(columns.len());
        for (column, value) in columns.iter().zip(values) {
            fields.insert(column.clone(), value);
        }
        Record {
            snapshot: fields.clone(),
            fields,
            persisted: true,
        }
    }

    /// Returns the current value of `column`, if set.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Sets the current value of `column`.
    ///
    /// Keys that are not schema columns are retained but never compiled
    /// into SQL; statements iterate the discovered column list only.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        self.fields.insert(column.to_string(), value.into());
    }

    /// The identity value, when one has been assigned.
    pub fn id(&self) -> Option<i64> {
        self.fields.get(ID_COLUMN).and_then(Value::as_integer)
    }

    /// True iff this record corresponds to an existing stored row.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Columns whose current value differs from the snapshot, in the
    /// order given by `columns`.
    pub(crate) fn changed_columns(&self, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .filter(|column| {
                let current = self.fields.get(*column).unwrap_or(&Value::Null);
                let original = self.snapshot.get(*column).unwrap_or(&Value::Null);
                current != original
            })
            .cloned()
            .collect()
    }

    fn take_snapshot(&mut self) {
        self.snapshot = self.fields.clone();
    }

    fn clear(&mut self) {
        self.fields.clear();
        self.snapshot.clear();
        self.persisted = false;
    }
}

/// Table-level operations for one bound record type.
///
/// Opening a repository introspects the live schema once; the resulting
/// column list (in schema-reported order) is shared by every statement
/// the repository compiles.
#[derive(Debug)]
pub struct Repository<'db> {
    db: &'db Db,
    schema: TableSchema,
}

impl<'db> Repository<'db> {
    /// Binds `table` by introspecting its columns.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::Schema` if the table cannot be described.
    pub fn open(db: &'db Db, table: &str) -> Result<Self> {
        Ok(Repository {
            schema: TableSchema::introspect(db, table)?,
            db,
        })
    }

    /// The introspected shape of the bound table.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Creates a transient record for this table.
    pub fn create(&self) -> Record {
        Record::transient()
    }

    /// Returns an unexecuted select over the whole table.
    pub fn all(&self) -> Select<'db> {
        Select::new(self.db, self.schema.clone())
    }

    /// Returns an unexecuted select with one condition applied.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::QueryBuild` for an invalid column or
    /// operator.
    pub fn r#where(
        &self,
        column: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Select<'db>> {
        self.all().and_where(column, operator, value)
    }

    /// Loads and hydrates every row of the table.
    ///
    /// On a large table this is slow and memory-hungry; prefer a
    /// filtered select.
    pub fn get_all(&self) -> Result<Vec<Record>> {
        self.all().execute()
    }

    /// Finds the single record with identity `id`.
    ///
    /// Returns `Ok(None)` when no such row exists; "not found" is never
    /// an error.
    pub fn one(&self, id: i64) -> Result<Option<Record>> {
        let mut records = self.r#where(ID_COLUMN, "=", id)?.limit(1)?.execute()?;
        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records.remove(0)))
        }
    }

    /// Writes `record` to the database.
    ///
    /// A transient record is inserted: the backend-assigned identity
    /// lands in its `id` field, it becomes persisted, and its snapshot
    /// is refreshed. A persisted record is updated touching only the
    /// columns whose values changed since the snapshot; with no changes
    /// the save is a no-op (the reference would run an update with an
    /// empty SET list, which is not valid SQL).
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::Persistence` if the statement fails at the
    /// backend, or if a persisted record has lost its identity.
    pub fn save(&self, record: &mut Record) -> Result<()> {
        if !record.persisted {
            let mut insert = Insert::from_record(&self.schema, record);
            insert.execute(self.db)?;
            record.set(ID_COLUMN, insert.last_id()?);
            record.persisted = true;
            record.take_snapshot();
        } else {
            let changed = record.changed_columns(&self.schema.columns);
            if changed.is_empty() {
                return Ok(());
            }

            let id = record.get(ID_COLUMN).cloned().ok_or_else(|| {
                RowmapError::Persistence(format!(
                    "update on {} failed: record has no identity",
                    self.schema.table
                ))
            })?;
            let assignments = changed
                .into_iter()
                .map(|column| {
                    let value = record.get(&column).cloned().unwrap_or(Value::Null);
                    (column, value)
                })
                .collect();

            Update::new(&self.schema.table, assignments, id).execute(self.db)?;
            record.take_snapshot();
        }
        Ok(())
    }

    /// Deletes `record` from the database.
    ///
    /// On a transient record nothing touches storage; the fields are
    /// cleared and the call succeeds. On a persisted record the row is
    /// removed, after which the instance is cleared and must not be
    /// reused as if still live.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::Persistence` if the statement fails at the
    /// backend, or if a persisted record has lost its identity.
    pub fn delete(&self, record: &mut Record) -> Result<()> {
        if !record.persisted {
            record.clear();
            return Ok(());
        }

        let id = record.get(ID_COLUMN).cloned().ok_or_else(|| {
            RowmapError::Persistence(format!(
                "delete on {} failed: record has no identity",
                self.schema.table
            ))
        })?;
        Delete::new(&self.schema.table, id).execute(self.db)?;
        record.clear();
        Ok(())
    }
}
