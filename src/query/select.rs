//! The SELECT builder: fluent query description, compilation, and row
//! hydration.

use crate::core::db::connection::Db;
use crate::core::db::schema::TableSchema;
use crate::core::{Result, RowmapError};
use crate::query::condition::{Condition, Conjunction};
use crate::query::order::OrderClause;
use crate::record::Record;
use crate::value::Value;
use tracing::debug;

/// Row count used to express "no limit" when only an offset is given;
/// SQLite treats a negative LIMIT as unbounded, and an OFFSET clause is
/// not allowed without an accompanying LIMIT.
pub const NO_LIMIT_SENTINEL: i64 = -1;

/// A fluent select bound to one table.
///
/// Accumulates conditions and a single order clause, supports
/// limit/offset, compiles to a full `SELECT *`, and hydrates raw rows
/// into [`Record`]s. Each chaining method consumes and returns the
/// builder; validation failures surface immediately as `QueryBuild`
/// errors.
#[derive(Debug)]
pub struct Select<'db> {
    db: &'db Db,
    schema: TableSchema,
    conditions: Vec<Condition>,
    limit: Option<i64>,
    offset: Option<i64>,
    order: Option<OrderClause>,
}

impl<'db> Select<'db> {
    pub(crate) fn new(db: &'db Db, schema: TableSchema) -> Self {
        Select {
            db,
            schema,
            conditions: Vec::new(),
            limit: None,
            offset: None,
            order: None,
        }
    }

    /// Appends an AND condition. Shortcut for [`Select::and_where`].
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::QueryBuild` for an invalid column or
    /// operator.
    pub fn r#where(self, column: &str, operator: &str, value: impl Into<Value>) -> Result<Self> {
        self.and_where(column, operator, value)
    }

    /// Appends an AND condition.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::QueryBuild` for an invalid column or
    /// operator.
    pub fn and_where(
        mut self,
        column: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.conditions
            .push(Condition::new(column, operator, value, Conjunction::And)?);
        Ok(self)
    }

    /// Appends an OR condition.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::QueryBuild` for an invalid column or
    /// operator.
    pub fn or_where(
        mut self,
        column: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.conditions
            .push(Condition::new(column, operator, value, Conjunction::Or)?);
        Ok(self)
    }

    /// Sets the maximum number of rows to return.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::QueryBuild` unless `limit` is a positive
    /// integer.
    pub fn limit(mut self, limit: i64) -> Result<Self> {
        if limit < 1 {
            return Err(RowmapError::QueryBuild(format!(
                "limit() argument must be a positive integer, {} given",
                limit
            )));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    /// Sets the number of rows to skip.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::QueryBuild` unless `offset` is a positive
    /// integer.
    pub fn offset(mut self, offset: i64) -> Result<Self> {
        if offset < 1 {
            return Err(RowmapError::QueryBuild(format!(
                "offset() argument must be a positive integer, {} given",
                offset
            )));
        }
        self.offset = Some(offset);
        Ok(self)
    }

    /// Sets the single sort key. A later call replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::QueryBuild` for an invalid column or sort
    /// direction.
    pub fn order_by(mut self, column: &str, direction: &str) -> Result<Self> {
        self.order = Some(OrderClause::new(column, direction)?);
        Ok(self)
    }

    /// Compiles the SQL text and its ordered parameters.
    ///
    /// Conditions are emitted in insertion order; the first opens the
    /// WHERE clause, subsequent ones are prefixed by their conjunction
    /// keyword.
    pub fn compile(&self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT * FROM {}", self.schema.table);
        let mut params = Vec::with_capacity(self.conditions.len());

        for (i, condition) in self.conditions.iter().enumerate() {
            if i == 0 {
                sql.push_str(" WHERE ");
            } else {
                sql.push(' ');
                sql.push_str(condition.conjunction().keyword());
                sql.push(' ');
            }
            sql.push_str(&condition.term());
            params.push(condition.value().clone());
        }

        if let Some(order) = &self.order {
            sql.push(' ');
            sql.push_str(&order.clause());
        }

        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
            }
            (Some(limit), None) => {
                sql.push_str(&format!(" LIMIT {}", limit));
            }
            (None, Some(offset)) => {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", NO_LIMIT_SENTINEL, offset));
            }
            (None, None) => {}
        }

        (sql, params)
    }

    /// Executes the compiled select and hydrates the results.
    ///
    /// Every returned row becomes a persisted [`Record`] whose fields and
    /// snapshot both hold the row's values, so hydrated records start
    /// clean. Zero matches yield an empty vector.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::Database` if the backend rejects the query.
    pub fn execute(&self) -> Result<Vec<Record>> {
        let (sql, params) = self.compile();
        debug!(%sql, params = params.len(), "executing select");

        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let column_names: Vec<String> =
                stmt.column_names().into_iter().map(String::from).collect();
            let column_count = column_names.len();

            let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    values.push(Value::from_sql_ref(row.get_ref(i)?));
                }
                Ok(values)
            })?;

            let mut records = Vec::new();
            for row in rows {
                records.push(Record::hydrate(&column_names, row?));
            }
            Ok(records)
        })
    }
}
