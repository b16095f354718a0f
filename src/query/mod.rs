//! Query building and statement compilation.
//!
//! Each statement kind owns its compiled SQL text and ordered parameter
//! list, built immediately before execution and never mutated afterward.
//! Statements are one-shot: records never retain a reference to the
//! statement that loaded or saved them.
//!
//! - [`condition`] / [`order`]: the immutable terms of the query algebra.
//! - [`select`]: the fluent builder, compilation, and row hydration.
//! - [`insert`] / [`update`] / [`delete`]: the write-path compilers.

pub mod condition;
pub mod delete;
pub mod insert;
pub mod order;
pub mod select;
pub mod update;

pub use condition::{Condition, Conjunction};
pub use delete::Delete;
pub use insert::Insert;
pub use order::{OrderClause, SortDirection};
pub use select::Select;
pub use update::Update;

use crate::core::db::connection::Db;
use crate::core::{Result, RowmapError};
use crate::value::Value;
use tracing::debug;

/// Runs a compiled write statement through the shared connection.
///
/// Failures are reported as `RowmapError::Persistence` naming the
/// operation and target table; nothing is retried.
pub(crate) fn execute_write(
    db: &Db,
    operation: &str,
    table: &str,
    sql: &str,
    params: &[Value],
) -> Result<usize> {
    debug!(%sql, params = params.len(), "executing {}", operation);
    db.with_connection(|conn| {
        conn.execute(sql, rusqlite::params_from_iter(params.iter()))
            .map_err(|e| {
                RowmapError::Persistence(format!("{} on {} failed: {}", operation, table, e))
            })
    })
}
