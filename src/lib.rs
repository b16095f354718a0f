//! rowmap: a small record-mapping and query-building engine for SQLite.
//!
//! The engine turns a named table into records, tracks field-level
//! mutation against a load-time snapshot, and compiles fluent query
//! descriptions into parameterized SQL executed through one shared
//! connection.
//!
//! ```no_run
//! use rowmap::{Db, Repository};
//!
//! # fn main() -> rowmap::Result<()> {
//! let db = Db::open_in_memory()?;
//! let users = Repository::open(&db, "users")?;
//!
//! let mut user = users.create();
//! user.set("username", "alice");
//! users.save(&mut user)?;
//!
//! let adults = users
//!     .r#where("age", ">=", 18)?
//!     .order_by("username", "asc")?
//!     .limit(10)?
//!     .execute()?;
//! # let _ = adults;
//! # Ok(())
//! # }
//! ```

// Core infrastructure modules
pub mod core;

// Engine modules
pub mod config;
pub mod query;
pub mod record;
pub mod value;

pub use crate::core::db::connection::{acquire, init, shutdown, Db, DbConfig};
pub use crate::core::db::schema::TableSchema;
pub use crate::core::{Result, RowmapError};
pub use crate::query::{Condition, Conjunction, Delete, Insert, OrderClause, Select, SortDirection, Update};
pub use crate::record::{Record, Repository, ID_COLUMN};
pub use crate::value::Value;
