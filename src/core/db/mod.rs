//! Database layer for the rowmap engine.
//!
//! The database layer is split into two concerns:
//! - **Connection management** (`connection.rs`): the single shared
//!   handle, its configuration, and the process-wide init/shutdown
//!   lifecycle.
//! - **Schema introspection** (`schema.rs`): discovering the ordered
//!   column list of a table, resolved once per repository.
//!
//! All operations use the crate-wide [`crate::core::RowmapError`] for
//! consistent error propagation.

pub mod connection;
pub mod schema;

pub use connection::*;
pub use schema::*;
