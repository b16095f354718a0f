//! Core infrastructure for the rowmap engine.
//!
//! This module holds the shared foundations the rest of the crate is
//! built on: the crate-wide error type and the database layer
//! (connection lifecycle and schema introspection).

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{Result, RowmapError};
