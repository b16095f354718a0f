//! Error types for the rowmap engine.
//!
//! Every fallible operation in the crate returns [`Result`], whose error
//! type distinguishes the failure surfaces of the engine: connection
//! setup, schema introspection, query construction, and statement
//! execution. Nothing is retried or suppressed internally; errors always
//! propagate to the immediate caller.
use thiserror::Error;

/// Error type covering all failure modes of the rowmap engine.
#[derive(Error, Debug)]
pub enum RowmapError {
    /// Initial connection setup failed, or the shared handle was requested
    /// before it was initialized. Fatal at startup.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A table could not be introspected (missing table, introspection
    /// query failure). Fatal to opening a repository for that table.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Invalid query-builder arguments: non-positive limit/offset, an
    /// unknown sort direction or operator, or a last-identity request on a
    /// statement that was not a successful insert.
    #[error("Query build error: {0}")]
    QueryBuild(String),

    /// An insert, update, or delete failed at the backend.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Backend errors from SQLite operations outside the write path.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration loading and validation errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result using [`RowmapError`] as the error type.
pub type Result<T> = std::result::Result<T, RowmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let conn_err = RowmapError::Connection("refused".to_string());
        assert!(conn_err.to_string().contains("Connection error"));

        let schema_err = RowmapError::Schema("no such table".to_string());
        assert!(schema_err.to_string().contains("Schema error"));

        let build_err = RowmapError::QueryBuild("limit must be positive".to_string());
        assert!(build_err.to_string().contains("Query build error"));

        let persist_err = RowmapError::Persistence("insert failed".to_string());
        assert!(persist_err.to_string().contains("Persistence error"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RowmapError = io_err.into();
        match err {
            RowmapError::Io(_) => {}
            _ => panic!("Expected IO error"),
        }

        let db_err = rusqlite::Error::ExecuteReturnedResults;
        let err: RowmapError = db_err.into();
        match err {
            RowmapError::Database(_) => {}
            _ => panic!("Expected Database error"),
        }
    }
}
