//! Connection management for the rowmap engine.
//!
//! One process, one backend connection: [`Db`] owns the shared SQLite
//! handle behind a mutex, and every statement execution serializes
//! through it. Repositories take the handle by reference; the
//! process-wide [`init`]/[`acquire`]/[`shutdown`] helpers exist for
//! callers that need a global lifecycle (one connection for the whole
//! application, established at startup).

use crate::core::{Result, RowmapError};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Connection parameters for the shared database handle.
///
/// The backend is a single SQLite database, so the connection reduces to
/// a filesystem path (or `:memory:`) plus the pragmas applied at open
/// time.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or ":memory:".
    pub path: String,
    /// Whether to enable foreign key enforcement.
    pub foreign_keys: bool,
    /// Journal mode to apply at connect time (e.g. "WAL").
    pub journal_mode: Option<String>,
}

impl DbConfig {
    /// Creates a configuration for a file-backed database.
    pub fn new(path: impl Into<String>) -> Self {
        DbConfig {
            path: path.into(),
            foreign_keys: true,
            journal_mode: None,
        }
    }

    /// Creates a configuration for an in-memory database.
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }
}

/// The single shared database handle for the process.
///
/// All statement executions serialize through the internal mutex. The
/// engine provides no further locking; a multi-threaded host must not
/// mutate the same record instance concurrently.
#[derive(Debug)]
pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    /// Establishes the backend connection described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::Connection` if the database cannot be opened
    /// or the configured pragmas cannot be applied. A failed connect is
    /// fatal to startup; there is no retry.
    pub fn connect(config: &DbConfig) -> Result<Self> {
        let conn = Connection::open(&config.path).map_err(|e| {
            RowmapError::Connection(format!("failed to open '{}': {}", config.path, e))
        })?;

        let mut pragmas = String::new();
        if config.foreign_keys {
            pragmas.push_str("PRAGMA foreign_keys = ON;\n");
        }
        if let Some(mode) = &config.journal_mode {
            pragmas.push_str(&format!("PRAGMA journal_mode = {};\n", mode));
        }
        if !pragmas.is_empty() {
            conn.execute_batch(&pragmas).map_err(|e| {
                RowmapError::Connection(format!("failed to apply connection pragmas: {}", e))
            })?;
        }

        debug!(path = %config.path, "database connection established");
        Ok(Db {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory database with default pragmas.
    pub fn open_in_memory() -> Result<Self> {
        Self::connect(&DbConfig::in_memory())
    }

    /// Runs `f` with exclusive access to the underlying connection.
    ///
    /// This is also the documented escape hatch for queries the engine
    /// cannot express; callers get the raw `rusqlite::Connection`.
    ///
    /// # Errors
    ///
    /// Returns `RowmapError::Connection` if the connection lock is
    /// poisoned, otherwise whatever `f` returns.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let guard = self
            .conn
            .lock()
            .map_err(|_| RowmapError::Connection("database lock poisoned".to_string()))?;
        f(&guard)
    }
}

/// Global database handle slot.
///
/// Uses OnceCell for thread-safe lazy initialization of the slot itself;
/// the Option inside tracks whether a connection is currently held.
static GLOBAL_DB: OnceCell<Mutex<Option<Arc<Db>>>> = OnceCell::new();

fn global_slot() -> &'static Mutex<Option<Arc<Db>>> {
    GLOBAL_DB.get_or_init(|| Mutex::new(None))
}

/// Initializes the process-wide shared connection.
///
/// # Errors
///
/// Returns `RowmapError::Connection` if the backend rejects the
/// configuration or is unreachable. Fatal at startup.
pub fn init(config: &DbConfig) -> Result<()> {
    let db = Db::connect(config)?;
    let mut slot = global_slot()
        .lock()
        .map_err(|_| RowmapError::Connection("database lock poisoned".to_string()))?;
    *slot = Some(Arc::new(db));
    Ok(())
}

/// Returns the process-wide shared handle.
///
/// # Errors
///
/// Returns `RowmapError::Connection` if called before [`init`] or after
/// [`shutdown`].
pub fn acquire() -> Result<Arc<Db>> {
    global_slot()
        .lock()
        .map_err(|_| RowmapError::Connection("database lock poisoned".to_string()))?
        .clone()
        .ok_or_else(|| {
            RowmapError::Connection("acquire() called before init()".to_string())
        })
}

/// Releases the process-wide shared handle.
///
/// The underlying connection closes once the last outstanding handle is
/// dropped. Safe to call when no connection is held.
pub fn shutdown() {
    if let Ok(mut slot) = global_slot().lock() {
        *slot = None;
    }
}
