//! TOML configuration for the shared database connection.

use crate::core::db::connection::DbConfig;
use crate::core::{Result, RowmapError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
}

/// Database connection configuration.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub foreign_keys: Option<bool>,
    pub journal_mode: Option<String>,
}

impl DatabaseConfig {
    /// Resolves this section into connection parameters.
    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            path: self.path.clone(),
            foreign_keys: self.foreign_keys.unwrap_or(true),
            journal_mode: self.journal_mode.clone(),
        }
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Errors
///
/// Returns `RowmapError::Io` if the file cannot be read and
/// `RowmapError::Config` if it does not parse.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| RowmapError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CONFIG: &str = r#"
[database]
path = "app.db"
foreign_keys = true
journal_mode = "WAL"
"#;

    #[test]
    fn test_parse_sample_config() {
        let config: Config = toml::from_str(SAMPLE_CONFIG).expect("Failed to parse sample config");
        assert_eq!(config.database.path, "app.db");
        assert_eq!(config.database.foreign_keys, Some(true));

        let db_config = config.database.to_db_config();
        assert_eq!(db_config.path, "app.db");
        assert!(db_config.foreign_keys);
        assert_eq!(db_config.journal_mode.as_deref(), Some("WAL"));
    }

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("[database]\npath = \":memory:\"\n").unwrap();
        let db_config = config.database.to_db_config();
        assert!(db_config.foreign_keys);
        assert!(db_config.journal_mode.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CONFIG.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.database.path, "app.db");
    }

    #[test]
    fn test_invalid_config() {
        let result: Result<Config> =
            toml::from_str("[database]\n").map_err(|e| RowmapError::Config(e.to_string()));
        assert!(result.is_err());
    }
}
