//! Application configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use depot_db::DbConfig;

use crate::password::HashingConfig;

/// Depot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Apply pending migrations when the database is opened
    pub run_migrations: bool,

    /// Parameters for new password hashes
    pub hashing: HashingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("./depot.db"),
            run_migrations: true,
            hashing: HashingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                | Default      |
    /// |-------------------------|--------------|
    /// | `DEPOT_DATABASE_PATH`   | `./depot.db` |
    /// | `DEPOT_RUN_MIGRATIONS`  | `true`       |
    /// | `DEPOT_HASH_COST`       | `12`         |
    /// | `DEPOT_HASH_MEMORY_KIB` | `19456`      |
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        let config = AppConfig {
            database_path: lookup("DEPOT_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            run_migrations: parse_or(&lookup, "DEPOT_RUN_MIGRATIONS", defaults.run_migrations)?,

            hashing: HashingConfig {
                cost: parse_or(&lookup, "DEPOT_HASH_COST", defaults.hashing.cost)?,
                memory_kib: parse_or(
                    &lookup,
                    "DEPOT_HASH_MEMORY_KIB",
                    defaults.hashing.memory_kib,
                )?,
                parallelism: defaults.hashing.parallelism,
            },
        };

        if config.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("DEPOT_DATABASE_PATH".to_string()));
        }
        if config.hashing.cost == 0 {
            return Err(ConfigError::InvalidValue("DEPOT_HASH_COST".to_string()));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).run_migrations(self.run_migrations)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.hashing.cost, 12);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DEPOT_DATABASE_PATH", "/var/lib/depot/main.db"),
            ("DEPOT_RUN_MIGRATIONS", "false"),
            ("DEPOT_HASH_COST", "14"),
            ("DEPOT_HASH_MEMORY_KIB", " 65536 "),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/depot/main.db"));
        assert!(!config.run_migrations);
        assert_eq!(config.hashing.cost, 14);
        assert_eq!(config.hashing.memory_kib, 65_536);

        let db = config.db_config();
        assert_eq!(db.database_path, config.database_path);
        assert!(!db.run_migrations);
    }

    #[test]
    fn test_unparsable_values_are_errors() {
        let err = AppConfig::from_lookup(lookup(&[("DEPOT_HASH_COST", "high")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "DEPOT_HASH_COST"));

        let err = AppConfig::from_lookup(lookup(&[("DEPOT_RUN_MIGRATIONS", "maybe")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for DEPOT_RUN_MIGRATIONS");

        assert!(AppConfig::from_lookup(lookup(&[("DEPOT_HASH_COST", "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("DEPOT_DATABASE_PATH", "")])).is_err());
    }
}
