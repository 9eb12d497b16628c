// ⚙️ Configuration - defaults with environment overrides

use crate::registry::{Registry, DEFAULT_STORAGE_KEY};
use crate::store::SqliteStore;
use anyhow::Result;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "parking.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

pub const ENV_DB_PATH: &str = "PARKING_DB";
pub const ENV_STORAGE_KEY: &str = "PARKING_STORAGE_KEY";
pub const ENV_BIND_ADDR: &str = "PARKING_ADDR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub storage_key: String,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset or blank values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Config::default();

        Config {
            db_path: get(ENV_DB_PATH).map(PathBuf::from).unwrap_or(defaults.db_path),
            storage_key: get(ENV_STORAGE_KEY).unwrap_or(defaults.storage_key),
            bind_addr: get(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr),
        }
    }

    /// Open the SQLite-backed registry this configuration points at
    pub fn open_registry(&self) -> Result<Registry<SqliteStore>> {
        let store = SqliteStore::open(&self.db_path)?;
        Ok(Registry::with_key(store, self.storage_key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.storage_key, "entries");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_DB_PATH, "/tmp/lot.db"),
            (ENV_STORAGE_KEY, "lot-b"),
            (ENV_BIND_ADDR, "127.0.0.1:8080"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.db_path, PathBuf::from("/tmp/lot.db"));
        assert_eq!(config.storage_key, "lot-b");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_blank_values_ignored() {
        let config = Config::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_open_registry() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            db_path: dir.path().join("parking.db"),
            storage_key: "lot-b".to_string(),
            ..Config::default()
        };

        let registry = config.open_registry().unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.storage_key(), "lot-b");
    }
}
