use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "MAILING_LIST_CONFIG";

/// Configuration file used when [`CONFIG_ENV_VAR`] is unset
pub const DEFAULT_CONFIG_PATH: &str = "mailing-list.toml";

/// Where the store lives
///
/// Resolved from configuration for every command and handed to each store
/// call; there is no process-wide connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub database: PathBuf,
}

impl ConnectionTarget {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
        }
    }
}

/// Source of the store's connection target
pub trait ConfigSource {
    fn read_config(&self) -> Result<ConnectionTarget>;
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    store: StoreSection,
}

#[derive(Debug, Deserialize)]
struct StoreSection {
    database: PathBuf,
}

/// TOML configuration file
///
/// ```toml
/// [store]
/// database = "mailing-list.db"
/// ```
///
/// A relative `database` is resolved against the configuration file's
/// directory.
#[derive(Debug, Clone)]
pub struct TomlConfig {
    path: PathBuf,
}

impl TomlConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `MAILING_LIST_CONFIG` if set, otherwise `mailing-list.toml`
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for TomlConfig {
    fn read_config(&self) -> Result<ConnectionTarget> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read configuration file '{}'", self.path.display()))?;
        let file: ConfigFile = toml::from_str(&contents)
            .with_context(|| format!("Invalid configuration in '{}'", self.path.display()))?;

        let database = file.store.database;
        ensure!(
            !database.as_os_str().is_empty(),
            "store.database in '{}' is empty",
            self.path.display()
        );

        let database = match self.path.parent() {
            Some(dir) if database.is_relative() => dir.join(database),
            _ => database,
        };

        Ok(ConnectionTarget::new(database))
    }
}
