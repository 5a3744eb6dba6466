//! # Store Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     INNKEEP_KEY_PREFIX=innkeep:                                        │
//! │     INNKEEP_SEED=false                                                 │
//! │     INNKEEP_DB_PATH=/var/lib/innkeep/innkeep.db                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/innkeep-pos/store.toml (Linux)                           │
//! │     ~/Library/Application Support/com.innkeep.pos/store.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # store.toml
//! [store]
//! key_prefix = "innkeep:"
//! seed_on_empty = true
//!
//! [database]
//! path = "/var/lib/innkeep/innkeep.db"
//! max_connections = 5
//! connect_timeout_secs = 30
//! ```

use std::path::PathBuf;
use std::time::Duration;

use innkeep_core::schema::DEFAULT_KEY_PREFIX;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::adapter::SqliteConfig;
use crate::error::{StoreError, StoreResult};

const CONFIG_FILE_NAME: &str = "store.toml";
const DATABASE_FILE_NAME: &str = "innkeep.db";

// =============================================================================
// Sections
// =============================================================================

/// Document store behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Prepended to every collection name to form its adapter key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Insert baseline records when the `users` collection is empty.
    #[serde(default = "default_seed_on_empty")]
    pub seed_on_empty: bool,
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_seed_on_empty() -> bool {
    true
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            key_prefix: default_key_prefix(),
            seed_on_empty: default_seed_on_empty(),
        }
    }
}

/// SQLite backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. `None` resolves to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

// =============================================================================
// Store Config
// =============================================================================

/// Complete configuration for a [`DocumentStore`](crate::DocumentStore) and
/// its SQLite backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the adapter key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.store.key_prefix = prefix.into();
        self
    }

    /// Enables or disables seeding of an empty store.
    pub fn with_seed_on_empty(mut self, seed: bool) -> Self {
        self.store.seed_on_empty = seed;
        self
    }

    /// Sets the database file.
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database.path = Some(path.into());
        self
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (store.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| StoreError::Config(format!("{}: {}", path.display(), e)))?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns the defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml(contents: &str) -> StoreResult<Self> {
        toml::from_str(contents).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Config(e.to_string()))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| StoreError::Config(e.to_string()))?;
        std::fs::write(&path, contents).map_err(|e| StoreError::Config(e.to_string()))?;

        info!(?path, "Store config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.store.key_prefix.is_empty() {
            return Err(StoreError::Config("key_prefix must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(StoreError::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Resolves the database file: configured path, else the platform data
    /// directory.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database.path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "innkeep", "pos")
                .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
        })
    }

    /// Builds the SQLite adapter configuration for this store.
    pub fn sqlite_config(&self) -> StoreResult<SqliteConfig> {
        let path = self
            .database_path()
            .ok_or_else(|| StoreError::Config("No database path available".into()))?;

        Ok(SqliteConfig::new(path)
            .max_connections(self.database.max_connections)
            .connect_timeout(Duration::from_secs(self.database.connect_timeout_secs)))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(prefix) = lookup("INNKEEP_KEY_PREFIX") {
            debug!(key_prefix = %prefix, "Overriding key prefix from environment");
            self.store.key_prefix = prefix;
        }

        if let Some(seed) = lookup("INNKEEP_SEED") {
            match seed.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.store.seed_on_empty = true,
                "0" | "false" | "no" | "off" => self.store.seed_on_empty = false,
                _ => warn!(value = %seed, "Unknown INNKEEP_SEED value in environment"),
            }
        }

        if let Some(path) = lookup("INNKEEP_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "innkeep", "pos")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
