//! # SQLite Adapter
//!
//! Durable [`KvAdapter`] over a single `kv_store` table.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SQLite Key/Value Backend                           │
//! │                                                                         │
//! │  SqliteConfig::new(path) ← Configure pool settings                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteAdapter::connect(config).await ← Create pool + run migrations   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐                │  (max_connections)        │
//! │  │  │Conn1│ │Conn2│ │Conn3│ ...            │                           │
//! │  │  └─────┘ └─────┘ └─────┘                │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kv_store(key PRIMARY KEY, value TEXT, updated_at TEXT)                │
//! │  one row per collection, value = JSON array of records                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases run in WAL mode with NORMAL synchronous. A crash may lose
//! the last committed write but never corrupts the file.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::KvAdapter;
use crate::error::{AdapterError, AdapterResult};
use crate::migrations;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// SQLite adapter configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = SqliteConfig::new("/path/to/innkeep.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl SqliteConfig {
    /// Creates a configuration for the database file at `path`.
    ///
    /// The file is created on connect if it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory configuration (for testing).
    ///
    /// The database lives as long as its single pooled connection, so that
    /// connection is never recycled.
    pub fn in_memory() -> Self {
        SqliteConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    /// Returns true for the in-memory configuration.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// Adapter
// =============================================================================

/// Key/value adapter over a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteAdapter {
    pool: SqlitePool,
}

impl SqliteAdapter {
    /// Opens the pool and applies migrations.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Enables WAL journaling and NORMAL synchronous (file databases)
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    ///
    /// ## Returns
    /// * `Ok(SqliteAdapter)` - Ready to use
    /// * `Err(AdapterError)` - Connection or migration failed
    pub async fn connect(config: SqliteConfig) -> AdapterResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening key/value database"
        );

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout);

        let connect_options = if config.is_in_memory() {
            pool_options = pool_options
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| AdapterError::ConnectionFailed(e.to_string()))?
        } else {
            pool_options = pool_options.idle_timeout(Some(config.idle_timeout));
            let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());
            SqliteConnectOptions::from_str(&connect_url)
                .map_err(|e| AdapterError::ConnectionFailed(e.to_string()))?
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        debug!("Connection options configured");

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| AdapterError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Key/value pool created"
        );

        let adapter = SqliteAdapter { pool };

        if config.run_migrations {
            adapter.run_migrations().await?;
        }

        Ok(adapter)
    }

    /// Applies pending migrations. Called by `connect` unless disabled.
    pub async fn run_migrations(&self) -> AdapterResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns true if the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the pool. Every later call fails with `Unavailable`.
    pub async fn close(&self) {
        info!("Closing key/value pool");
        self.pool.close().await;
    }
}

#[async_trait]
impl KvAdapter for SqliteAdapter {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> AdapterResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> AdapterResult<()> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Key written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> AdapterResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_adapter() {
        let adapter = SqliteAdapter::connect(SqliteConfig::in_memory()).await.unwrap();
        assert!(adapter.health_check().await);

        assert_eq!(adapter.get("innkeep:rooms").await.unwrap(), None);

        adapter.set("innkeep:rooms", "[]").await.unwrap();
        adapter.set("innkeep:rooms", r#"[{"id":"a"}]"#).await.unwrap();
        assert_eq!(
            adapter.get("innkeep:rooms").await.unwrap().as_deref(),
            Some(r#"[{"id":"a"}]"#)
        );

        adapter.remove("innkeep:rooms").await.unwrap();
        adapter.remove("innkeep:rooms").await.unwrap();
        assert_eq!(adapter.get("innkeep:rooms").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_migrations_applied() {
        let adapter = SqliteAdapter::connect(SqliteConfig::in_memory()).await.unwrap();
        let (total, applied) = migrations::migration_status(adapter.pool()).await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("innkeep.db");

        let adapter = SqliteAdapter::connect(SqliteConfig::new(&path)).await.unwrap();
        adapter.set("innkeep:users", r#"[{"id":"u1"}]"#).await.unwrap();
        adapter.close().await;
        assert!(adapter.get("innkeep:users").await.is_err());

        let reopened = SqliteAdapter::connect(SqliteConfig::new(&path)).await.unwrap();
        assert_eq!(
            reopened.get("innkeep:users").await.unwrap().as_deref(),
            Some(r#"[{"id":"u1"}]"#)
        );
    }

    #[test]
    fn test_config_builder() {
        let config = SqliteConfig::new("/tmp/innkeep.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(SqliteConfig::in_memory().is_in_memory());
    }
}
