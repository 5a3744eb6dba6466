//! # innkeep-store: Document Store for Innkeep
//!
//! The persistent document store every screen of the application reads and
//! writes through: named collections of JSON records, mirrored in memory and
//! written through to a key/value adapter one whole collection at a time.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Innkeep Data Flow                                │
//! │                                                                         │
//! │  Caller (cart, orders, accounting, rooms)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   innkeep-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ DocumentStore │    │  Repositories │    │    Config    │  │   │
//! │  │   │  (store.rs)   │◄───│ Repository<T> │    │ store.toml   │  │   │
//! │  │   │ mirror+locks  │    │ rooms, orders │    │ env overrides│  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │ get / set / remove                                 │   │
//! │  │   ┌───────▼───────────────────────────────┐                    │   │
//! │  │   │ KvAdapter: SqliteAdapter | MemoryAdapter                   │   │
//! │  │   └───────────────────────────────────────┘                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite kv_store table                                          │   │
//! │  │  ~/.local/share/pos/innkeep.db (Linux)                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - `DocumentStore`: lifecycle, queries, mutations, dashboard
//! - [`query`] - `SelectOptions` filter / order / limit
//! - [`adapter`] - `KvAdapter` trait with SQLite and in-memory backends
//! - [`repository`] - Typed per-collection access
//! - [`config`] - TOML + environment configuration
//! - [`migrations`] - Embedded SQLite migrations
//! - [`error`] - Adapter and store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use innkeep_store::{DocumentStore, SelectOptions, StoreConfig};
//!
//! let config = StoreConfig::load_or_default(None);
//! let store = DocumentStore::open(&config).await?;
//! store.initialize().await?;
//!
//! let occupied = store
//!     .select("rooms", &SelectOptions::new().filter("status", "occupied"))
//!     .await?;
//! let stats = store.dashboard_stats().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod adapter;
pub mod config;
pub mod error;
pub mod migrations;
pub mod query;
pub mod repository;
mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use adapter::{KvAdapter, MemoryAdapter, SqliteAdapter, SqliteConfig};
pub use config::{DatabaseSettings, StoreConfig, StoreSettings};
pub use error::{AdapterError, AdapterResult, StoreError, StoreResult};
pub use query::{OrderBy, SelectOptions};
pub use repository::Repository;
pub use store::DocumentStore;

/// Installs the tracing subscriber for binaries built on this crate.
///
/// ## Log Levels
/// - `info` default, `debug` for innkeep crates, `warn` for sqlx
/// - `RUST_LOG` replaces the default filter entirely
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,innkeep=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
