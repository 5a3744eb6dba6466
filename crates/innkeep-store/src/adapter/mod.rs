//! # Key/Value Adapters
//!
//! The document store never talks to a database directly. It hands whole
//! collections, serialized as JSON text, to a [`KvAdapter`] under one key per
//! collection.
//!
//! ## Adapter Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         DocumentStore                                   │
//! │                              │                                          │
//! │               get / set / remove("innkeep:rooms")                       │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                   Arc<dyn KvAdapter>                                    │
//! │                 ┌────────────┴────────────┐                             │
//! │                 ▼                         ▼                             │
//! │          SqliteAdapter              MemoryAdapter                       │
//! │          kv_store table             HashMap + failure injection         │
//! │          (production)               (tests, ephemeral sessions)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use crate::error::AdapterResult;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryAdapter;
pub use sqlite::{SqliteAdapter, SqliteConfig};

/// Asynchronous string key/value persistence.
///
/// Implementations must be safe to share between tasks. A `get` after a
/// successful `set` on the same key returns the value that was set.
#[async_trait]
pub trait KvAdapter: Send + Sync {
    /// Short backend name used in log lines.
    fn name(&self) -> &'static str;

    /// Reads a key. `Ok(None)` means the key was never written or was removed.
    async fn get(&self, key: &str) -> AdapterResult<Option<String>>;

    /// Writes a key, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> AdapterResult<()>;

    /// Removes a key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> AdapterResult<()>;
}
