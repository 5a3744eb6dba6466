//! # Store Error Types
//!
//! Error types for adapter and document store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)         Validation (innkeep-core)          │
//! │       │                                   │                             │
//! │       ▼                                   │                             │
//! │  AdapterError ← backend categorization    │                             │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  StoreError ← adds the offending collection / id                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller shows "failed to load/save" and offers a retry                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store never retries internally; every failure is returned as-is.

use innkeep_core::ValidationError;
use thiserror::Error;

// =============================================================================
// Adapter Errors
// =============================================================================

/// Failures of the key/value persistence layer.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Backend could not be opened.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Embedded migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A read, write or delete was rejected by the backend.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Backend refused the operation (closed, or failure injected in tests).
    #[error("Adapter unavailable: {0}")]
    Unavailable(String),
}

/// Convert sqlx errors to AdapterError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → AdapterError::QueryFailed
/// sqlx::Error::PoolTimedOut   → AdapterError::PoolExhausted
/// sqlx::Error::PoolClosed     → AdapterError::Unavailable
/// Other                       → AdapterError::QueryFailed
/// ```
impl From<sqlx::Error> for AdapterError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => AdapterError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => AdapterError::PoolExhausted,
            sqlx::Error::PoolClosed => AdapterError::Unavailable("Pool is closed".to_string()),
            _ => AdapterError::QueryFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AdapterError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AdapterError::MigrationFailed(err.to_string())
    }
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

// =============================================================================
// Store Errors
// =============================================================================

/// Errors returned by [`DocumentStore`](crate::DocumentStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persistence adapter failed while reading or writing a collection.
    #[error("Storage I/O failed for collection '{collection}': {source}")]
    AdapterIo {
        collection: String,
        #[source]
        source: AdapterError,
    },

    /// The backend could not be opened at all.
    #[error("Storage backend unavailable: {0}")]
    Backend(#[from] AdapterError),

    /// No record with the given id exists in the collection.
    ///
    /// ## When This Occurs
    /// - `update` on an id that was never inserted
    /// - `update` after the record was deleted
    #[error("{collection} record not found: {id}")]
    NotFound { collection: String, id: String },

    /// A stored value could not be decoded or a value could not be encoded.
    #[error("Serialization failed for collection '{collection}': {message}")]
    Serialization { collection: String, message: String },

    /// A caller-supplied id is already taken.
    #[error("Duplicate id in {collection}: '{id}' already exists")]
    DuplicateId { collection: String, id: String },

    /// Input failed validation before anything was touched.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration could not be loaded, saved or validated.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Creates a NotFound error for a collection and id.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates a DuplicateId error.
    pub fn duplicate(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::DuplicateId {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Wraps an adapter failure with the collection it happened on.
    pub fn adapter(collection: impl Into<String>, source: AdapterError) -> Self {
        StoreError::AdapterIo {
            collection: collection.into(),
            source,
        }
    }

    /// Wraps a serde failure with the collection it happened on.
    pub fn serialization(collection: impl Into<String>, err: impl std::fmt::Display) -> Self {
        StoreError::Serialization {
            collection: collection.into(),
            message: err.to_string(),
        }
    }

    /// Returns true for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// The collection the error refers to, when there is one.
    pub fn collection(&self) -> Option<&str> {
        match self {
            StoreError::AdapterIo { collection, .. }
            | StoreError::NotFound { collection, .. }
            | StoreError::Serialization { collection, .. }
            | StoreError::DuplicateId { collection, .. } => Some(collection),
            StoreError::Backend(_) | StoreError::Validation(_) | StoreError::Config(_) => None,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::not_found("rooms", "r-9");
        assert_eq!(err.to_string(), "rooms record not found: r-9");
        assert!(err.is_not_found());
        assert_eq!(err.collection(), Some("rooms"));

        let err = StoreError::adapter("orders", AdapterError::PoolExhausted);
        assert_eq!(
            err.to_string(),
            "Storage I/O failed for collection 'orders': Connection pool exhausted"
        );
    }

    #[test]
    fn test_validation_converts_to_store_error() {
        let err: StoreError = ValidationError::Required {
            field: "collection".to_string(),
        }
        .into();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(err.collection(), None);
    }
}
