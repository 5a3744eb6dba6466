//! # Error Types
//!
//! Domain-specific error types for innkeep-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  innkeep-core errors (this file)                                        │
//! │  └── ValidationError  - Bad collection name, id, record or patch       │
//! │                                                                         │
//! │  innkeep-store errors (separate crate)                                  │
//! │  ├── AdapterError     - Key/value backend failures                     │
//! │  └── StoreError       - What callers of the DocumentStore see          │
//! │                                                                         │
//! │  Flow: ValidationError → StoreError::Validation → caller               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before the store touches its mirror or the adapter, so a rejected
/// call never leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required value is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., illegal characters in a collection name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A record or patch did not serialize to a JSON object.
    ///
    /// ## When This Occurs
    /// - `insert` called with a string, number or array
    /// - `update` called with a patch that is not a map
    #[error("{what} must be a JSON object")]
    NotAnObject { what: String },

    /// A patch tried to change a field that is fixed after insert.
    ///
    /// ## Immutable Fields
    /// - `id`
    /// - `created_at`
    #[error("{field} cannot be changed once a record is stored")]
    ImmutableField { field: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
