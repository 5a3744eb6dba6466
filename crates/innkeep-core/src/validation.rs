//! # Validation Module
//!
//! Input rules the store checks before it touches its mirror or the adapter.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (screen / command)                                    │
//! │  └── Field-level business checks                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Collection names are safe to embed in adapter keys                │
//! │  ├── Supplied ids are non-empty strings                                │
//! │  └── Patches leave id / created_at alone                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: DocumentStore                                                │
//! │  └── Id uniqueness within the collection                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::record::{values_equal, Record, CREATED_AT_FIELD, ID_FIELD};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum collection name length.
pub const MAX_COLLECTION_NAME_LEN: usize = 64;

/// Maximum record id length.
pub const MAX_RECORD_ID_LEN: usize = 128;

/// Fields a patch may repeat but never change.
const IMMUTABLE_FIELDS: &[&str] = &[ID_FIELD, CREATED_AT_FIELD];

// =============================================================================
// Collection Names
// =============================================================================

/// Validates a collection name.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Only lowercase ASCII letters, digits and underscores
///
/// ## Example
/// ```rust
/// use innkeep_core::validation::validate_collection_name;
///
/// assert!(validate_collection_name("menu_items").is_ok());
/// assert!(validate_collection_name("").is_err());
/// assert!(validate_collection_name("Rooms!").is_err());
/// ```
pub fn validate_collection_name(name: &str) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "collection".to_string(),
        });
    }

    if name.len() > MAX_COLLECTION_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "collection".to_string(),
            max: MAX_COLLECTION_NAME_LEN,
        });
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "collection".to_string(),
            reason: "must contain only lowercase letters, digits, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Record Ids
// =============================================================================

/// Validates a record id string.
pub fn validate_record_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: ID_FIELD.to_string(),
        });
    }

    if id.len() > MAX_RECORD_ID_LEN {
        return Err(ValidationError::TooLong {
            field: ID_FIELD.to_string(),
            max: MAX_RECORD_ID_LEN,
        });
    }

    Ok(())
}

/// Extracts the caller-supplied id of a record about to be inserted.
///
/// ## Returns
/// * `Ok(None)` - No id (absent or `null`); the store generates one
/// * `Ok(Some(id))` - A valid string id
/// * `Err(_)` - Id present but not a valid non-empty string
pub fn supplied_id(record: &Record) -> ValidationResult<Option<String>> {
    match record.get(ID_FIELD) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => {
            validate_record_id(id)?;
            Ok(Some(id.clone()))
        }
        Some(_) => Err(ValidationError::InvalidFormat {
            field: ID_FIELD.to_string(),
            reason: "must be a string".to_string(),
        }),
    }
}

// =============================================================================
// Patches
// =============================================================================

/// Checks that a patch does not rewrite immutable fields of `existing`.
///
/// Repeating the current value is allowed, so a caller can send back a whole
/// record it previously read.
pub fn validate_patch(existing: &Record, patch: &Map<String, Value>) -> ValidationResult<()> {
    for field in IMMUTABLE_FIELDS {
        if let Some(new_value) = patch.get(*field) {
            let unchanged = existing
                .get(field)
                .map(|current| values_equal(current, new_value))
                .unwrap_or(false);

            if !unchanged {
                return Err(ValidationError::ImmutableField {
                    field: field.to_string(),
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
