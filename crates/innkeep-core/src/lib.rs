//! # innkeep-core: Pure Record Model for Innkeep
//!
//! This crate holds everything about the document store that can be decided
//! without touching storage: what a record is, how two JSON values compare,
//! which collections exist, what a valid id looks like, and how the dashboard
//! counters are derived from a scan of records.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Innkeep Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           Callers (cart, orders, accounting, rooms)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ select / insert / update / delete      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 innkeep-store (DocumentStore)                   │   │
//! │  │        lifecycle, locking, write-through, KV adapters           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ uses                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ innkeep-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌────────────┐  ┌──────────┐     │   │
//! │  │   │  record  │  │  types   │  │ validation │  │  stats   │     │   │
//! │  │   │  Record  │  │  Room    │  │  ids,      │  │ Dashboard│     │   │
//! │  │   │  compare │  │  Order.. │  │  patches   │  │  Stats   │     │   │
//! │  │   └──────────┘  └──────────┘  └────────────┘  └──────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO ADAPTER • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`record`] - `Record`, the semi-structured JSON object every collection holds
//! - [`schema`] - Known collection names, the anchor collection, storage keys
//! - [`types`] - Typed documents (Room, Booking, Order, ...) and their patches
//! - [`validation`] - Collection name, id and patch rules
//! - [`stats`] - Dashboard aggregation over scanned records
//! - [`error`] - Validation error type
//!
//! ## Example Usage
//!
//! ```rust
//! use innkeep_core::Record;
//! use serde_json::json;
//!
//! let record = Record::from_value(json!({ "id": "r-1", "status": "occupied" })).unwrap();
//! assert_eq!(record.id(), Some("r-1"));
//! assert_eq!(record.get_str("status"), Some("occupied"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod record;
pub mod schema;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use record::{compare_values, values_equal, Record, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD};
pub use stats::{DashboardInput, DashboardStats};
pub use types::*;
