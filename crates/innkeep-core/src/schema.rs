//! # Collection Schema
//!
//! The fixed set of collections the store hydrates at startup, and how each
//! one maps onto a key of the persistence adapter.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  collection     storage key (default prefix)                           │
//! │  ────────────   ──────────────────────────────                         │
//! │  users  ★       innkeep:users         ★ anchor: empty → seed baseline  │
//! │  rooms          innkeep:rooms                                          │
//! │  bookings       innkeep:bookings                                       │
//! │  menu_items     innkeep:menu_items                                     │
//! │  orders         innkeep:orders                                         │
//! │  inventory      innkeep:inventory                                      │
//! │  transactions   innkeep:transactions                                   │
//! │  customers      innkeep:customers                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Collections outside this list are still legal; they are created the first
//! time a caller references them and are simply not hydrated eagerly.

pub const USERS: &str = "users";
pub const ROOMS: &str = "rooms";
pub const BOOKINGS: &str = "bookings";
pub const MENU_ITEMS: &str = "menu_items";
pub const ORDERS: &str = "orders";
pub const INVENTORY: &str = "inventory";
pub const TRANSACTIONS: &str = "transactions";
pub const CUSTOMERS: &str = "customers";

/// Every collection hydrated by `initialize()`, in hydration order.
pub const KNOWN_COLLECTIONS: &[&str] = &[
    USERS,
    ROOMS,
    BOOKINGS,
    MENU_ITEMS,
    ORDERS,
    INVENTORY,
    TRANSACTIONS,
    CUSTOMERS,
];

/// The collection whose emptiness after hydration triggers seeding.
pub const ANCHOR_COLLECTION: &str = USERS;

/// Default namespace prefix for adapter keys.
pub const DEFAULT_KEY_PREFIX: &str = "innkeep:";

/// Returns true if the collection belongs to the startup schema.
pub fn is_known(collection: &str) -> bool {
    KNOWN_COLLECTIONS.contains(&collection)
}

/// Builds the adapter key for a collection.
pub fn storage_key(prefix: &str, collection: &str) -> String {
    format!("{}{}", prefix, collection)
}
