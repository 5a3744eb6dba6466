//! # Typed Documents
//!
//! Strongly typed views of the known collections.
//!
//! The store itself only deals in [`Record`](crate::Record)s, which keeps it
//! open to any JSON shape. Callers that know what a collection holds use these
//! structs instead, through `DocumentStore::select_as` or the typed
//! repositories.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  collection    document        patch            status enum            │
//! │  ────────────  ──────────────  ───────────────  ─────────────────────  │
//! │  users         UserProfile     UserPatch        UserRole               │
//! │  rooms         Room            RoomPatch        RoomStatus             │
//! │  bookings      Booking         BookingPatch     BookingStatus          │
//! │  menu_items    MenuItem        -                -                      │
//! │  orders        Order           OrderPatch       OrderStatus            │
//! │  inventory     InventoryItem   InventoryPatch   -                      │
//! │  transactions  Transaction     -                TransactionType        │
//! │  customers     Customer        -                -                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Patches
//! Every patch field is an `Option` that is skipped when `None`, so the JSON a
//! patch serializes to contains exactly the fields being changed. That is what
//! the store's shallow merge expects.
//!
//! Relationships (`Booking::room_id`, `OrderLine::menu_item_id`) are plain ids;
//! the store does not enforce them.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema;

// =============================================================================
// Document Trait
// =============================================================================

/// A typed record bound to one collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection the document lives in.
    const COLLECTION: &'static str;

    /// The record id.
    fn id(&self) -> &str;
}

macro_rules! impl_document {
    ($ty:ty, $collection:expr) => {
        impl Document for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Users
// =============================================================================

/// Role of a staff profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Staff,
}

/// A staff profile. `users` is the anchor collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub role: UserRole,
    /// Quick-login PIN used at the terminal.
    pub pin: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl_document!(UserProfile, schema::USERS);

/// Partial update for a [`UserProfile`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// =============================================================================
// Rooms
// =============================================================================

/// Housekeeping status of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Reserved,
    Cleaning,
    Maintenance,
}

impl RoomStatus {
    /// The stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Reserved => "reserved",
            RoomStatus::Cleaning => "cleaning",
            RoomStatus::Maintenance => "maintenance",
        }
    }
}

/// A rentable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Room {
    pub id: String,
    /// Door number shown to guests (e.g. "101").
    pub number: String,
    pub room_type: String,
    pub floor: Option<i64>,
    /// Nightly rate.
    pub rate: f64,
    pub status: RoomStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl_document!(Room, schema::ROOMS);

/// Partial update for a [`Room`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoomPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RoomStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
}

impl RoomPatch {
    /// Patch that only moves the room to a new status.
    pub fn status(status: RoomStatus) -> Self {
        RoomPatch {
            status: Some(status),
            ..Default::default()
        }
    }
}

// =============================================================================
// Bookings
// =============================================================================

/// Lifecycle of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

/// A guest stay. Dates are ISO `YYYY-MM-DD` strings, compared as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Booking {
    pub id: String,
    pub room_id: String,
    pub guest_name: String,
    pub guest_phone: Option<String>,
    pub check_in_date: String,
    pub check_out_date: String,
    pub status: BookingStatus,
    pub total_amount: f64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl_document!(Booking, schema::BOOKINGS);

/// Partial update for a [`Booking`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
}

// =============================================================================
// Menu
// =============================================================================

/// A sellable item on the restaurant / room-service menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl_document!(MenuItem, schema::MENU_ITEMS);

// =============================================================================
// Orders
// =============================================================================

/// Kitchen / service status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Served,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Statuses counted as "active" on the dashboard.
    pub const IN_PROGRESS: [OrderStatus; 3] =
        [OrderStatus::Pending, OrderStatus::Preparing, OrderStatus::Ready];

    /// The stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// One line of an order, snapshotting the menu item at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl OrderLine {
    /// Unit price × quantity.
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// A food & beverage order, optionally charged to a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    pub status: OrderStatus,
    pub total: f64,
    pub room_id: Option<String>,
    pub table_number: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl_document!(Order, schema::ORDERS);

impl Order {
    /// Sum of the line totals (may differ from `total` after discounts).
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(OrderLine::line_total).sum()
    }
}

/// Partial update for an [`Order`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

// =============================================================================
// Inventory
// =============================================================================

/// A stock-tracked supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub current_stock: f64,
    /// Reorder threshold.
    pub min_stock: f64,
    pub cost_per_unit: Option<f64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl_document!(InventoryItem, schema::INVENTORY);

impl InventoryItem {
    /// Stock is at or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock
    }
}

/// Partial update for an [`InventoryItem`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stock: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_unit: Option<f64>,
}

// =============================================================================
// Transactions
// =============================================================================

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// The stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// An accounting ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    /// Stored under the `type` key.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    /// ISO date (`YYYY-MM-DD`) or date-time the entry belongs to.
    pub date: String,
    /// Order or booking that produced the entry, if any.
    pub reference_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl_document!(Transaction, schema::TRANSACTIONS);

// =============================================================================
// Customers
// =============================================================================

/// A returning guest or account customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl_document!(Customer, schema::CUSTOMERS);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_strings_match_serde() {
        for status in [RoomStatus::Available, RoomStatus::Occupied, RoomStatus::Cleaning] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        }
        for status in OrderStatus::IN_PROGRESS {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        }
        assert_eq!(
            serde_json::to_value(TransactionType::Income).unwrap(),
            json!("income")
        );
    }

    #[test]
    fn test_patch_omits_unset_fields() {
        let patch = RoomPatch::status(RoomStatus::Occupied);
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "status": "occupied" }));

        let empty = InventoryPatch::default();
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({}));
    }

    #[test]
    fn test_transaction_kind_uses_type_key() {
        let value = json!({
            "id": "t1",
            "type": "income",
            "amount": 120,
            "category": "room",
            "date": "2026-10-19",
            "created_at": "2026-10-19T08:00:00.000Z",
            "updated_at": "2026-10-19T08:00:00.000Z"
        });
        let tx: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(tx.kind, TransactionType::Income);
        assert_eq!(tx.amount, 120.0);
        assert_eq!(tx.description, None);
    }

    #[test]
    fn test_order_items_total() {
        let order = Order {
            id: "o1".to_string(),
            items: vec![
                OrderLine {
                    menu_item_id: "m1".to_string(),
                    name: "Coffee".to_string(),
                    quantity: 2,
                    unit_price: 2.5,
                },
                OrderLine {
                    menu_item_id: "m2".to_string(),
                    name: "Club Sandwich".to_string(),
                    quantity: 1,
                    unit_price: 9.0,
                },
            ],
            status: OrderStatus::Pending,
            total: 14.0,
            room_id: None,
            table_number: Some("4".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(order.items_total(), 14.0);
        assert_eq!(Order::COLLECTION, "orders");
        assert_eq!(order.id(), "o1");
    }

    #[test]
    fn test_low_stock_threshold_is_inclusive() {
        let mut item = InventoryItem {
            id: "i1".to_string(),
            name: "Milk".to_string(),
            unit: "liter".to_string(),
            current_stock: 4.0,
            min_stock: 4.0,
            cost_per_unit: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(item.is_low_stock());
        item.current_stock = 4.5;
        assert!(!item.is_low_stock());
    }
}
