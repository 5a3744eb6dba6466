//! # Dashboard Statistics
//!
//! Counters and revenue sums derived from a scan of five collections.
//!
//! ## Aggregation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  counter           source         rule                                 │
//! │  ───────────────   ────────────   ───────────────────────────────────  │
//! │  totalRooms        rooms          every record                         │
//! │  occupiedRooms     rooms          status == "occupied"                 │
//! │  availableRooms    rooms          status == "available"                │
//! │  todayCheckIns     bookings       check_in_date  == today (string)     │
//! │  todayCheckOuts    bookings       check_out_date == today (string)     │
//! │  activeOrders      orders         status ∈ {pending, preparing, ready} │
//! │  lowStockItems     inventory      current_stock <= min_stock           │
//! │  todayRevenue      transactions   type == "income", date starts today  │
//! │  monthlyRevenue    transactions   type == "income", date starts YYYY-MM│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dates are compared as strings, not as timezone-aware ranges. A scan is
//! O(records); there are no indexes behind it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::record::Record;
use crate::types::{OrderStatus, RoomStatus, TransactionType};

/// Snapshot of the dashboard counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub available_rooms: usize,
    pub today_check_ins: usize,
    pub today_check_outs: usize,
    pub active_orders: usize,
    pub low_stock_items: usize,
    pub today_revenue: f64,
    pub monthly_revenue: f64,
}

/// The scanned collections a [`DashboardStats`] is computed from.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardInput<'a> {
    pub rooms: &'a [Record],
    pub bookings: &'a [Record],
    pub orders: &'a [Record],
    pub inventory: &'a [Record],
    pub transactions: &'a [Record],
}

impl DashboardStats {
    /// Computes every counter as of `today`.
    pub fn compute(input: DashboardInput<'_>, today: NaiveDate) -> Self {
        let day = today.format("%Y-%m-%d").to_string();
        let month = today.format("%Y-%m").to_string();

        let rooms_with = |status: RoomStatus| {
            input
                .rooms
                .iter()
                .filter(|r| r.get_str("status") == Some(status.as_str()))
                .count()
        };

        let bookings_on = |field: &str| {
            input
                .bookings
                .iter()
                .filter(|b| b.get_str(field) == Some(day.as_str()))
                .count()
        };

        let active_orders = input
            .orders
            .iter()
            .filter(|o| {
                o.get_str("status")
                    .map(|s| OrderStatus::IN_PROGRESS.iter().any(|active| active.as_str() == s))
                    .unwrap_or(false)
            })
            .count();

        let low_stock_items = input
            .inventory
            .iter()
            .filter(|i| match (i.get_f64("current_stock"), i.get_f64("min_stock")) {
                (Some(current), Some(min)) => current <= min,
                _ => false,
            })
            .count();

        DashboardStats {
            total_rooms: input.rooms.len(),
            occupied_rooms: rooms_with(RoomStatus::Occupied),
            available_rooms: rooms_with(RoomStatus::Available),
            today_check_ins: bookings_on("check_in_date"),
            today_check_outs: bookings_on("check_out_date"),
            active_orders,
            low_stock_items,
            today_revenue: income_with_prefix(input.transactions, &day),
            monthly_revenue: income_with_prefix(input.transactions, &month),
        }
    }
}

fn income_with_prefix(transactions: &[Record], prefix: &str) -> f64 {
    transactions
        .iter()
        .filter(|t| t.get_str("type") == Some(TransactionType::Income.as_str()))
        .filter(|t| t.get_str("date").map(|d| d.starts_with(prefix)).unwrap_or(false))
        .filter_map(|t| t.get_f64("amount"))
        .sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
