//! Baseline records for a brand-new store.
//!
//! Runs from `initialize` when the `users` collection is empty. Each
//! collection is only seeded if it is itself empty, and `users` goes last, so
//! a seed interrupted by an adapter failure is finished by the next
//! `initialize` without duplicating what already landed.

use innkeep_core::schema::{self, ANCHOR_COLLECTION};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::StoreResult;
use crate::store::DocumentStore;

/// Inserts the baseline set and returns how many records were written.
pub(crate) async fn seed_baseline(store: &DocumentStore) -> StoreResult<usize> {
    let batches = [
        (schema::ROOMS, starter_rooms()),
        (schema::MENU_ITEMS, starter_menu()),
        (schema::INVENTORY, starter_inventory()),
        (ANCHOR_COLLECTION, vec![admin_profile()]),
    ];

    let mut inserted = 0;
    for (collection, records) in batches {
        if store.is_degraded(collection) || store.count(collection).await? > 0 {
            debug!(collection = %collection, "Collection not empty, skipping seed");
            continue;
        }

        for record in &records {
            store.insert(collection, record).await?;
            inserted += 1;
        }
    }

    Ok(inserted)
}

fn admin_profile() -> Value {
    json!({
        "name": "Administrator",
        "email": "admin@innkeep.local",
        "role": "admin",
        "pin": "0000",
        "is_active": true,
    })
}

fn starter_rooms() -> Vec<Value> {
    [
        ("101", "single", 1, 3500.0),
        ("102", "double", 1, 5000.0),
        ("103", "double", 1, 5000.0),
        ("201", "suite", 2, 9000.0),
    ]
    .into_iter()
    .map(|(number, room_type, floor, rate)| {
        json!({
            "number": number,
            "room_type": room_type,
            "floor": floor,
            "rate": rate,
            "status": "available",
        })
    })
    .collect()
}

fn starter_menu() -> Vec<Value> {
    [
        ("Breakfast Set", "breakfast", 850.0),
        ("Club Sandwich", "snacks", 650.0),
        ("Coffee", "beverages", 250.0),
        ("Fresh Juice", "beverages", 300.0),
    ]
    .into_iter()
    .map(|(name, category, price)| {
        json!({
            "name": name,
            "category": category,
            "price": price,
            "is_available": true,
        })
    })
    .collect()
}

fn starter_inventory() -> Vec<Value> {
    [
        ("Coffee Beans", "kg", 5.0, 2.0),
        ("Bread", "loaf", 20.0, 10.0),
        ("Milk", "litre", 12.0, 6.0),
        ("Eggs", "dozen", 8.0, 4.0),
    ]
    .into_iter()
    .map(|(name, unit, current_stock, min_stock)| {
        json!({
            "name": name,
            "unit": unit,
            "current_stock": current_stock,
            "min_stock": min_stock,
        })
    })
    .collect()
}
