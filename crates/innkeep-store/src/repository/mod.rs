//! # Typed Repositories
//!
//! Typed access to one collection at a time.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Screen / command                                                      │
//! │       │                                                                 │
//! │       │  store.rooms().with_status(RoomStatus::Available)              │
//! │       ▼                                                                 │
//! │  Repository<Room>                                                      │
//! │  ├── list / find / get_by_id / count                                   │
//! │  ├── insert / update / delete                                          │
//! │  └── collection-specific helpers (rooms.rs, kitchen.rs)                │
//! │       │                                                                 │
//! │       │  Record ⇄ Room via serde                                        │
//! │       ▼                                                                 │
//! │  DocumentStore ("rooms")                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A repository is a thin handle: it owns a clone of the store and the
//! collection name comes from [`Document::COLLECTION`].

use std::marker::PhantomData;

use innkeep_core::{
    Booking, Customer, Document, InventoryItem, MenuItem, Order, Room, Transaction, UserProfile,
};
use serde::Serialize;

use crate::error::StoreResult;
use crate::query::SelectOptions;
use crate::store::DocumentStore;

pub mod kitchen;
pub mod rooms;

/// Typed handle on the collection of `T`.
pub struct Repository<T: Document> {
    store: DocumentStore,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Repository::new(self.store.clone())
    }
}

impl<T: Document> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("collection", &T::COLLECTION)
            .finish()
    }
}

impl<T: Document> Repository<T> {
    pub fn new(store: DocumentStore) -> Self {
        Repository {
            store,
            _marker: PhantomData,
        }
    }

    /// Name of the backing collection.
    pub fn collection(&self) -> &'static str {
        T::COLLECTION
    }

    /// Every document, in insertion order.
    pub async fn list(&self) -> StoreResult<Vec<T>> {
        self.find(&SelectOptions::new()).await
    }

    /// Documents matching `options`.
    pub async fn find(&self, options: &SelectOptions) -> StoreResult<Vec<T>> {
        self.store.select_as(T::COLLECTION, options).await
    }

    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<T>> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(record) => record
                .to_typed()
                .map(Some)
                .map_err(|e| crate::StoreError::serialization(T::COLLECTION, e)),
            None => Ok(None),
        }
    }

    pub async fn count(&self) -> StoreResult<usize> {
        self.store.count(T::COLLECTION).await
    }

    /// Inserts new data (usually without `id` or timestamps) and returns the
    /// stored document.
    pub async fn insert<D: Serialize + ?Sized>(&self, data: &D) -> StoreResult<T> {
        self.store.insert_as(T::COLLECTION, data).await
    }

    /// Applies a patch (e.g. a `RoomPatch`) and returns the stored document.
    pub async fn update<P: Serialize + ?Sized>(&self, id: &str, patch: &P) -> StoreResult<T> {
        self.store.update_as(T::COLLECTION, id, patch).await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        self.store.delete(T::COLLECTION, id).await
    }
}

// =============================================================================
// Store Accessors
// =============================================================================

impl DocumentStore {
    /// Staff profiles.
    pub fn users(&self) -> Repository<UserProfile> {
        Repository::new(self.clone())
    }

    /// Returns the room repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let free = store.rooms().with_status(RoomStatus::Available).await?;
    /// ```
    pub fn rooms(&self) -> Repository<Room> {
        Repository::new(self.clone())
    }

    pub fn bookings(&self) -> Repository<Booking> {
        Repository::new(self.clone())
    }

    pub fn menu_items(&self) -> Repository<MenuItem> {
        Repository::new(self.clone())
    }

    pub fn orders(&self) -> Repository<Order> {
        Repository::new(self.clone())
    }

    pub fn inventory(&self) -> Repository<InventoryItem> {
        Repository::new(self.clone())
    }

    /// Income and expense ledger.
    pub fn transactions(&self) -> Repository<Transaction> {
        Repository::new(self.clone())
    }

    pub fn customers(&self) -> Repository<Customer> {
        Repository::new(self.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use innkeep_core::{RoomPatch, RoomStatus};
    use serde_json::json;
    use std::sync::Arc;

    use crate::adapter::MemoryAdapter;
    use crate::config::StoreConfig;
    use crate::StoreError;

    fn store() -> DocumentStore {
        DocumentStore::new(
            Arc::new(MemoryAdapter::new()),
            StoreConfig::default().with_seed_on_empty(false),
        )
    }

    #[tokio::test]
    async fn test_typed_crud() {
        let store = store();
        let rooms = store.rooms();
        assert_eq!(rooms.collection(), "rooms");

        let room = rooms
            .insert(&json!({
                "number": "301",
                "room_type": "suite",
                "floor": 3,
                "rate": 12000,
                "status": "available"
            }))
            .await
            .unwrap();
        assert_eq!(room.status, RoomStatus::Available);
        assert_eq!(room.created_at, room.updated_at);

        let updated = rooms
            .update(&room.id, &RoomPatch::status(RoomStatus::Occupied))
            .await
            .unwrap();
        assert_eq!(updated.status, RoomStatus::Occupied);
        assert_eq!(updated.rate, 12000.0);
        assert_eq!(updated.created_at, room.created_at);

        let fetched = rooms.get_by_id(&room.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
        assert_eq!(rooms.count().await.unwrap(), 1);

        assert!(rooms.delete(&room.id).await.unwrap());
        assert!(rooms.get_by_id(&room.id).await.unwrap().is_none());
        assert!(rooms.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_serialization_error() {
        let store = store();
        store
            .insert("rooms", &json!({ "number": 7, "status": "flooded" }))
            .await
            .unwrap();

        let err = store.rooms().list().await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization { .. }));
        assert_eq!(err.collection(), Some("rooms"));
    }
}
