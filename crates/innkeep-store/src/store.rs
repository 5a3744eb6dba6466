//! # Document Store
//!
//! Named collections of [`Record`]s, mirrored in memory and written through
//! to a [`KvAdapter`] one whole collection at a time.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    insert / update / delete                             │
//! │                                                                         │
//! │  validate input (no lock held)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock collection ◄── concurrent writers to the same collection wait   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  hydrate from adapter if this is the first touch                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stage the next array (mirror untouched)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  adapter.set("<prefix><collection>", json)                             │
//! │       │                                                                 │
//! │       ├── Err ──► return AdapterIo, mirror still at previous state     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  commit staged array to the mirror, unlock                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locks
//! `lifecycle` (initialize / clear) is always taken before any collection
//! lock. Record operations only take their own collection lock, so different
//! collections never wait on each other.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex as StdMutex, PoisonError, RwLock};

use chrono::{Local, NaiveDate, SecondsFormat, Utc};
use innkeep_core::schema::{self, ANCHOR_COLLECTION, KNOWN_COLLECTIONS};
use innkeep_core::validation::{self, validate_collection_name};
use innkeep_core::{
    DashboardInput, DashboardStats, Record, ValidationError, CREATED_AT_FIELD, ID_FIELD,
    UPDATED_AT_FIELD,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::adapter::{KvAdapter, SqliteAdapter};
use crate::config::{StoreConfig, StoreSettings};
use crate::error::{StoreError, StoreResult};
use crate::query::SelectOptions;
use crate::seed;

// =============================================================================
// Collection Mirror
// =============================================================================

#[derive(Debug, Default)]
struct Collection {
    records: Vec<Record>,
    hydrated: bool,
}

impl Collection {
    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == Some(id))
    }
}

/// Outcome of reading one collection from the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hydration {
    /// Already in memory; the adapter was not consulted.
    Cached,
    /// No key stored yet.
    Missing,
    Loaded,
    /// Stored payload was not a JSON array of objects.
    Degraded,
}

// =============================================================================
// Document Store
// =============================================================================

struct StoreInner {
    adapter: Arc<dyn KvAdapter>,
    settings: StoreSettings,
    collections: RwLock<HashMap<String, Arc<Mutex<Collection>>>>,
    /// `true` once `initialize` has completed.
    lifecycle: Mutex<bool>,
    degraded: StdMutex<BTreeSet<String>>,
}

/// The embedded document store.
///
/// Cheap to clone; every clone shares the same mirror and adapter.
///
/// ## Usage
/// ```rust,ignore
/// let store = DocumentStore::open(&StoreConfig::load_or_default(None)).await?;
/// store.initialize().await?;
///
/// let room = store.insert("rooms", &json!({ "number": "101", "status": "available" })).await?;
/// let free = store
///     .select("rooms", &SelectOptions::new().filter("status", "available"))
///     .await?;
/// ```
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("adapter", &self.inner.adapter.name())
            .field("key_prefix", &self.inner.settings.key_prefix)
            .finish()
    }
}

impl DocumentStore {
    /// Creates a store over `adapter`. Nothing is read until the first call.
    pub fn new(adapter: Arc<dyn KvAdapter>, config: StoreConfig) -> Self {
        DocumentStore {
            inner: Arc::new(StoreInner {
                adapter,
                settings: config.store,
                collections: RwLock::new(HashMap::new()),
                lifecycle: Mutex::new(false),
                degraded: StdMutex::new(BTreeSet::new()),
            }),
        }
    }

    /// Connects the SQLite adapter described by `config` and wraps it in a
    /// store. Does not initialize.
    pub async fn open(config: &StoreConfig) -> StoreResult<Self> {
        let sqlite = config.sqlite_config()?;
        let adapter = SqliteAdapter::connect(sqlite).await?;
        Ok(Self::new(Arc::new(adapter), config.clone()))
    }

    /// Name of the backing adapter.
    pub fn adapter_name(&self) -> &'static str {
        self.inner.adapter.name()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Loads every known collection and seeds an empty store.
    ///
    /// ## What This Does
    /// 1. Reads each known collection from the adapter
    /// 2. Writes `[]` for collections that were never stored
    /// 3. Leaves malformed payloads alone and reports them as degraded
    /// 4. Seeds baseline records if the anchor collection is empty
    ///
    /// Idempotent: concurrent and repeated calls do the work once. An error
    /// leaves the store uninitialized so a later call starts over.
    pub async fn initialize(&self) -> StoreResult<()> {
        let mut initialized = self.inner.lifecycle.lock().await;
        if *initialized {
            debug!("Store already initialized");
            return Ok(());
        }

        info!(adapter = self.adapter_name(), "Initializing document store");

        for name in KNOWN_COLLECTIONS {
            let handle = self.collection_handle(name)?;
            let mut collection = handle.lock().await;
            collection.hydrated = false;

            if self.hydrate(name, &mut collection).await? == Hydration::Missing {
                self.inner
                    .adapter
                    .set(&self.key(name), "[]")
                    .await
                    .map_err(|e| StoreError::adapter(*name, e))?;
            }
        }

        if self.inner.settings.seed_on_empty && self.count(ANCHOR_COLLECTION).await? == 0 {
            if self.is_degraded(ANCHOR_COLLECTION) {
                warn!(
                    collection = ANCHOR_COLLECTION,
                    "Anchor collection is degraded, skipping seed"
                );
            } else {
                let inserted = seed::seed_baseline(self).await?;
                info!(count = inserted, "Seeded baseline records");
            }
        }

        *initialized = true;
        info!("Document store initialized");
        Ok(())
    }

    /// Returns true once `initialize` has completed and no reset followed.
    pub async fn is_initialized(&self) -> bool {
        *self.inner.lifecycle.lock().await
    }

    /// Empties every collection and removes its adapter key.
    ///
    /// The next `initialize` starts from scratch, seeding included. There is
    /// no confirmation or backup here; that belongs to the caller.
    pub async fn clear_all_data(&self) -> StoreResult<()> {
        let mut initialized = self.inner.lifecycle.lock().await;
        *initialized = false;

        let names = self.collection_names();
        info!(collections = names.len(), "Clearing all data");

        for name in &names {
            let handle = self.collection_handle(name)?;
            let mut collection = handle.lock().await;

            self.inner
                .adapter
                .remove(&self.key(name))
                .await
                .map_err(|e| StoreError::adapter(name.as_str(), e))?;

            collection.records.clear();
            collection.hydrated = true;
            self.clear_degraded(name);
        }

        info!("All data cleared");
        Ok(())
    }

    /// Collections whose stored payload could not be parsed and that have not
    /// been rewritten since.
    pub fn degraded_collections(&self) -> Vec<String> {
        self.inner
            .degraded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Known collections plus every other collection referenced so far, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let registry = self
            .inner
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        KNOWN_COLLECTIONS
            .iter()
            .map(|name| name.to_string())
            .chain(registry.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns copies of the records matching `options`.
    ///
    /// An unknown collection reads as empty. Never writes.
    pub async fn select(&self, collection: &str, options: &SelectOptions) -> StoreResult<Vec<Record>> {
        let handle = self.collection_handle(collection)?;
        let mut guard = handle.lock().await;
        self.hydrate(collection, &mut guard).await?;

        let records = options.apply(&guard.records);
        debug!(collection = %collection, count = records.len(), "select");
        Ok(records)
    }

    /// [`select`](Self::select) deserialized into `T`.
    pub async fn select_as<T: DeserializeOwned>(
        &self,
        collection: &str,
        options: &SelectOptions,
    ) -> StoreResult<Vec<T>> {
        self.select(collection, options)
            .await?
            .iter()
            .map(|record| {
                record
                    .to_typed()
                    .map_err(|e| StoreError::serialization(collection, e))
            })
            .collect()
    }

    /// Returns the record with `id`, if any.
    pub async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Record>> {
        let handle = self.collection_handle(collection)?;
        let mut guard = handle.lock().await;
        self.hydrate(collection, &mut guard).await?;

        Ok(guard.position(id).map(|index| guard.records[index].clone()))
    }

    /// Number of records in a collection.
    pub async fn count(&self, collection: &str) -> StoreResult<usize> {
        let handle = self.collection_handle(collection)?;
        let mut guard = handle.lock().await;
        self.hydrate(collection, &mut guard).await?;
        Ok(guard.records.len())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts a record and returns it as stored.
    ///
    /// `data` must serialize to a JSON object. A missing or `null` id is
    /// replaced with a UUID v4; a supplied id must be a non-empty string not
    /// already present. `created_at` and `updated_at` are always set here.
    ///
    /// ## Errors
    /// * `Validation` - Not an object, or a malformed id
    /// * `DuplicateId` - The supplied id exists
    /// * `AdapterIo` - The write failed; nothing changed
    pub async fn insert<D: Serialize + ?Sized>(&self, collection: &str, data: &D) -> StoreResult<Record> {
        let mut record = to_map(collection, data, "record").map(Record::from)?;
        let supplied = validation::supplied_id(&record)?;

        let handle = self.collection_handle(collection)?;
        let mut guard = handle.lock().await;
        self.hydrate(collection, &mut guard).await?;

        let id = match supplied {
            Some(id) if guard.position(&id).is_some() => {
                return Err(StoreError::duplicate(collection, id));
            }
            Some(id) => id,
            None => Uuid::new_v4().to_string(),
        };

        let now = timestamp();
        record.insert(ID_FIELD, id.as_str());
        record.insert(CREATED_AT_FIELD, now.as_str());
        record.insert(UPDATED_AT_FIELD, now);

        {
            let staged: Vec<&Record> = guard.records.iter().chain(Some(&record)).collect();
            self.persist(collection, &staged).await?;
        }
        guard.records.push(record.clone());

        debug!(collection = %collection, id = %id, "insert");
        Ok(record)
    }

    /// [`insert`](Self::insert) returning the stored record as `T`.
    pub async fn insert_as<T, D>(&self, collection: &str, data: &D) -> StoreResult<T>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let record = self.insert(collection, data).await?;
        record
            .to_typed()
            .map_err(|e| StoreError::serialization(collection, e))
    }

    /// Shallow-merges `patch` into the record with `id` and returns the result.
    ///
    /// Fields the patch omits are kept. `updated_at` always moves forward.
    /// `id` and `created_at` may be repeated but not changed.
    ///
    /// ## Errors
    /// * `NotFound` - No record with `id`; nothing changed
    /// * `Validation` - Patch is not an object or rewrites an immutable field
    /// * `AdapterIo` - The write failed; nothing changed
    pub async fn update<P: Serialize + ?Sized>(
        &self,
        collection: &str,
        id: &str,
        patch: &P,
    ) -> StoreResult<Record> {
        let patch = to_map(collection, patch, "patch")?;

        let handle = self.collection_handle(collection)?;
        let mut guard = handle.lock().await;
        self.hydrate(collection, &mut guard).await?;

        let index = guard
            .position(id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        validation::validate_patch(&guard.records[index], &patch)?;

        let mut updated = guard.records[index].clone();
        updated.merge(patch);
        updated.insert(UPDATED_AT_FIELD, timestamp());

        {
            let staged: Vec<&Record> = guard
                .records
                .iter()
                .enumerate()
                .map(|(i, record)| if i == index { &updated } else { record })
                .collect();
            self.persist(collection, &staged).await?;
        }
        guard.records[index] = updated.clone();

        debug!(collection = %collection, id = %id, "update");
        Ok(updated)
    }

    /// [`update`](Self::update) returning the stored record as `T`.
    pub async fn update_as<T, P>(&self, collection: &str, id: &str, patch: &P) -> StoreResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let record = self.update(collection, id, patch).await?;
        record
            .to_typed()
            .map_err(|e| StoreError::serialization(collection, e))
    }

    /// Removes the record with `id`. Returns whether one was removed.
    ///
    /// Deleting an absent id is not an error. The collection is written
    /// either way.
    pub async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let handle = self.collection_handle(collection)?;
        let mut guard = handle.lock().await;
        self.hydrate(collection, &mut guard).await?;

        let removed = {
            let staged: Vec<&Record> = guard
                .records
                .iter()
                .filter(|record| record.id() != Some(id))
                .collect();
            let removed = staged.len() != guard.records.len();
            self.persist(collection, &staged).await?;
            removed
        };
        guard.records.retain(|record| record.id() != Some(id));

        debug!(collection = %collection, id = %id, removed, "delete");
        Ok(removed)
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Dashboard counters as of the local date.
    pub async fn dashboard_stats(&self) -> StoreResult<DashboardStats> {
        self.dashboard_stats_on(Local::now().date_naive()).await
    }

    /// Dashboard counters as of `today`.
    ///
    /// Each collection is read under its own lock, one after another, so the
    /// counters are not a single atomic snapshot across collections.
    pub async fn dashboard_stats_on(&self, today: NaiveDate) -> StoreResult<DashboardStats> {
        let all = SelectOptions::new();
        let rooms = self.select(schema::ROOMS, &all).await?;
        let bookings = self.select(schema::BOOKINGS, &all).await?;
        let orders = self.select(schema::ORDERS, &all).await?;
        let inventory = self.select(schema::INVENTORY, &all).await?;
        let transactions = self.select(schema::TRANSACTIONS, &all).await?;

        Ok(DashboardStats::compute(
            DashboardInput {
                rooms: &rooms,
                bookings: &bookings,
                orders: &orders,
                inventory: &inventory,
                transactions: &transactions,
            },
            today,
        ))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn key(&self, collection: &str) -> String {
        schema::storage_key(&self.inner.settings.key_prefix, collection)
    }

    /// Returns the lock for a collection, registering it on first reference.
    fn collection_handle(&self, name: &str) -> StoreResult<Arc<Mutex<Collection>>> {
        validate_collection_name(name)?;

        if let Some(handle) = self
            .inner
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Ok(Arc::clone(handle));
        }

        let mut registry = self
            .inner
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(registry.entry(name.to_string()).or_default()))
    }

    /// Reads a collection from the adapter unless it is already in memory.
    async fn hydrate(&self, name: &str, collection: &mut Collection) -> StoreResult<Hydration> {
        if collection.hydrated {
            return Ok(Hydration::Cached);
        }

        let raw = self
            .inner
            .adapter
            .get(&self.key(name))
            .await
            .map_err(|e| StoreError::adapter(name, e))?;

        let outcome = match raw {
            None => {
                collection.records = Vec::new();
                Hydration::Missing
            }
            Some(raw) => match serde_json::from_str::<Vec<Record>>(&raw) {
                Ok(records) => {
                    collection.records = dedupe(name, records);
                    self.clear_degraded(name);
                    Hydration::Loaded
                }
                Err(e) => {
                    warn!(
                        collection = %name,
                        error = %e,
                        "Stored collection is malformed, treating as empty"
                    );
                    collection.records = Vec::new();
                    self.mark_degraded(name);
                    Hydration::Degraded
                }
            },
        };

        collection.hydrated = true;
        debug!(collection = %name, count = collection.records.len(), ?outcome, "Hydrated collection");
        Ok(outcome)
    }

    async fn persist(&self, name: &str, records: &[&Record]) -> StoreResult<()> {
        let json = serde_json::to_string(records).map_err(|e| StoreError::serialization(name, e))?;

        self.inner
            .adapter
            .set(&self.key(name), &json)
            .await
            .map_err(|e| StoreError::adapter(name, e))?;

        self.clear_degraded(name);
        Ok(())
    }

    pub(crate) fn is_degraded(&self, name: &str) -> bool {
        self.inner
            .degraded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    fn mark_degraded(&self, name: &str) {
        self.inner
            .degraded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string());
    }

    fn clear_degraded(&self, name: &str) {
        self.inner
            .degraded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
    }
}

/// Current time in the stored timestamp format.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serializes caller input, requiring a JSON object.
fn to_map<D: Serialize + ?Sized>(
    collection: &str,
    data: &D,
    what: &str,
) -> StoreResult<Map<String, Value>> {
    match serde_json::to_value(data).map_err(|e| StoreError::serialization(collection, e))? {
        Value::Object(map) => Ok(map),
        _ => Err(ValidationError::NotAnObject {
            what: what.to_string(),
        }
        .into()),
    }
}

/// Keeps the first record for each id.
fn dedupe(name: &str, records: Vec<Record>) -> Vec<Record> {
    let mut seen = BTreeSet::new();
    let before = records.len();

    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| match record.id() {
            Some(id) => seen.insert(id.to_string()),
            None => true,
        })
        .collect();

    if kept.len() != before {
        warn!(
            collection = %name,
            dropped = before - kept.len(),
            "Stored collection had duplicate ids, keeping first occurrence"
        );
    }
    kept
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{MemoryAdapter, SqliteConfig};
    use chrono::DateTime;
    use innkeep_core::{Room, RoomPatch, RoomStatus};
    use serde_json::json;

    fn memory_store(seed: bool) -> (Arc<MemoryAdapter>, DocumentStore) {
        let adapter = Arc::new(MemoryAdapter::new());
        let store = DocumentStore::new(
            adapter.clone(),
            StoreConfig::default().with_seed_on_empty(seed),
        );
        (adapter, store)
    }

    fn store_over(adapter: MemoryAdapter) -> (Arc<MemoryAdapter>, DocumentStore) {
        let adapter = Arc::new(adapter);
        let store = DocumentStore::new(adapter.clone(), StoreConfig::default());
        (adapter, store)
    }

    fn stored_len(adapter: &MemoryAdapter, collection: &str) -> usize {
        let raw = adapter
            .raw(&format!("innkeep:{}", collection))
            .expect("key should exist");
        serde_json::from_str::<Vec<Value>>(&raw).unwrap().len()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_initialize_is_idempotent_and_seeds_once() {
        let (adapter, store) = memory_store(true);
        assert!(!store.is_initialized().await);

        store.initialize().await.unwrap();
        assert!(store.is_initialized().await);
        let writes = adapter.write_count();
        let users = store.select("users", &SelectOptions::new()).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(stored_len(&adapter, "users"), 1);
        assert_eq!(store.count("rooms").await.unwrap(), 4);

        store.initialize().await.unwrap();
        store.initialize().await.unwrap();
        assert_eq!(adapter.write_count(), writes);
        assert_eq!(store.select("users", &SelectOptions::new()).await.unwrap(), users);
    }

    #[tokio::test]
    async fn test_concurrent_initialize_runs_once() {
        let (_adapter, store) = memory_store(true);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.initialize().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.count("users").await.unwrap(), 1);
        assert_eq!(store.count("menu_items").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_initialize_writes_empty_arrays_for_new_collections() {
        let (adapter, store) = memory_store(false);
        store.initialize().await.unwrap();

        let snapshot = adapter.snapshot();
        for name in KNOWN_COLLECTIONS {
            assert_eq!(
                snapshot.get(&format!("innkeep:{}", name)).map(String::as_str),
                Some("[]")
            );
        }
    }

    #[tokio::test]
    async fn test_seed_skipped_when_anchor_has_records() {
        let (_adapter, store) = store_over(MemoryAdapter::new().with_entry(
            "innkeep:users",
            r#"[{"id":"u1","name":"Owner","role":"admin"}]"#,
        ));
        store.initialize().await.unwrap();

        assert_eq!(store.count("users").await.unwrap(), 1);
        assert_eq!(store.count("rooms").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_initialize_read_failure_leaves_store_uninitialized() {
        let (adapter, store) = memory_store(true);
        adapter.fail_reads(true);

        let err = store.initialize().await.unwrap_err();
        assert!(matches!(err, StoreError::AdapterIo { .. }));
        assert!(!store.is_initialized().await);

        adapter.fail_reads(false);
        store.initialize().await.unwrap();
        assert!(store.is_initialized().await);
        assert_eq!(store.count("users").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_malformed_collection_degrades_until_rewritten() {
        let (adapter, store) =
            store_over(MemoryAdapter::new().with_entry("innkeep:rooms", "{not json"));
        store.initialize().await.unwrap();

        assert_eq!(store.degraded_collections(), vec!["rooms".to_string()]);
        assert!(store.select("rooms", &SelectOptions::new()).await.unwrap().is_empty());
        assert_eq!(adapter.raw("innkeep:rooms").as_deref(), Some("{not json"));
        // the other collections still seeded
        assert_eq!(store.count("users").await.unwrap(), 1);

        store
            .insert("rooms", &json!({ "number": "101", "status": "available" }))
            .await
            .unwrap();
        assert_eq!(stored_len(&adapter, "rooms"), 1);
        assert!(store.degraded_collections().is_empty());
    }

    #[tokio::test]
    async fn test_degraded_anchor_is_not_seeded() {
        let (adapter, store) = store_over(MemoryAdapter::new().with_entry("innkeep:users", "[1, 2]"));
        store.initialize().await.unwrap();

        assert_eq!(store.degraded_collections(), vec!["users".to_string()]);
        assert_eq!(adapter.raw("innkeep:users").as_deref(), Some("[1, 2]"));
        assert_eq!(store.count("rooms").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stored_duplicate_ids_keep_first() {
        let (_adapter, store) = store_over(MemoryAdapter::new().with_entry(
            "innkeep:customers",
            r#"[{"id":"c1","name":"first"},{"id":"c1","name":"second"},{"id":"c2","name":"other"}]"#,
        ));

        let customers = store.select("customers", &SelectOptions::new()).await.unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].get_str("name"), Some("first"));
    }

    #[tokio::test]
    async fn test_clear_all_data_then_reseed() {
        let (adapter, store) = memory_store(true);
        store.initialize().await.unwrap();
        store.insert("audit_log", &json!({ "event": "login" })).await.unwrap();
        let first_boot: Vec<String> = store
            .select("users", &SelectOptions::new())
            .await
            .unwrap()
            .iter()
            .filter_map(|u| u.get_str("name").map(str::to_string))
            .collect();

        store.clear_all_data().await.unwrap();
        assert!(!store.is_initialized().await);
        assert!(adapter.snapshot().is_empty());
        for name in store.collection_names() {
            assert!(store.select(&name, &SelectOptions::new()).await.unwrap().is_empty());
        }

        store.initialize().await.unwrap();
        let reseeded: Vec<String> = store
            .select("users", &SelectOptions::new())
            .await
            .unwrap()
            .iter()
            .filter_map(|u| u.get_str("name").map(str::to_string))
            .collect();
        assert_eq!(reseeded, first_boot);
        assert_eq!(store.count("audit_log").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_collection_names_include_referenced() {
        let (_adapter, store) = memory_store(false);
        store.count("audit_log").await.unwrap();

        let names = store.collection_names();
        assert!(names.contains(&"audit_log".to_string()));
        assert!(names.contains(&"rooms".to_string()));
        assert!(matches!(
            store.count("Audit Log").await,
            Err(StoreError::Validation(_))
        ));
    }

    // -------------------------------------------------------------------------
    // Insert
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let (_adapter, store) = memory_store(false);
        let record = store
            .insert(
                "rooms",
                &json!({ "number": "101", "created_at": "1999-01-01T00:00:00.000Z" }),
            )
            .await
            .unwrap();

        let id = record.id().unwrap();
        assert!(Uuid::parse_str(id).is_ok());

        let created = record.get_str(CREATED_AT_FIELD).unwrap();
        assert_ne!(created, "1999-01-01T00:00:00.000Z");
        assert!(DateTime::parse_from_rfc3339(created).is_ok());
        assert_eq!(record.get_str(UPDATED_AT_FIELD), Some(created));
    }

    #[tokio::test]
    async fn test_read_after_write() {
        let (_adapter, store) = memory_store(false);
        let inserted = store
            .insert("orders", &json!({ "status": "pending", "total": 500 }))
            .await
            .unwrap();

        let found = store
            .select(
                "orders",
                &SelectOptions::new().filter("id", inserted.id().unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(found, vec![inserted.clone()]);

        // callers get copies
        let mut copy = store.get("orders", inserted.id().unwrap()).await.unwrap().unwrap();
        copy.insert("status", "cancelled");
        let again = store.get("orders", inserted.id().unwrap()).await.unwrap().unwrap();
        assert_eq!(again.get_str("status"), Some("pending"));
    }

    #[tokio::test]
    async fn test_supplied_id_is_kept_and_duplicates_rejected() {
        let (adapter, store) = memory_store(false);
        store
            .insert("rooms", &json!({ "id": "room-101", "number": "101" }))
            .await
            .unwrap();

        let err = store
            .insert("rooms", &json!({ "id": "room-101", "number": "999" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { ref id, .. } if id == "room-101"));
        assert_eq!(store.count("rooms").await.unwrap(), 1);
        assert_eq!(stored_len(&adapter, "rooms"), 1);

        let err = store.insert("rooms", &json!({ "id": 42 })).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_insert_rejects_non_objects() {
        let (_adapter, store) = memory_store(false);
        let err = store.insert("rooms", &json!(["not", "a", "record"])).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::NotAnObject { .. })
        ));
    }

    #[tokio::test]
    async fn test_ids_stay_unique() {
        let (_adapter, store) = memory_store(false);
        for n in 0..20 {
            store.insert("customers", &json!({ "name": format!("guest {}", n) })).await.unwrap();
        }

        let records = store.select("customers", &SelectOptions::new()).await.unwrap();
        let ids: BTreeSet<&str> = records.iter().filter_map(Record::id).collect();
        assert_eq!(ids.len(), 20);
    }

    // -------------------------------------------------------------------------
    // Update / Delete
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_changes_only_patched_fields() {
        let (_adapter, store) = memory_store(false);
        let before = store
            .insert(
                "rooms",
                &json!({ "number": "101", "status": "available", "amenities": ["tv", "wifi"] }),
            )
            .await
            .unwrap();
        let id = before.id().unwrap().to_string();

        let after = store
            .update("rooms", &id, &json!({ "status": "occupied" }))
            .await
            .unwrap();

        assert_eq!(after.get_str("status"), Some("occupied"));
        for field in ["id", "number", "amenities", "created_at"] {
            assert_eq!(after.get(field), before.get(field), "{} changed", field);
        }
        assert!(after.get_str(UPDATED_AT_FIELD) >= before.get_str(UPDATED_AT_FIELD));
        assert_eq!(after.len(), before.len());
        assert_eq!(store.get("rooms", &id).await.unwrap(), Some(after));
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let (adapter, store) = memory_store(false);
        store.insert("rooms", &json!({ "number": "101" })).await.unwrap();
        let writes = adapter.write_count();

        let err = store
            .update("rooms", "nope", &json!({ "status": "occupied" }))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.collection(), Some("rooms"));
        assert_eq!(adapter.write_count(), writes);
    }

    #[tokio::test]
    async fn test_update_cannot_change_identity() {
        let (_adapter, store) = memory_store(false);
        let record = store.insert("rooms", &json!({ "number": "101" })).await.unwrap();
        let id = record.id().unwrap();

        let err = store.update("rooms", id, &json!({ "id": "other" })).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::ImmutableField { .. })
        ));

        // sending the record back unchanged is fine
        store.update("rooms", id, &record).await.unwrap();
        assert!(store.update("rooms", id, &json!("status")).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_always_writes() {
        let (adapter, store) = memory_store(false);
        let record = store.insert("bookings", &json!({ "guest_name": "A" })).await.unwrap();
        let id = record.id().unwrap();

        let writes = adapter.write_count();
        assert!(store.delete("bookings", id).await.unwrap());
        assert!(!store.delete("bookings", id).await.unwrap());
        assert_eq!(adapter.write_count(), writes + 2);
        assert_eq!(store.count("bookings").await.unwrap(), 0);
        assert_eq!(stored_len(&adapter, "bookings"), 0);
    }

    #[tokio::test]
    async fn test_mutations_fail_closed() {
        let (adapter, store) = memory_store(false);
        let record = store
            .insert("inventory", &json!({ "name": "Milk", "current_stock": 4 }))
            .await
            .unwrap();
        let id = record.id().unwrap();
        let persisted = adapter.raw("innkeep:inventory");

        adapter.fail_writes(true);

        let err = store.insert("inventory", &json!({ "name": "Eggs" })).await.unwrap_err();
        assert!(matches!(err, StoreError::AdapterIo { ref collection, .. } if collection == "inventory"));
        assert!(store
            .update("inventory", id, &json!({ "current_stock": 0 }))
            .await
            .is_err());
        assert!(store.delete("inventory", id).await.is_err());

        assert_eq!(
            store.select("inventory", &SelectOptions::new()).await.unwrap(),
            vec![record]
        );
        assert_eq!(adapter.raw("innkeep:inventory"), persisted);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_select_filter_order_limit() {
        let (_adapter, store) = memory_store(false);
        for (number, floor, status) in [
            ("101", 1, "available"),
            ("102", 1, "occupied"),
            ("201", 2, "available"),
            ("103", 1, "available"),
        ] {
            store
                .insert("rooms", &json!({ "number": number, "floor": floor, "status": status }))
                .await
                .unwrap();
        }

        let options = SelectOptions::new()
            .filter("floor", 1)
            .filter("status", "available")
            .order_by_desc("number")
            .limit(1);
        let result = store.select("rooms", &options).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get_str("number"), Some("103"));

        let unknown = store.select("no_such_thing", &SelectOptions::new()).await.unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let (_adapter, store) = memory_store(false);
        for name in ["a", "b", "c", "d"] {
            store
                .insert("menu_items", &json!({ "name": name, "price": 100 }))
                .await
                .unwrap();
        }

        let names = |records: Vec<Record>| -> Vec<String> {
            records
                .iter()
                .filter_map(|r| r.get_str("name").map(str::to_string))
                .collect()
        };

        let asc = store
            .select("menu_items", &SelectOptions::new().order_by("price"))
            .await
            .unwrap();
        assert_eq!(names(asc), vec!["a", "b", "c", "d"]);

        let desc = store
            .select("menu_items", &SelectOptions::new().order_by_desc("price").limit(2))
            .await
            .unwrap();
        assert_eq!(names(desc), vec!["a", "b"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_are_not_lost() {
        let (adapter, store) = memory_store(false);

        let handles: Vec<_> = (0..32)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.insert("orders", &json!({ "table_number": n })).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.count("orders").await.unwrap(), 32);
        assert_eq!(stored_len(&adapter, "orders"), 32);
    }

    // -------------------------------------------------------------------------
    // Reporting
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_dashboard_room_scenario() {
        let (_adapter, store) = memory_store(false);
        store.initialize().await.unwrap();
        for status in ["available", "occupied", "occupied"] {
            store.insert("rooms", &json!({ "status": status })).await.unwrap();
        }

        let stats = store.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_rooms, 3);
        assert_eq!(stats.occupied_rooms, 2);
        assert_eq!(stats.available_rooms, 1);
    }

    #[tokio::test]
    async fn test_dashboard_on_a_given_day() {
        let (_adapter, store) = memory_store(false);
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        store
            .insert(
                "bookings",
                &json!({ "check_in_date": "2026-10-19", "check_out_date": "2026-10-20" }),
            )
            .await
            .unwrap();
        store.insert("orders", &json!({ "status": "preparing" })).await.unwrap();
        store.insert("orders", &json!({ "status": "completed" })).await.unwrap();
        store
            .insert("inventory", &json!({ "current_stock": 1, "min_stock": 3 }))
            .await
            .unwrap();
        store
            .insert(
                "transactions",
                &json!({ "type": "income", "amount": 7500, "date": "2026-10-19" }),
            )
            .await
            .unwrap();
        store
            .insert(
                "transactions",
                &json!({ "type": "income", "amount": 2500, "date": "2026-10-03" }),
            )
            .await
            .unwrap();

        let stats = store.dashboard_stats_on(today).await.unwrap();
        assert_eq!(stats.today_check_ins, 1);
        assert_eq!(stats.today_check_outs, 0);
        assert_eq!(stats.active_orders, 1);
        assert_eq!(stats.low_stock_items, 1);
        assert_eq!(stats.today_revenue, 7500.0);
        assert_eq!(stats.monthly_revenue, 10000.0);
    }

    // -------------------------------------------------------------------------
    // SQLite end to end
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_typed_round_trip_over_sqlite() {
        let adapter = SqliteAdapter::connect(SqliteConfig::in_memory()).await.unwrap();
        let store = DocumentStore::new(Arc::new(adapter), StoreConfig::default());
        store.initialize().await.unwrap();
        assert_eq!(store.adapter_name(), "sqlite");

        let rooms: Vec<Room> = store
            .select_as("rooms", &SelectOptions::new().order_by("number"))
            .await
            .unwrap();
        assert_eq!(rooms.len(), 4);
        assert_eq!(rooms[0].number, "101");

        let updated: Room = store
            .update_as("rooms", &rooms[0].id, &RoomPatch::status(RoomStatus::Cleaning))
            .await
            .unwrap();
        assert_eq!(updated.status, RoomStatus::Cleaning);

        let inserted: Room = store
            .insert_as(
                "rooms",
                &json!({ "number": "301", "room_type": "suite", "rate": 9000, "status": "reserved" }),
            )
            .await
            .unwrap();
        assert_eq!(inserted.floor, None);
        assert_eq!(store.count("rooms").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_sqlite_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::default().with_database_path(dir.path().join("innkeep.db"));

        let store = DocumentStore::open(&config).await.unwrap();
        store.initialize().await.unwrap();
        let guest = store
            .insert("customers", &json!({ "name": "Returning Guest" }))
            .await
            .unwrap();

        let reopened = DocumentStore::open(&config).await.unwrap();
        reopened.initialize().await.unwrap();
        assert_eq!(
            reopened.get("customers", guest.id().unwrap()).await.unwrap(),
            Some(guest)
        );
        assert_eq!(reopened.count("users").await.unwrap(), 1);
    }
}
