//! In-process adapter backed by a `HashMap`.
//!
//! Nothing survives the process. Besides ephemeral sessions this is the
//! adapter the store tests run against: it can be preloaded with raw payloads
//! and told to fail reads or writes on demand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::KvAdapter;
use crate::error::{AdapterError, AdapterResult};

#[derive(Debug, Default)]
pub struct MemoryAdapter {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preloads a raw value, as if a previous session had written it.
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.into(), value.into());
        }
        self
    }

    /// Makes every subsequent `get` fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set` and `remove` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `set` and `remove` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of everything currently stored.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Raw value under a key, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn check_writable(&self) -> AdapterResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AdapterError::Unavailable("writes are disabled".to_string()));
        }
        Ok(())
    }

    fn lock(&self) -> AdapterResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AdapterError::Unavailable("memory adapter lock poisoned".to_string()))
    }
}

#[async_trait]
impl KvAdapter for MemoryAdapter {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> AdapterResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AdapterError::Unavailable("reads are disabled".to_string()));
        }
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AdapterResult<()> {
        self.check_writable()?;
        self.lock()?.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> AdapterResult<()> {
        self.check_writable()?;
        self.lock()?.remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
