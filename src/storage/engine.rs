//! Thread-Safe Storage Engine
//!
//! This module implements the core storage engine for LineKV: a single
//! `HashMap` from key to value behind one `RwLock`.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                StorageEngine                │
//! │  ┌───────────────────────────────────────┐  │
//! │  │ RwLock<HashMap<Bytes, Bytes>>         │  │
//! │  │   GET        -> shared (read) guard   │  │
//! │  │   SET/DELETE -> exclusive guard       │  │
//! │  └───────────────────────────────────────┘  │
//! │  AtomicU64 counters (outside the lock)      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Any number of `get` calls run concurrently. `set` and `delete` hold the
//! write guard for the duration of the map mutation only, so every write is
//! globally serialized and visible to all readers as soon as it returns.
//! The engine never takes another lock while holding its own, and callers
//! never hold a guard across socket I/O because guards never leave this module.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Snapshot of storage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of keys currently stored
    pub keys: u64,
    /// Total GET operations
    pub get_ops: u64,
    /// Total SET operations
    pub set_ops: u64,
    /// Total DELETE operations
    pub del_ops: u64,
}

/// The main storage engine for LineKV.
///
/// This struct is designed to be wrapped in an `Arc` and shared across
/// all client handler tasks. All operations are thread-safe.
///
/// `get` distinguishes a missing key (`None`) from a key whose value is the
/// empty string (`Some` of an empty `Bytes`).
///
/// # Example
///
/// ```
/// use linekv::storage::StorageEngine;
/// use bytes::Bytes;
///
/// let engine = StorageEngine::new();
///
/// engine.set(Bytes::from("name"), Bytes::from("Ariz"));
/// assert_eq!(engine.get(b"name"), Some(Bytes::from("Ariz")));
///
/// assert!(engine.delete(b"name"));
/// assert_eq!(engine.get(b"name"), None);
/// ```
pub struct StorageEngine {
    /// The key-value map, guarded by a single shared/exclusive lock
    data: RwLock<HashMap<Bytes, Bytes>>,

    /// Statistics: total GET operations
    get_count: AtomicU64,

    /// Statistics: total SET operations
    set_count: AtomicU64,

    /// Statistics: total DELETE operations
    del_count: AtomicU64,
}

impl std::fmt::Debug for StorageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageEngine")
            .field("keys", &self.len())
            .field("get_count", &self.get_count.load(Ordering::Relaxed))
            .field("set_count", &self.set_count.load(Ordering::Relaxed))
            .field("del_count", &self.del_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for StorageEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageEngine {
    /// Creates a new, empty storage engine.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            get_count: AtomicU64::new(0),
            set_count: AtomicU64::new(0),
            del_count: AtomicU64::new(0),
        }
    }

    /// Takes the shared guard.
    ///
    /// A writer can only poison the lock by panicking inside `HashMap::insert`
    /// or `remove`, which leaves the map intact, so poisoning is ignored.
    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, HashMap<Bytes, Bytes>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the exclusive guard.
    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Bytes, Bytes>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets a key-value pair.
    ///
    /// If the key already exists, its value is overwritten.
    ///
    /// # Returns
    ///
    /// Returns `true` if a new key was created, `false` if an existing key was updated.
    pub fn set(&self, key: Bytes, value: Bytes) -> bool {
        self.set_count.fetch_add(1, Ordering::Relaxed);

        self.write().insert(key, value).is_none()
    }

    /// Gets the value for a key.
    ///
    /// Returns `None` if the key doesn't exist. Only the shared guard is taken,
    /// and the returned `Bytes` is a reference-counted handle to the stored value.
    pub fn get(&self, key: &[u8]) -> Option<Bytes> {
        self.get_count.fetch_add(1, Ordering::Relaxed);

        self.read().get(key).cloned()
    }

    /// Deletes a key from the database.
    ///
    /// # Returns
    ///
    /// Returns `true` if the key was deleted, `false` if it didn't exist.
    pub fn delete(&self, key: &[u8]) -> bool {
        self.del_count.fetch_add(1, Ordering::Relaxed);

        self.write().remove(key).is_some()
    }

    /// Checks if a key exists.
    pub fn exists(&self, key: &[u8]) -> bool {
        self.read().contains_key(key)
    }

    /// Returns the number of keys in the database.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if the database is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns database statistics.
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            keys: self.len() as u64,
            get_ops: self.get_count.load(Ordering::Relaxed),
            set_ops: self.set_count.load(Ordering::Relaxed),
            del_ops: self.del_count.load(Ordering::Relaxed),
        }
    }
}
