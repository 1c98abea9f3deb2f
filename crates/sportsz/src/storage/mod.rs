//! Storage layer for sportsz.
//!
//! Every collection is stored whole under a string key. [`Store`] wraps an
//! injected [`Backend`] and adds the guarantees the rest of the crate relies
//! on:
//! - reads never fail: absent, corrupt, or unreadable values fall back to the
//!   caller's default (and are logged)
//! - writes replace the entire value in one single-key write
//! - [`Store::update`] owns the read-modify-write cycle under a lock
//! - listeners are notified after every successful write

pub mod memory;
pub mod repository;
pub mod schema;
pub mod sqlite;

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

pub use memory::MemoryBackend;
pub use repository::{Identified, Record, Repository};
pub use sqlite::SqliteBackend;

/// Raw key-value storage for serialized collections.
///
/// Implementations must make a single `write` atomic for its key.
pub trait Backend: fmt::Debug + Send {
    /// Read the raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Returns `true` if something was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn remove(&mut self, key: &str) -> Result<bool>;

    /// All keys currently present.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn keys(&self) -> Result<Vec<String>>;

    /// Human-readable location, for status output.
    fn location(&self) -> String;
}

/// The named collections the application persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    /// Registered athletes.
    Users,
    /// Timed activity records.
    History,
    /// Uploaded videos.
    Videos,
    /// Community talent posts.
    Community,
    /// The dream goal singleton.
    Dream,
    /// Motivational quotes.
    Quotes,
}

impl CollectionKey {
    /// Every collection, in display order.
    pub const ALL: [Self; 6] = [
        Self::Users,
        Self::History,
        Self::Videos,
        Self::Community,
        Self::Dream,
        Self::Quotes,
    ];

    /// The storage key for this collection.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "sportsz_users",
            Self::History => "sportsz_history",
            Self::Videos => "sportsz_videos",
            Self::Community => "sportsz_community",
            Self::Dream => "sportsz_dream",
            Self::Quotes => "sportsz_quotes",
        }
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives a callback after a collection has been written.
///
/// This is the hook views use to refresh themselves.
pub trait ChangeListener: Send + Sync {
    /// Called with the storage key that changed.
    fn collection_changed(&self, key: &str);
}

impl<F> ChangeListener for F
where
    F: Fn(&str) + Send + Sync,
{
    fn collection_changed(&self, key: &str) {
        self(key);
    }
}

/// Collection store over an injected backend.
pub struct Store {
    backend: Mutex<Box<dyn Backend>>,
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.backend)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Store {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Mutex::new(Box::new(backend)),
            listeners: Vec::new(),
        }
    }

    /// A store over a fresh [`MemoryBackend`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Register a listener for collection writes.
    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Read the collection under `key`, or `default` if it is absent or unreadable.
    ///
    /// Never fails. Faults are logged and the default is returned; the stored
    /// value is left untouched.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.lock() {
            Ok(backend) => read_or_none(&**backend, key).unwrap_or(default),
            Err(e) => {
                warn!(key, error = %e, "store unavailable, using default");
                default
            }
        }
    }

    /// Replace the collection under `key` with `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        {
            let mut backend = self.lock()?;
            backend.write(key, &encoded)?;
        }
        debug!(key, bytes = encoded.len(), "collection written");
        self.notify(key);
        Ok(())
    }

    /// Run a read-modify-write cycle on `key` while holding the store lock.
    ///
    /// The current value (or `default()` if absent or unreadable) is passed to
    /// `f`. If `f` returns an error nothing is written.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a serialization/backend error.
    pub fn update<T, R, F>(&self, key: &str, default: impl FnOnce() -> T, f: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> Result<R>,
    {
        let result = {
            let mut backend = self.lock()?;
            let mut value = read_or_none(&**backend, key).unwrap_or_else(default);
            let result = f(&mut value)?;
            let encoded = serde_json::to_string(&value)?;
            backend.write(key, &encoded)?;
            debug!(key, bytes = encoded.len(), "collection updated");
            result
        };
        self.notify(key);
        Ok(result)
    }

    /// Delete the whole collection under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let removed = self.lock()?.remove(key)?;
        if removed {
            debug!(key, "collection removed");
            self.notify(key);
        }
        Ok(removed)
    }

    /// Check whether anything is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.read(key)?.is_some())
    }

    /// Summary of what is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn stats(&self) -> Result<StorageStats> {
        let backend = self.lock()?;
        let keys = backend.keys()?;
        let mut total_bytes = 0;
        for key in &keys {
            total_bytes += backend.read(key)?.map_or(0, |v| v.len());
        }
        Ok(StorageStats {
            location: backend.location(),
            collections: keys.len(),
            total_bytes,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Box<dyn Backend>>> {
        self.backend
            .lock()
            .map_err(|_| Error::internal("storage lock poisoned"))
    }

    fn notify(&self, key: &str) {
        trace!(key, listeners = self.listeners.len(), "notifying listeners");
        for listener in &self.listeners {
            listener.collection_changed(key);
        }
    }
}

/// Read and decode `key`, logging and returning `None` on any fault.
fn read_or_none<T: DeserializeOwned>(backend: &dyn Backend, key: &str) -> Option<T> {
    let raw = match backend.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "failed to read collection, using default");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "malformed collection data, using default");
            None
        }
    }
}

/// Statistics about the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Where the data lives.
    pub location: String,
    /// Number of keys present.
    pub collections: usize,
    /// Total size of all serialized values.
    pub total_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::logging::init_test_logging;

    /// Backend whose reads always fail.
    #[derive(Debug)]
    struct BrokenBackend;

    impl Backend for BrokenBackend {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::internal("disk on fire"))
        }
        fn write(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::internal("disk on fire"))
        }
        fn remove(&mut self, _key: &str) -> Result<bool> {
            Err(Error::internal("disk on fire"))
        }
        fn keys(&self) -> Result<Vec<String>> {
            Err(Error::internal("disk on fire"))
        }
        fn location(&self) -> String {
            "broken".to_string()
        }
    }

    #[test]
    fn test_collection_keys() {
        assert_eq!(CollectionKey::Users.as_str(), "sportsz_users");
        assert_eq!(CollectionKey::History.as_str(), "sportsz_history");
        assert_eq!(CollectionKey::Videos.as_str(), "sportsz_videos");
        assert_eq!(CollectionKey::Community.as_str(), "sportsz_community");
        assert_eq!(CollectionKey::Dream.as_str(), "sportsz_dream");
        assert_eq!(CollectionKey::Quotes.to_string(), "sportsz_quotes");
    }

    #[test]
    fn test_get_never_written_returns_default() {
        let store = Store::in_memory();
        let value: Vec<String> = store.get("missing", vec!["fallback".to_string()]);
        assert_eq!(value, vec!["fallback".to_string()]);
    }

    #[test]
    fn test_round_trip_list() {
        let store = Store::in_memory();
        let value = vec![1.5_f64, 2.0, 3.25];
        store.set("numbers", &value).unwrap();

        let read: Vec<f64> = store.get("numbers", Vec::new());
        assert_eq!(read, value);
    }

    #[test]
    fn test_round_trip_object() {
        let store = Store::in_memory();
        let mut value = HashMap::new();
        value.insert("goal".to_string(), serde_json::json!("Win state finals"));
        value.insert("progress".to_string(), serde_json::json!(40));
        store.set("dream", &value).unwrap();

        let read: HashMap<String, serde_json::Value> = store.get("dream", HashMap::new());
        assert_eq!(read, value);
    }

    #[test]
    fn test_malformed_value_returns_default() {
        init_test_logging();
        let store = Store::new(MemoryBackend::with_entries([("sportsz_users", "{not json")]));
        let users: Vec<String> = store.get("sportsz_users", Vec::new());
        assert!(users.is_empty());
    }

    #[test]
    fn test_wrong_shape_returns_default() {
        let store = Store::new(MemoryBackend::with_entries([("sportsz_history", r#"{"a":1}"#)]));
        let history: Vec<f64> = store.get("sportsz_history", vec![7.0]);
        assert_eq!(history, vec![7.0]);
    }

    #[test]
    fn test_corrupt_value_is_not_repaired_by_get() {
        let store = Store::new(MemoryBackend::with_entries([("k", "garbage")]));
        let _: Vec<u8> = store.get("k", Vec::new());
        assert!(store.contains("k").unwrap());
    }

    #[test]
    fn test_backend_failure_returns_default() {
        init_test_logging();
        let store = Store::new(BrokenBackend);
        let value: Vec<u8> = store.get("anything", vec![1, 2, 3]);
        assert_eq!(value, vec![1, 2, 3]);
        assert!(store.set("anything", &value).is_err());
    }

    #[test]
    fn test_set_overwrites() {
        let store = Store::in_memory();
        store.set("k", &vec![1]).unwrap();
        store.set("k", &vec![2, 3]).unwrap();
        assert_eq!(store.get::<Vec<i32>>("k", Vec::new()), vec![2, 3]);
    }

    #[test]
    fn test_update_appends() {
        let store = Store::in_memory();
        for i in 0..3 {
            store
                .update("k", Vec::new, |items: &mut Vec<i32>| {
                    items.push(i);
                    Ok(())
                })
                .unwrap();
        }
        assert_eq!(store.get::<Vec<i32>>("k", Vec::new()), vec![0, 1, 2]);
    }

    #[test]
    fn test_update_error_writes_nothing() {
        let store = Store::in_memory();
        store.set("k", &vec![1]).unwrap();

        let result = store.update("k", Vec::new, |items: &mut Vec<i32>| -> Result<()> {
            items.push(2);
            Err(Error::validation("nope"))
        });

        assert!(result.unwrap_err().is_validation());
        assert_eq!(store.get::<Vec<i32>>("k", Vec::new()), vec![1]);
    }

    #[test]
    fn test_update_replaces_corrupt_value() {
        let store = Store::new(MemoryBackend::with_entries([("k", "][")]));
        store
            .update("k", Vec::new, |items: &mut Vec<i32>| {
                items.push(9);
                Ok(())
            })
            .unwrap();
        assert_eq!(store.get::<Vec<i32>>("k", Vec::new()), vec![9]);
    }

    #[test]
    fn test_listeners_notified_on_write() {
        let mut store = Store::in_memory();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        store.subscribe(move |key: &str| {
            assert_eq!(key, "k");
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.set("k", &1).unwrap();
        store
            .update("k", || 0, |v: &mut i32| {
                *v += 1;
                Ok(())
            })
            .unwrap();
        let _ = store.update("k", || 0, |_: &mut i32| -> Result<()> {
            Err(Error::validation("no"))
        });
        store.remove("k").unwrap();
        store.remove("k").unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_contains_and_remove() {
        let store = Store::in_memory();
        assert!(!store.contains("k").unwrap());
        store.set("k", "v").unwrap();
        assert!(store.contains("k").unwrap());
        assert!(store.remove("k").unwrap());
        assert!(!store.contains("k").unwrap());
    }

    #[test]
    fn test_stats() {
        let store = Store::in_memory();
        store.set("a", &vec![1, 2]).unwrap();
        store.set("b", "x").unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.location, ":memory:");
        assert_eq!(stats.collections, 2);
        assert_eq!(stats.total_bytes, "[1,2]".len() + "\"x\"".len());
    }

    #[test]
    fn test_sqlite_backed_store_round_trip() {
        let store = Store::new(SqliteBackend::open_in_memory().unwrap());
        store.set("k", &vec!["a", "b"]).unwrap();
        assert_eq!(
            store.get::<Vec<String>>("k", Vec::new()),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_store_debug() {
        let store = Store::in_memory();
        let debug_str = format!("{store:?}");
        assert!(debug_str.contains("Store"));
        assert!(debug_str.contains("listeners"));
    }
}
