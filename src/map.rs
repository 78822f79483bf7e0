use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A thread-safe map guarded by a single reader/writer lock
///
/// `ConcurrentMap` owns an ordinary `HashMap` and only ever touches it while
/// holding the lock: shared for lookups and key snapshots, exclusive for
/// mutation. Cloning a `ConcurrentMap` gives another handle onto the same
/// entries, so it can be handed to worker threads directly or behind an `Arc`.
///
/// # Examples
///
/// ```
/// use sovran_tsmap::ConcurrentMap;
///
/// let map = ConcurrentMap::<String, i32>::new();
/// map.put("a".to_string(), 1);
///
/// assert_eq!(map.get(&"a".to_string()), Some(1));
/// assert!(!map.put_unique("a".to_string(), 2));
/// assert_eq!(map.get(&"a".to_string()), Some(1));
/// ```
pub struct ConcurrentMap<K, V> {
    items: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates a new, empty ConcurrentMap
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates an empty map with room for at least `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::with_capacity(capacity))),
        }
    }

    /// Retrieves a clone of the value stored under `key`
    ///
    /// Returns `None` when the key is absent. Any number of `get` calls may run
    /// at once; they only wait on writers.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.items.read().get(key).cloned()
    }

    /// Inserts `value` under `key`, replacing whatever was there
    ///
    /// This is the only operation that overwrites an existing entry. Returns
    /// the value it replaced, if any.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.items.write().insert(key, value)
    }

    /// Inserts `value` under `key` only if the key is absent
    ///
    /// The presence check and the insertion happen under one write lock, so
    /// when many threads race on the same key exactly one of them gets `true`.
    /// On `false` the map is unchanged and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_tsmap::ConcurrentMap;
    ///
    /// let seen = ConcurrentMap::<u64, ()>::new();
    /// assert!(seen.put_unique(7, ()));
    /// assert!(!seen.put_unique(7, ()));
    /// ```
    pub fn put_unique(&self, key: K, value: V) -> bool {
        self.put_unique_with(key, || value)
    }

    /// Like [`put_unique`](Self::put_unique), but only builds the value when
    /// the key is absent
    ///
    /// `init` runs while the write lock is held. It must not call back into
    /// this map.
    pub fn put_unique_with<F>(&self, key: K, init: F) -> bool
    where
        F: FnOnce() -> V,
    {
        let mut store = self.items.write();
        if store.contains_key(&key) {
            return false;
        }
        store.insert(key, init());
        true
    }

    /// Removes the entry for `key`
    ///
    /// Deleting an absent key is a no-op. Returns `true` if an entry was
    /// removed.
    pub fn delete(&self, key: &K) -> bool {
        self.items.write().remove(key).is_some()
    }

    /// Returns a snapshot of every key currently in the map
    ///
    /// The keys are copied out while the read lock is held and the lock is
    /// released before returning, so later mutations don't show up in the
    /// snapshot and iterating it holds no lock. Order is unspecified.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.items.read().keys().cloned().collect()
    }

    /// Returns true if the map contains the specified key
    pub fn contains_key(&self, key: &K) -> bool {
        self.items.read().contains_key(key)
    }

    /// Returns the number of entries in the map
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns true if the map contains no entries
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Runs `f` against the value stored under `key` without cloning it
    ///
    /// `f` runs under the read lock, so keep it short and don't call back into
    /// this map from it. Returns `None` when the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_tsmap::ConcurrentMap;
    ///
    /// let map = ConcurrentMap::<&str, Vec<i32>>::new();
    /// map.put("numbers", vec![1, 2, 3]);
    ///
    /// assert_eq!(map.with(&"numbers", |v| v.len()), Some(3));
    /// assert_eq!(map.with(&"missing", |v| v.len()), None);
    /// ```
    pub fn with<F, R>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        let store = self.items.read();
        store.get(key).map(f)
    }
}

impl<K, V> Clone for ConcurrentMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<K, V> Default for ConcurrentMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

// Contents are never formatted; only the size is reported.
impl<K, V> fmt::Debug for ConcurrentMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ConcurrentMap")
            .field("len", &self.items.read().len())
            .finish()
    }
}
