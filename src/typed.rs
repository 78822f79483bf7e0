use crate::any_key::{AnyKey, MapKey};
use crate::any_value::{AnyValue, MapValue};
use crate::descriptor::{TypeContract, TypeDescriptor};
use crate::error::{MapError, Result, Slot};
use crate::map::ConcurrentMap;
use std::any::{Any, TypeId};
use std::fmt;

/// A thread-safe map that checks key and value types at runtime
///
/// `TypedMap` stores type-erased keys and values in a [`ConcurrentMap`] and
/// holds a [`TypeContract`] fixed at construction. Every operation that takes
/// a key or value checks it against the contract before the lock is taken; a
/// mismatch fails with [`MapError::TypeMismatch`] and never reaches the store.
///
/// A map built with [`TypedMap::new`] has no contract and accepts any key and
/// value type. Keys of different concrete types are then distinct entries,
/// even when they compare equal after conversion.
///
/// # Examples
///
/// ```
/// use sovran_tsmap::{MapError, TypedMap};
///
/// let map = TypedMap::of::<i64, String>();
/// map.put(1i64, "one".to_string())?;
///
/// assert_eq!(map.get::<i64, String>(&1)?, Some("one".to_string()));
///
/// // Wrong key type: rejected, map unchanged
/// assert!(map.put("one", "uno".to_string()).is_err());
/// assert_eq!(map.len(), 1);
/// # Ok::<(), MapError>(())
/// ```
#[derive(Clone)]
pub struct TypedMap {
    contract: TypeContract,
    inner: ConcurrentMap<AnyKey, AnyValue>,
}

impl TypedMap {
    /// Creates a new, empty map that accepts any key and value type
    pub fn new() -> Self {
        Self::with_contract(TypeContract::unconstrained())
    }

    /// Creates a new, empty map enforcing the given key and value types
    ///
    /// `None` leaves that slot unconstrained.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_tsmap::{TypeDescriptor, TypedMap};
    ///
    /// // String keys, any value
    /// let map = TypedMap::with_types(Some(TypeDescriptor::of::<String>()), None);
    /// assert!(map.put("a".to_string(), 1u8).is_ok());
    /// assert!(map.put("b".to_string(), vec![1.5f32]).is_ok());
    /// assert!(map.put(7u8, 1u8).is_err());
    /// ```
    pub fn with_types(key: Option<TypeDescriptor>, value: Option<TypeDescriptor>) -> Self {
        Self::with_contract(TypeContract { key, value })
    }

    /// Creates a new, empty map that only accepts keys of type `K` and values
    /// of type `V`
    pub fn of<K: MapKey, V: MapValue>() -> Self {
        Self::with_contract(TypeContract::of::<K, V>())
    }

    /// Creates a new, empty map enforcing `contract`
    pub fn with_contract(contract: TypeContract) -> Self {
        tracing::trace!(
            key = ?contract.key,
            value = ?contract.value,
            "created typed map"
        );
        Self {
            contract,
            inner: ConcurrentMap::new(),
        }
    }

    /// The contract this map enforces
    pub fn contract(&self) -> TypeContract {
        self.contract
    }

    /// The required key type, if any
    pub fn key_type(&self) -> Option<TypeDescriptor> {
        self.contract.key
    }

    /// The required value type, if any
    pub fn value_type(&self) -> Option<TypeDescriptor> {
        self.contract.value
    }

    /// Retrieves a clone of the value stored under `key`
    ///
    /// Returns `Ok(None)` when the key is absent. `key` may itself be an
    /// [`AnyKey`], and `V` may be [`AnyValue`] to get the erased value back.
    ///
    /// # Errors
    ///
    /// Returns `MapError::TypeMismatch` if `K` is not the map's key type, if
    /// `V` is not the map's value type, or if the stored value is not a `V`.
    pub fn get<K: MapKey, V: MapValue>(&self, key: &K) -> Result<Option<V>> {
        let key = AnyKey::new(key.clone());
        self.check_requested_value::<V>()?;
        self.get_any(&key)?.map(downcast_value::<V>).transpose()
    }

    /// Retrieves a clone of the erased value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `MapError::TypeMismatch` if `key` is not of the map's key type.
    pub fn get_any(&self, key: &AnyKey) -> Result<Option<AnyValue>> {
        self.contract.check_key(key.descriptor())?;
        Ok(self.inner.get(key))
    }

    /// Inserts `value` under `key`, replacing whatever was there
    ///
    /// # Errors
    ///
    /// Returns `MapError::TypeMismatch` if either the key or the value
    /// violates the map's contract. Nothing is written in that case.
    pub fn put<K: MapKey, V: MapValue>(&self, key: K, value: V) -> Result<()> {
        self.put_any(AnyKey::new(key), AnyValue::new(value))
    }

    /// Erased form of [`put`](Self::put)
    pub fn put_any(&self, key: AnyKey, value: AnyValue) -> Result<()> {
        self.check_entry(&key, &value)?;
        self.inner.put(key, value);
        Ok(())
    }

    /// Inserts `value` under `key` only if the key is absent
    ///
    /// Returns `Ok(true)` if the entry was inserted and `Ok(false)` if the key
    /// was already present, in which case the stored value is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `MapError::TypeMismatch` if either the key or the value
    /// violates the map's contract.
    pub fn put_unique<K: MapKey, V: MapValue>(&self, key: K, value: V) -> Result<bool> {
        self.put_unique_any(AnyKey::new(key), AnyValue::new(value))
    }

    /// Erased form of [`put_unique`](Self::put_unique)
    pub fn put_unique_any(&self, key: AnyKey, value: AnyValue) -> Result<bool> {
        self.check_entry(&key, &value)?;
        Ok(self.inner.put_unique(key, value))
    }

    /// Removes the entry for `key`
    ///
    /// Returns `Ok(true)` if an entry was removed and `Ok(false)` if the key
    /// was absent.
    ///
    /// # Errors
    ///
    /// Returns `MapError::TypeMismatch` if `K` is not the map's key type.
    pub fn delete<K: MapKey>(&self, key: &K) -> Result<bool> {
        self.delete_any(&AnyKey::new(key.clone()))
    }

    /// Erased form of [`delete`](Self::delete)
    pub fn delete_any(&self, key: &AnyKey) -> Result<bool> {
        self.contract.check_key(key.descriptor())?;
        Ok(self.inner.delete(key))
    }

    /// Returns true if the map contains `key`
    ///
    /// # Errors
    ///
    /// Returns `MapError::TypeMismatch` if `K` is not the map's key type.
    pub fn contains_key<K: MapKey>(&self, key: &K) -> Result<bool> {
        let key = AnyKey::new(key.clone());
        self.contract.check_key(key.descriptor())?;
        Ok(self.inner.contains_key(&key))
    }

    /// Returns a snapshot of every key currently in the map
    pub fn keys(&self) -> Vec<AnyKey> {
        self.inner.keys()
    }

    /// Returns a snapshot of every key, downcast to `K`
    ///
    /// # Errors
    ///
    /// Returns `MapError::TypeMismatch` if `K` is not the map's key type, or,
    /// for a map without a key type, if any stored key is not a `K`.
    pub fn keys_as<K: MapKey>(&self) -> Result<Vec<K>> {
        let wanted = TypeDescriptor::of::<K>();
        self.contract.check_key(wanted)?;
        self.keys()
            .into_iter()
            .map(|key| {
                key.downcast_ref::<K>()
                    .cloned()
                    .ok_or_else(|| MapError::TypeMismatch {
                        slot: Slot::Key,
                        expected: wanted.name(),
                        found: key.descriptor().name(),
                    })
            })
            .collect()
    }

    /// Runs `f` against the value stored under `key` without cloning it
    ///
    /// `f` runs under the read lock and must not call back into this map.
    /// Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `MapError::TypeMismatch` if `K` or `V` violate the contract, or
    /// if the stored value is not a `V`.
    pub fn with<K, V, F, R>(&self, key: &K, f: F) -> Result<Option<R>>
    where
        K: MapKey,
        V: MapValue,
        F: FnOnce(&V) -> R,
    {
        let key = AnyKey::new(key.clone());
        self.contract.check_key(key.descriptor())?;
        self.check_requested_value::<V>()?;
        self.inner
            .with(&key, |value| match view_value::<V>(value) {
                Some(value) => Ok(f(value)),
                None => Err(stored_mismatch::<V>(value)),
            })
            .transpose()
    }

    /// Returns the number of entries in the map
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the map contains no entries
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn check_entry(&self, key: &AnyKey, value: &AnyValue) -> Result<()> {
        self.contract.check_key(key.descriptor())?;
        self.contract.check_value(value.descriptor())
    }

    // Stored values already satisfy the contract, so the erased form can
    // always be requested.
    fn check_requested_value<V: MapValue>(&self) -> Result<()> {
        if TypeId::of::<V>() == TypeId::of::<AnyValue>() {
            return Ok(());
        }
        self.contract.check_value(TypeDescriptor::of::<V>())
    }
}

fn view_value<V: 'static>(value: &AnyValue) -> Option<&V> {
    (value as &dyn Any)
        .downcast_ref::<V>()
        .or_else(|| value.downcast_ref::<V>())
}

fn downcast_value<V: MapValue>(value: AnyValue) -> Result<V> {
    match view_value::<V>(&value) {
        Some(found) => Ok(found.clone()),
        None => Err(stored_mismatch::<V>(&value)),
    }
}

// Only reachable on maps without a value type.
fn stored_mismatch<V: 'static>(stored: &AnyValue) -> MapError {
    MapError::TypeMismatch {
        slot: Slot::Value,
        expected: std::any::type_name::<V>(),
        found: stored.descriptor().name(),
    }
}

impl Default for TypedMap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypedMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TypedMap")
            .field("contract", &self.contract)
            .field("len", &self.inner.len())
            .finish()
    }
}
