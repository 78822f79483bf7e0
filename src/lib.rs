//! # sovran-tsmap
//!
//! Thread-safe maps for sharing mutable lookup state between threads.
//!
//! `sovran-tsmap` wraps an ordinary `HashMap` behind a single reader/writer lock
//! so that caches, registries and deduplication sets can be read and updated from
//! many threads without data races or lost updates.
//!
//! ## Key Features
//!
//! - **Reader/writer locking**: lookups share the lock, mutations take it exclusively
//! - **Atomic insert-if-absent**: `put_unique` checks and inserts under one lock
//! - **Key snapshots**: `keys` copies the keys out, so iterating holds no lock
//! - **Runtime type enforcement**: `TypedMap` rejects keys and values of the wrong
//!   type before they reach the store
//! - **No poisoning**: a panicking caller never turns later calls into errors
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_tsmap::ConcurrentMap;
//!
//! let map = ConcurrentMap::<String, i32>::new();
//!
//! map.put("a".to_string(), 1);
//! map.put("b".to_string(), 2);
//!
//! let mut keys = map.keys();
//! keys.sort();
//! assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
//!
//! map.delete(&"a".to_string());
//! assert_eq!(map.get(&"a".to_string()), None);
//! assert_eq!(map.get(&"b".to_string()), Some(2));
//! ```
//!
//! ### Sharing Between Threads
//!
//! Exactly one of several racing `put_unique` calls wins.
//!
//! ```rust
//! use sovran_tsmap::ConcurrentMap;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let owners = Arc::new(ConcurrentMap::<&'static str, usize>::new());
//!
//! let handles: Vec<_> = (0..8)
//!     .map(|worker| {
//!         let owners = Arc::clone(&owners);
//!         thread::spawn(move || owners.put_unique("lease", worker))
//!     })
//!     .collect();
//!
//! let wins = handles
//!     .into_iter()
//!     .map(|h| h.join().unwrap())
//!     .filter(|won| *won)
//!     .count();
//!
//! assert_eq!(wins, 1);
//! assert!(owners.contains_key(&"lease"));
//! ```
//!
//! ### Type Enforcement
//!
//! ```rust
//! use sovran_tsmap::{MapError, Slot, TypedMap};
//!
//! let map = TypedMap::of::<u64, String>();
//! map.put(1u64, "one".to_string())?;
//!
//! match map.put("two", "two".to_string()) {
//!     Err(MapError::TypeMismatch { slot: Slot::Key, expected, found }) => {
//!         println!("rejected a {} key, wanted {}", found, expected);
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//!
//! assert_eq!(map.len(), 1);
//! assert_eq!(map.keys_as::<u64>()?, vec![1]);
//! # Ok::<(), MapError>(())
//! ```

mod any_key;
mod any_value;
mod descriptor;
mod error;
mod map;
mod typed;

#[cfg(test)]
mod typed_tests;

pub use any_key::{AnyKey, MapKey};
pub use any_value::{AnyValue, MapValue};
pub use descriptor::{TypeContract, TypeDescriptor};
pub use error::{MapError, Result, Slot};
pub use map::ConcurrentMap;
pub use typed::TypedMap;
