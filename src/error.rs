use std::fmt;
use thiserror::Error;

/// Which half of an entry a type check was applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The entry's key
    Key,
    /// The entry's value
    Value,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Slot::Key => write!(f, "key"),
            Slot::Value => write!(f, "value"),
        }
    }
}

/// Errors that can occur when using a [`TypedMap`](crate::TypedMap)
///
/// [`ConcurrentMap`](crate::ConcurrentMap) never fails; absence of a key is
/// reported through `Option`/`bool` results, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// A key or value did not match the type the map was constructed with.
    /// The map is left unchanged.
    #[error("type mismatch for {slot}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Whether the key or the value was rejected
        slot: Slot,
        /// Name of the type the map expects in this slot
        expected: &'static str,
        /// Name of the type that was supplied
        found: &'static str,
    },
}

impl MapError {
    /// Check if this is a type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, MapError::TypeMismatch { .. })
    }
}

/// Result type for checked map operations.
pub type Result<T> = std::result::Result<T, MapError>;
