use crate::error::{MapError, Result, Slot};
use std::any::{type_name, TypeId};
use std::fmt;

/// Runtime description of a concrete type
///
/// Two descriptors are equal iff they describe the same type. The name is
/// carried for error messages only.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    /// Describes `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The described type's `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The described type's name, as reported by `std::any::type_name`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this descriptor describes `T`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl std::hash::Hash for TypeDescriptor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The key and value types a [`TypedMap`](crate::TypedMap) accepts
///
/// A `None` slot accepts any type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeContract {
    /// Required key type, if any
    pub key: Option<TypeDescriptor>,
    /// Required value type, if any
    pub value: Option<TypeDescriptor>,
}

impl TypeContract {
    /// A contract that accepts every key and value type
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// A contract requiring keys of type `K` and values of type `V`
    pub fn of<K: 'static, V: 'static>() -> Self {
        Self {
            key: Some(TypeDescriptor::of::<K>()),
            value: Some(TypeDescriptor::of::<V>()),
        }
    }

    /// Returns true if neither slot is constrained
    pub fn is_unconstrained(&self) -> bool {
        self.key.is_none() && self.value.is_none()
    }

    /// Checks a key type against the contract
    pub fn check_key(&self, found: TypeDescriptor) -> Result<()> {
        check(Slot::Key, self.key, found)
    }

    /// Checks a value type against the contract
    pub fn check_value(&self, found: TypeDescriptor) -> Result<()> {
        check(Slot::Value, self.value, found)
    }
}

fn check(
    slot: Slot,
    expected: Option<TypeDescriptor>,
    found: TypeDescriptor,
) -> Result<()> {
    match expected {
        Some(expected) if expected != found => {
            tracing::debug!(
                %slot,
                expected = expected.name(),
                found = found.name(),
                "rejected input of the wrong type"
            );
            Err(MapError::TypeMismatch {
                slot,
                expected: expected.name(),
                found: found.name(),
            })
        }
        _ => Ok(()),
    }
}
