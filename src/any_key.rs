use crate::descriptor::TypeDescriptor;
use std::any::Any;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};

/// Keys that can be stored in a [`TypedMap`](crate::TypedMap)
///
/// Implemented for every `Any + Send + Sync + Eq + Hash + Clone + Debug` type.
pub trait MapKey: Any + Send + Sync + Eq + Hash + Clone + Debug {}

impl<T> MapKey for T where T: Any + Send + Sync + Eq + Hash + Clone + Debug {}

trait ErasedKey: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_erased(&self, other: &dyn Any) -> bool;
    fn hash_erased(&self, state: &mut dyn Hasher);
    fn clone_boxed(&self) -> Box<dyn ErasedKey>;
    fn fmt_erased(&self, f: &mut fmt::Formatter) -> fmt::Result;
}

impl<T: MapKey> ErasedKey for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_erased(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().map_or(false, |other| self == other)
    }

    fn hash_erased(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }

    fn clone_boxed(&self) -> Box<dyn ErasedKey> {
        Box::new(self.clone())
    }

    fn fmt_erased(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

/// A type-erased key
///
/// Two `AnyKey`s are equal only when they wrap the same concrete type and the
/// wrapped values are equal, so `1i32` and `1i64` are different keys.
pub struct AnyKey {
    descriptor: TypeDescriptor,
    key: Box<dyn ErasedKey>,
}

impl AnyKey {
    /// Wraps `key`
    ///
    /// Wrapping an `AnyKey` returns it unchanged rather than nesting it.
    pub fn new<T: MapKey>(key: T) -> Self {
        if let Some(erased) = (&key as &dyn Any).downcast_ref::<AnyKey>() {
            return erased.clone();
        }
        Self {
            descriptor: TypeDescriptor::of::<T>(),
            key: Box::new(key),
        }
    }

    /// Describes the wrapped key's concrete type
    pub fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    /// Check if the wrapped key is of type T
    pub fn is_type<T: 'static>(&self) -> bool {
        self.descriptor.is::<T>()
    }

    /// Get a reference to the wrapped key if it is of type T
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        (*self.key).as_any().downcast_ref::<T>()
    }
}

impl PartialEq for AnyKey {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor == other.descriptor && (*self.key).eq_erased((*other.key).as_any())
    }
}

impl Eq for AnyKey {}

impl Hash for AnyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.descriptor.hash(state);
        (*self.key).hash_erased(state);
    }
}

impl Clone for AnyKey {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor,
            key: (*self.key).clone_boxed(),
        }
    }
}

impl Debug for AnyKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        (*self.key).fmt_erased(f)
    }
}
