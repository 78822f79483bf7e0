use crate::descriptor::TypeDescriptor;
use std::any::Any;
use std::fmt;

/// Values that can be stored in a [`TypedMap`](crate::TypedMap)
///
/// Implemented for every `Any + Send + Sync + Clone` type.
pub trait MapValue: Any + Send + Sync + Clone {}

impl<T> MapValue for T where T: Any + Send + Sync + Clone {}

trait ErasedValue: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn ErasedValue>;
}

impl<T: MapValue> ErasedValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn ErasedValue> {
        Box::new(self.clone())
    }
}

/// A container for type-erased values that preserves type information
pub struct AnyValue {
    descriptor: TypeDescriptor,
    value: Box<dyn ErasedValue>,
}

impl AnyValue {
    /// Create a new AnyValue from any clonable, thread-safe value
    ///
    /// Wrapping an `AnyValue` returns it unchanged rather than nesting it.
    pub fn new<T: MapValue>(value: T) -> Self {
        if let Some(erased) = (&value as &dyn Any).downcast_ref::<AnyValue>() {
            return erased.clone();
        }
        Self {
            descriptor: TypeDescriptor::of::<T>(),
            value: Box::new(value),
        }
    }

    /// Describes the contained value's concrete type
    pub fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    /// Check if the contained value is of type T
    pub fn is_type<T: 'static>(&self) -> bool {
        self.descriptor.is::<T>()
    }

    /// Get a reference to the contained value if it is of type T
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        (*self.value).as_any().downcast_ref::<T>()
    }

    /// Take the contained value out if it is of type T
    pub fn downcast<T: MapValue>(self) -> Result<T, Self> {
        match (*self.value).as_any().downcast_ref::<T>() {
            Some(value) => Ok(value.clone()),
            None => Err(self),
        }
    }
}

impl Clone for AnyValue {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor,
            value: (*self.value).clone_boxed(),
        }
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AnyValue")
            .field("type", &self.descriptor.name())
            .finish_non_exhaustive()
    }
}
