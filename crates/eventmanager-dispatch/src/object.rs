//! Domain objects carried by event calls
//!
//! Every positional argument of an event call is a [`DomainObject`]: the
//! event itself, the element it is about, versions, users and so on. The
//! dispatcher never knows their concrete types; it only asks whether an
//! object is an instance of a declared parameter type.

use std::any::{type_name, Any};
use std::sync::Arc;

use eventmanager_registry::TypeKey;

use crate::payload::EventPayload;

/// Shared handle to a domain object
pub type ObjectRef = Arc<dyn DomainObject>;

/// Access to the concrete type behind a trait object
///
/// Implemented for every `'static` type; do not implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// An object that can be bound to subscriber parameters
///
/// The defaults describe a plain object: no parent types, not a concrete
/// data object, not an event payload.
pub trait DomainObject: AsAny + Send + Sync {
    /// Parent types and interfaces this object also satisfies
    fn implements(&self) -> Vec<TypeKey> {
        Vec::new()
    }

    /// Class discriminator when this is a concrete data object
    ///
    /// Must equal the `CLASS_NAME` of the matching
    /// [`ConcreteClass`](eventmanager_registry::ConcreteClass) impl.
    fn concrete_class(&self) -> Option<&str> {
        None
    }

    /// Payload accessors when this object is the event itself
    fn as_payload(&self) -> Option<&dyn EventPayload> {
        None
    }
}

/// Whether `object` satisfies the type `key`
///
/// True when the object's own type is `key` or `key` is among the types it
/// [`implements`](DomainObject::implements).
pub fn is_instance_of(object: &dyn DomainObject, key: &TypeKey) -> bool {
    object.as_any().type_id() == key.id() || object.implements().contains(key)
}

/// Downcasts a shared object to its concrete type
pub fn downcast_ref<T: Any>(object: &ObjectRef) -> Option<&T> {
    let object: &dyn DomainObject = object.as_ref();
    object.as_any().downcast_ref::<T>()
}
