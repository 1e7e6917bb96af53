//! Subscriber capability and bound arguments
//!
//! The locator hands out [`Service`]s. A service takes part in dispatch only
//! if it exposes the [`Subscriber`] capability through
//! [`Service::as_subscriber`]; anything else is skipped with an error log.
//!
//! # Examples
//!
//! ```ignore
//! struct ProductSubscriber {
//!     switch: Switch,
//! }
//!
//! impl Subscriber for ProductSubscriber {
//!     fn is_enabled(&self) -> bool {
//!         self.switch.is_enabled()
//!     }
//!
//!     fn call(&self, method: &str, arguments: &BoundArguments) -> Result<(), SubscriberError> {
//!         match method {
//!             "onSave" => {
//!                 let product = arguments.require::<Product>("object")?;
//!                 if product.sku.is_empty() {
//!                     return Err(ValidationError::new("SKU is required").into());
//!                 }
//!                 Ok(())
//!             }
//!             other => Err(SubscriberError::unknown_method("ProductSubscriber", other)),
//!         }
//!     }
//! }
//!
//! subscriber_service!(ProductSubscriber);
//! ```

use std::any::Any;
use std::collections::HashMap;

use crate::error::SubscriberError;
use crate::object::{downcast_ref, ObjectRef};

/// A service reacting to domain events
pub trait Subscriber: Send + Sync {
    /// Disabled subscribers are skipped without a log line
    fn is_enabled(&self) -> bool;

    /// Invokes the event method `method` with arguments bound by name
    fn call(&self, method: &str, arguments: &BoundArguments) -> Result<(), SubscriberError>;
}

/// Anything the locator can return
pub trait Service: Send + Sync + 'static {
    /// Subscriber capability, if the service has it
    fn as_subscriber(&self) -> Option<&dyn Subscriber> {
        None
    }
}

/// Implements [`Service`] for a type that implements [`Subscriber`]
#[macro_export]
macro_rules! subscriber_service {
    ($subscriber:ty) => {
        impl $crate::Service for $subscriber {
            fn as_subscriber(&self) -> Option<&dyn $crate::Subscriber> {
                Some(self)
            }
        }
    };
}

/// Objects bound to a method's parameters, keyed by parameter name
#[derive(Clone, Default)]
pub struct BoundArguments {
    values: HashMap<String, ObjectRef>,
}

impl BoundArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, object: ObjectRef) {
        self.values.insert(name.into(), object);
    }

    /// The shared object bound to `name`
    pub fn object(&self, name: &str) -> Option<&ObjectRef> {
        self.values.get(name)
    }

    /// The object bound to `name`, downcast to `T`
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(downcast_ref::<T>)
    }

    /// Like [`get`](Self::get), failing the invocation when absent
    pub fn require<T: Any>(&self, name: &str) -> Result<&T, SubscriberError> {
        self.get(name)
            .ok_or_else(|| SubscriberError::missing_argument(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for BoundArguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut entries: Vec<(&str, &'static str)> = self
            .values
            .iter()
            .map(|(name, object)| (name.as_str(), (**object).type_name()))
            .collect();
        entries.sort_unstable();
        f.debug_map().entries(entries).finish()
    }
}
