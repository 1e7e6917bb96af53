//! Event Manager Dispatch Core
//!
//! Receives event calls from the host event dispatcher and invokes the
//! subscriber methods declared for them in an
//! [`eventmanager_registry::DeclarationTable`].
//!
//! # Dispatch Steps
//!
//! 1. Return immediately while the global [`Switch`] is off
//! 2. Read the event arguments and the primary object from the first call
//!    argument, when it is an [`EventPayload`]
//! 3. Select the subscribers of the event method, narrowed by the primary
//!    object's concrete class and by every set argument flag
//! 4. Resolve each subscriber class through the [`Locator`]
//! 5. Bind every method parameter by type from the primary object and the
//!    call arguments, then invoke the method
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use eventmanager_dispatch::{EventManager, ServiceLocator};
//! use eventmanager_registry::RegistryBuilder;
//!
//! let table = Arc::new(RegistryBuilder::from_static_declarations()?.freeze());
//! let locator = Arc::new(ServiceLocator::from_static_factories());
//! let manager = EventManager::new(table, locator);
//!
//! manager.handle("pimcore.dataobject.postUpdate", &[event])?;
//! ```

pub mod config;
pub mod di;
pub mod error;
pub mod locator;
pub mod manager;
pub mod object;
pub mod payload;
pub mod subscriber;
pub mod switch;

pub use config::{ConfigLoader, EventManagerConfig, CONFIG_ROOT};
pub use di::{list_static_factories, SubscriberFactory};
pub use error::{ConfigError, EventManagerError, LocatorError, Result, SubscriberError, ValidationError};
pub use locator::{Locator, ServiceLifetime, ServiceLocator, SERVICE_TAG};
pub use manager::{Candidate, DispatchContext, EventManager};
pub use object::{downcast_ref, is_instance_of, AsAny, DomainObject, ObjectRef};
pub use payload::{flag_is_set, is_truthy, primary_object, EventArguments, EventPayload, ObjectAccessor, OBJECT_ACCESSORS};
pub use subscriber::{BoundArguments, Service, Subscriber};
pub use switch::Switch;
