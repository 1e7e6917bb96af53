//! Service locator for subscriber instances
//!
//! The dispatcher only knows subscriber class identifiers; a [`Locator`]
//! turns them into live services. Hosts with their own container implement
//! the trait; [`ServiceLocator`] is the bundled implementation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::LocatorError;
use crate::subscriber::Service;

/// Tag under which subscriber services are collected
pub const SERVICE_TAG: &str = "event_manager.event_subscriber.handler";

/// Resolves subscriber class identifiers to services
pub trait Locator: Send + Sync {
    fn get(&self, class: &str) -> Result<Arc<dyn Service>, LocatorError>;

    fn has(&self, class: &str) -> bool;
}

/// Service lifetime management
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLifetime {
    /// Created on first use and reused afterwards
    Singleton,
    /// Created on every lookup
    Transient,
}

type ServiceFactoryFn = Box<dyn Fn() -> Result<Arc<dyn Service>, LocatorError> + Send + Sync>;

struct ServiceDescriptor {
    factory: ServiceFactoryFn,
    lifetime: ServiceLifetime,
    instance: Option<Arc<dyn Service>>,
}

/// Locator keyed by subscriber class identifier
///
/// Registering a class again replaces the previous registration.
pub struct ServiceLocator {
    services: RwLock<HashMap<String, ServiceDescriptor>>,
}

impl ServiceLocator {
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a singleton built lazily by `factory`
    pub fn register<F>(&self, class: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn Service>, LocatorError> + Send + Sync + 'static,
    {
        self.insert(class.into(), Box::new(factory), ServiceLifetime::Singleton, None);
    }

    /// Registers a service rebuilt on every lookup
    pub fn register_transient<F>(&self, class: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn Service>, LocatorError> + Send + Sync + 'static,
    {
        self.insert(class.into(), Box::new(factory), ServiceLifetime::Transient, None);
    }

    /// Registers an already built service
    pub fn register_instance(&self, class: impl Into<String>, instance: Arc<dyn Service>) {
        let class = class.into();
        let factory_instance = instance.clone();
        self.insert(
            class,
            Box::new(move || Ok(factory_instance.clone())),
            ServiceLifetime::Singleton,
            Some(instance),
        );
    }

    fn insert(
        &self,
        class: String,
        factory: ServiceFactoryFn,
        lifetime: ServiceLifetime,
        instance: Option<Arc<dyn Service>>,
    ) {
        debug!(class = %class, lifetime = ?lifetime, "Registered subscriber service");
        self.services.write().insert(
            class,
            ServiceDescriptor {
                factory,
                lifetime,
                instance,
            },
        );
    }

    pub fn service_count(&self) -> usize {
        self.services.read().len()
    }
}

impl Default for ServiceLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator for ServiceLocator {
    fn get(&self, class: &str) -> Result<Arc<dyn Service>, LocatorError> {
        {
            let services = self.services.read();
            let descriptor = services
                .get(class)
                .ok_or_else(|| LocatorError::ServiceNotRegistered(class.to_string()))?;
            if let Some(instance) = &descriptor.instance {
                return Ok(instance.clone());
            }
        }

        let mut services = self.services.write();
        let descriptor = services
            .get_mut(class)
            .ok_or_else(|| LocatorError::ServiceNotRegistered(class.to_string()))?;

        match descriptor.lifetime {
            ServiceLifetime::Singleton => {
                // Another thread may have built it between the two locks.
                if let Some(instance) = &descriptor.instance {
                    return Ok(instance.clone());
                }
                let instance = (descriptor.factory)()?;
                descriptor.instance = Some(instance.clone());
                Ok(instance)
            }
            ServiceLifetime::Transient => (descriptor.factory)(),
        }
    }

    fn has(&self, class: &str) -> bool {
        self.services.read().contains_key(class)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Counter;

    impl Service for Counter {}

    #[test]
    fn test_unregistered_service() {
        let locator = ServiceLocator::new();
        let result = locator.get("Missing");

        assert!(matches!(result, Err(LocatorError::ServiceNotRegistered(class)) if class == "Missing"));
        assert!(!locator.has("Missing"));
    }

    #[test]
    fn test_singleton_is_built_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let locator = ServiceLocator::new();
        locator.register("Counter", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Counter) as Arc<dyn Service>)
        });

        let first = locator.get("Counter").unwrap();
        let second = locator.get("Counter").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_transient_is_built_every_time() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let locator = ServiceLocator::new();
        locator.register_transient("Counter", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Counter) as Arc<dyn Service>)
        });

        locator.get("Counter").unwrap();
        locator.get("Counter").unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failing_factory_is_retried_on_next_lookup() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let locator = ServiceLocator::new();
        locator.register("Flaky", move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(LocatorError::ConstructionFailed {
                    class: "Flaky".to_string(),
                    message: "database unavailable".to_string(),
                });
            }
            Ok(Arc::new(Counter) as Arc<dyn Service>)
        });

        assert!(locator.get("Flaky").is_err());
        assert!(locator.get("Flaky").is_ok());
    }

    #[test]
    fn test_built_singleton_is_served_under_read_lock() {
        let locator = ServiceLocator::new();
        locator.register("Counter", || Ok(Arc::new(Counter) as Arc<dyn Service>));
        let first = locator.get("Counter").unwrap();

        let _reader = locator.services.read();
        let second = locator.get("Counter").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_concurrent_lookups_share_one_singleton() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let locator = ServiceLocator::new();
        locator.register("Counter", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Counter) as Arc<dyn Service>)
        });

        let instances: Vec<Arc<dyn Service>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| locator.get("Counter").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
    }

    #[test]
    fn test_register_instance() {
        let locator = ServiceLocator::new();
        let instance: Arc<dyn Service> = Arc::new(Counter);
        locator.register_instance("Counter", instance.clone());

        assert!(Arc::ptr_eq(&locator.get("Counter").unwrap(), &instance));
        assert_eq!(locator.service_count(), 1);
    }
}
