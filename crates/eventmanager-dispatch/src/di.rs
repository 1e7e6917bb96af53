//! Static subscriber factories collected with `inventory`
//!
//! Subscriber crates submit a [`SubscriberFactory`] next to the subscriber;
//! [`ServiceLocator::from_static_factories`] registers every submitted factory
//! as a lazily built singleton.
//!
//! ```rust,ignore
//! inventory::submit! {
//!     SubscriberFactory::new("ProductSubscriber", create_product_subscriber)
//! }
//!
//! fn create_product_subscriber() -> Arc<dyn Service> {
//!     Arc::new(ProductSubscriber::default())
//! }
//! ```

use std::sync::Arc;

use tracing::info;

use crate::locator::ServiceLocator;
use crate::subscriber::Service;

/// Factory for one subscriber class
#[derive(Debug)]
pub struct SubscriberFactory {
    pub class: &'static str,
    pub factory_fn: fn() -> Arc<dyn Service>,
}

impl SubscriberFactory {
    pub const fn new(class: &'static str, factory_fn: fn() -> Arc<dyn Service>) -> Self {
        Self { class, factory_fn }
    }
}

inventory::collect!(SubscriberFactory);

impl ServiceLocator {
    /// Locator holding every `inventory`-submitted subscriber factory
    pub fn from_static_factories() -> Self {
        let locator = ServiceLocator::new();
        for factory in inventory::iter::<SubscriberFactory>() {
            let build = factory.factory_fn;
            locator.register(factory.class, move || Ok(build()));
        }
        info!(
            services = locator.service_count(),
            "Registered static subscriber factories"
        );
        locator
    }
}

/// Class identifiers of every submitted factory
pub fn list_static_factories() -> Vec<&'static str> {
    inventory::iter::<SubscriberFactory>()
        .map(|f| f.class)
        .collect()
}
