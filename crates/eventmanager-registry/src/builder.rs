//! Accumulating registry builder

use std::collections::HashSet;

use tracing::{debug, info};

use crate::{
    declarations::{ArgumentDeclaration, EventDeclaration},
    error::{RegistryError, Result},
    flags::ArgumentFlag,
    naming::event_method_name,
    table::{DeclarationTable, ListenerBinding, MethodDeclaration, SubscriberDeclaration},
    types::Parameter,
};

/// Collects declarations while the application boots
///
/// The builder is append-only. Once every declaration is in, [`freeze`]
/// turns it into the [`DeclarationTable`] the dispatcher reads.
///
/// [`freeze`]: RegistryBuilder::freeze
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    table: DeclarationTable,
    registered_events: HashSet<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-filled with every `inventory`-submitted declaration
    ///
    /// Link order decides the order `inventory` yields items in, so event
    /// declarations are sorted by subscriber, method and event first to keep
    /// the registration order stable between builds.
    pub fn from_static_declarations() -> Result<Self> {
        let mut builder = Self::new();

        let mut events: Vec<&EventDeclaration> = inventory::iter::<EventDeclaration>().collect();
        events.sort_by_key(|d| (d.subscriber, d.method, d.event));
        for declaration in &events {
            builder.subscribe(
                declaration.event,
                declaration.priority,
                declaration.subscriber,
                declaration.method,
                (declaration.parameters)(),
            )?;
        }

        let mut arguments = 0;
        for declaration in inventory::iter::<ArgumentDeclaration>() {
            builder.add_event_argument(
                declaration.flag,
                declaration.subscriber,
                declaration.method,
            )?;
            arguments += 1;
        }

        info!(
            event_declarations = events.len(),
            argument_declarations = arguments,
            "Collected static event declarations"
        );
        Ok(builder)
    }

    /// Registers a subscriber method for a host event name
    ///
    /// Normalizes `event` into its event method, records the host listener
    /// binding the first time the event name is seen and then registers the
    /// method via [`add_subscriber`](Self::add_subscriber). Later declarations
    /// for the same event name do not change the listener priority.
    ///
    /// Returns the event method name.
    pub fn subscribe(
        &mut self,
        event: &str,
        priority: i32,
        subscriber_class: &str,
        subscriber_method: &str,
        parameters: Vec<Parameter>,
    ) -> Result<String> {
        let method = event_method_name(event);
        if method.is_empty() {
            return Err(RegistryError::EmptyEventName(event.to_string()));
        }

        self.add_subscriber(&method, subscriber_class, subscriber_method, parameters)?;

        if self.registered_events.insert(event.to_string()) {
            debug!(event = %event, method = %method, priority, "Registered event listener");
            self.table.listeners.push(ListenerBinding {
                event: event.to_string(),
                method: method.clone(),
                priority,
            });
        }

        Ok(method)
    }

    /// Registers a subscriber method under an event method
    ///
    /// Every accepted type that is a concrete data object adds the subscriber
    /// class to the type map entry of that class. Registering the same
    /// (event, class, method) again replaces its parameters in place.
    pub fn add_subscriber(
        &mut self,
        event_method: &str,
        subscriber_class: &str,
        subscriber_method: &str,
        parameters: Vec<Parameter>,
    ) -> Result<()> {
        require("event method", event_method)?;
        require("subscriber class", subscriber_class)?;
        require("subscriber method", subscriber_method)?;
        for parameter in &parameters {
            require("parameter name", &parameter.name)?;
        }

        for class in parameters.iter().flat_map(Parameter::concrete_classes) {
            self.table
                .type_map
                .entry(class.to_string())
                .or_default()
                .insert(subscriber_class.to_string());
        }

        let subscribers = self
            .table
            .subscribers
            .entry(event_method.to_string())
            .or_default();

        let subscriber = match subscribers
            .iter()
            .position(|s| s.class == subscriber_class)
        {
            Some(index) => &mut subscribers[index],
            None => {
                subscribers.push(SubscriberDeclaration {
                    class: subscriber_class.to_string(),
                    methods: Vec::new(),
                });
                let last = subscribers.len() - 1;
                &mut subscribers[last]
            }
        };

        match subscriber
            .methods
            .iter_mut()
            .find(|m| m.name == subscriber_method)
        {
            Some(existing) => existing.parameters = parameters,
            None => subscriber.methods.push(MethodDeclaration {
                name: subscriber_method.to_string(),
                parameters,
            }),
        }

        debug!(
            event_method = %event_method,
            subscriber = %subscriber_class,
            method = %subscriber_method,
            "Registered subscriber method"
        );
        Ok(())
    }

    /// Gates a subscriber method on an event argument flag
    pub fn add_event_argument(
        &mut self,
        flag: ArgumentFlag,
        subscriber_class: &str,
        subscriber_method: &str,
    ) -> Result<()> {
        require("subscriber class", subscriber_class)?;
        require("subscriber method", subscriber_method)?;

        self.table
            .arguments
            .entry(flag)
            .or_default()
            .entry(subscriber_class.to_string())
            .or_default()
            .insert(subscriber_method.to_string());

        debug!(
            flag = %flag,
            subscriber = %subscriber_class,
            method = %subscriber_method,
            "Registered event argument"
        );
        Ok(())
    }

    /// Publishes the collected declarations
    pub fn freeze(self) -> DeclarationTable {
        info!(
            event_methods = self.table.subscribers.len(),
            concrete_classes = self.table.type_map.len(),
            listeners = self.table.listeners.len(),
            "Froze event declaration table"
        );
        self.table
    }
}

fn require(what: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(RegistryError::EmptyIdentifier(what));
    }
    Ok(())
}
