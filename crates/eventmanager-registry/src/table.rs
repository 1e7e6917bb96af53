//! Frozen declaration table
//!
//! The table is produced by [`RegistryBuilder::freeze`](crate::RegistryBuilder::freeze)
//! and never changes afterwards. All lookups return borrowed data so the
//! dispatcher can filter candidates without copying declarations.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::flags::ArgumentFlag;
use crate::types::Parameter;

/// A subscriber method registered for an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

/// All methods of one subscriber class registered for an event
///
/// Methods keep their registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberDeclaration {
    pub class: String,
    pub methods: Vec<MethodDeclaration>,
}

impl SubscriberDeclaration {
    pub fn method(&self, name: &str) -> Option<&MethodDeclaration> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Host listener binding for one event name
///
/// The host dispatcher calls the event manager under `method` whenever
/// `event` fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerBinding {
    pub event: String,
    pub method: String,
    pub priority: i32,
}

/// Read-only registry handed to the dispatcher
#[derive(Debug, Clone, Default)]
pub struct DeclarationTable {
    pub(crate) subscribers: HashMap<String, Vec<SubscriberDeclaration>>,
    pub(crate) type_map: HashMap<String, BTreeSet<String>>,
    pub(crate) arguments: HashMap<ArgumentFlag, HashMap<String, BTreeSet<String>>>,
    pub(crate) listeners: Vec<ListenerBinding>,
}

impl DeclarationTable {
    /// Subscribers registered under an event method, in registration order
    ///
    /// `None` means nothing was ever declared for the method, which the
    /// dispatcher treats as a configuration error.
    pub fn subscribers_for(&self, event_method: &str) -> Option<&[SubscriberDeclaration]> {
        self.subscribers.get(event_method).map(Vec::as_slice)
    }

    /// Subscriber classes eligible for objects of a concrete class
    pub fn classes_for_concrete(&self, class: &str) -> Option<&BTreeSet<String>> {
        self.type_map.get(class)
    }

    /// Subscriber classes and methods gated by a flag
    pub fn gated_by(&self, flag: ArgumentFlag) -> Option<&HashMap<String, BTreeSet<String>>> {
        self.arguments.get(&flag)
    }

    /// Methods of `class` gated by a flag
    pub fn gated_methods(&self, flag: ArgumentFlag, class: &str) -> Option<&BTreeSet<String>> {
        self.gated_by(flag).and_then(|classes| classes.get(class))
    }

    /// Host listener bindings, one per event name
    pub fn listeners(&self) -> &[ListenerBinding] {
        &self.listeners
    }

    /// All declared event methods, sorted
    pub fn event_methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.subscribers.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Serializable overview of the table for diagnostics
    pub fn summary(&self) -> TableSummary {
        let events = self
            .subscribers
            .iter()
            .map(|(event, subscribers)| {
                let classes = subscribers
                    .iter()
                    .map(|s| {
                        let methods = s.methods.iter().map(|m| m.name.clone()).collect();
                        (s.class.clone(), methods)
                    })
                    .collect();
                (event.clone(), classes)
            })
            .collect();

        let type_map = self
            .type_map
            .iter()
            .map(|(class, subscribers)| (class.clone(), subscribers.iter().cloned().collect()))
            .collect();

        let arguments = self
            .arguments
            .iter()
            .map(|(flag, classes)| {
                let classes = classes
                    .iter()
                    .map(|(class, methods)| (class.clone(), methods.iter().cloned().collect()))
                    .collect();
                (*flag, classes)
            })
            .collect();

        TableSummary {
            events,
            type_map,
            arguments,
            listeners: self.listeners.clone(),
        }
    }
}

/// Sorted snapshot of a [`DeclarationTable`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub events: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    pub type_map: BTreeMap<String, Vec<String>>,
    /// Keyed by flag identifier when serialized
    pub arguments: BTreeMap<ArgumentFlag, BTreeMap<String, Vec<String>>>,
    pub listeners: Vec<ListenerBinding>,
}
