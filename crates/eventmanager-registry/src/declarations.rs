//! Static declarations collected with `inventory`
//!
//! Subscriber crates submit their declarations next to the subscriber code;
//! [`RegistryBuilder::from_static_declarations`](crate::RegistryBuilder::from_static_declarations)
//! gathers every submitted item when the application boots.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eventmanager_registry::{ArgumentDeclaration, ArgumentFlag, EventDeclaration, Parameter};
//!
//! inventory::submit! {
//!     EventDeclaration::new(
//!         "pimcore.dataobject.postUpdate",
//!         "ProductSubscriber",
//!         "onSave",
//!         product_parameters,
//!     )
//! }
//!
//! inventory::submit! {
//!     ArgumentDeclaration::new(ArgumentFlag::AutoSave, "ProductSubscriber", "onSave")
//! }
//!
//! fn product_parameters() -> Vec<Parameter> {
//!     vec![Parameter::concrete::<Product>("object")]
//! }
//! ```
//!
//! Parameters are produced by a function because type identities cannot be
//! computed in a `static`.

use crate::flags::ArgumentFlag;
use crate::types::Parameter;

/// A subscriber method listening to a host event
#[derive(Debug)]
pub struct EventDeclaration {
    /// Host event name, normalized on registration
    pub event: &'static str,

    /// Listener priority for the host dispatcher (default 0)
    pub priority: i32,

    pub subscriber: &'static str,

    pub method: &'static str,

    pub parameters: fn() -> Vec<Parameter>,
}

impl EventDeclaration {
    pub const fn new(
        event: &'static str,
        subscriber: &'static str,
        method: &'static str,
        parameters: fn() -> Vec<Parameter>,
    ) -> Self {
        Self {
            event,
            priority: 0,
            subscriber,
            method,
            parameters,
        }
    }

    pub const fn with_priority(
        event: &'static str,
        priority: i32,
        subscriber: &'static str,
        method: &'static str,
        parameters: fn() -> Vec<Parameter>,
    ) -> Self {
        Self {
            event,
            priority,
            subscriber,
            method,
            parameters,
        }
    }
}

/// A subscriber method gated by an event argument flag
#[derive(Debug)]
pub struct ArgumentDeclaration {
    pub flag: ArgumentFlag,
    pub subscriber: &'static str,
    pub method: &'static str,
}

impl ArgumentDeclaration {
    pub const fn new(flag: ArgumentFlag, subscriber: &'static str, method: &'static str) -> Self {
        Self {
            flag,
            subscriber,
            method,
        }
    }
}

inventory::collect!(EventDeclaration);
inventory::collect!(ArgumentDeclaration);
