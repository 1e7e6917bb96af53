//! Error types for the dispatch core
//!
//! Only [`SubscriberError`] ever leaves [`EventManager::dispatch`]; every
//! other error kind is handled inside the dispatcher and shows up in the logs
//! only.
//!
//! # Error Handling Patterns
//!
//! 1. **Configuration errors** ([`EventManagerError::UnknownEventMethod`]):
//!    logged, the dispatch ends without effect.
//! 2. **Subscriber errors** (resolution failure, missing capability): logged,
//!    the subscriber is skipped and the next one runs.
//! 3. **Binding errors** ([`EventManagerError::ArgumentBindingFailure`]): the
//!    method is skipped; reporting depends on configuration.
//! 4. **Invocation errors** ([`SubscriberError`]): returned unchanged to the
//!    caller, halting the dispatch. Anything but a validation failure is
//!    logged first.
//!
//! [`EventManager::dispatch`]: crate::EventManager::dispatch

use thiserror::Error;

/// Errors the dispatcher recovers from locally
#[derive(Debug, Error)]
pub enum EventManagerError {
    /// Dispatch was invoked for an event method nobody declared
    #[error("Unknown method: {0}")]
    UnknownEventMethod(String),

    /// The locator could not produce the subscriber
    #[error("Could not load subscriber {class}: {source}")]
    SubscriberResolutionFailure {
        class: String,
        #[source]
        source: LocatorError,
    },

    /// The located service does not offer the subscriber capability
    #[error("Service {class} is not an event subscriber")]
    SubscriberCapabilityMismatch { class: String },

    /// A parameter could not be bound from the available objects
    #[error("Could not resolve {subscriber}::{method} for argument {argument}")]
    ArgumentBindingFailure {
        subscriber: String,
        method: String,
        argument: String,
    },
}

/// Errors raised by a [`Locator`](crate::Locator)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    #[error("Service not registered: {0}")]
    ServiceNotRegistered(String),

    #[error("Service construction failed for {class}: {message}")]
    ConstructionFailed { class: String, message: String },
}

/// Rejection raised by a subscriber to veto the event
///
/// A validation failure is never logged by the dispatcher; it reaches the
/// event caller as is, typically to reject a save.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure raised while a subscriber method runs
///
/// [`EventManager::dispatch`](crate::EventManager::dispatch) returns the
/// value the subscriber produced without wrapping it.
#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl SubscriberError {
    /// Error for a method name the subscriber does not handle
    pub fn unknown_method(subscriber: &str, method: &str) -> Self {
        SubscriberError::Failed(anyhow::anyhow!(
            "{subscriber} has no event method {method}"
        ))
    }

    /// Error for a bound argument missing or of an unexpected type
    pub fn missing_argument(name: &str) -> Self {
        SubscriberError::Failed(anyhow::anyhow!(
            "Argument {name} is missing or has an unexpected type"
        ))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SubscriberError::Validation(_))
    }
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for dispatch operations
pub type Result<T> = std::result::Result<T, SubscriberError>;
