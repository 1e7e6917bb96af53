//! Error types for the declaration registry

use thiserror::Error;

/// Errors raised while declarations are collected
///
/// Registration happens once at boot, so every variant points at a broken
/// declaration rather than a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The event name normalizes to an empty event method
    ///
    /// Event names consisting only of `.` and `-` cannot be dispatched.
    #[error("Event name does not produce an event method: '{0}'")]
    EmptyEventName(String),

    /// A subscriber class, method or parameter name is empty
    #[error("Empty {0} in declaration")]
    EmptyIdentifier(&'static str),

    /// An argument flag name is not one of the recognized flags
    #[error("Unknown event argument flag: {0}")]
    UnknownFlag(String),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
