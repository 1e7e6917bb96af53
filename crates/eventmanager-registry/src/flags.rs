//! Event argument flags
//!
//! Flags gate subscriber methods on facts carried by the firing event, such
//! as "this save is an auto-save". A gated method only runs when its flag is
//! present and truthy in the event's arguments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Recognized event argument flags
///
/// [`ArgumentFlag::ALL`] fixes the order in which the dispatcher applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArgumentFlag {
    /// Only the version is saved, not the element itself
    SaveVersionOnly,

    /// The save was triggered by auto-save
    #[serde(rename = "IsAutoSave")]
    AutoSave,
}

impl ArgumentFlag {
    /// All flags in application order
    pub const ALL: [ArgumentFlag; 2] = [ArgumentFlag::SaveVersionOnly, ArgumentFlag::AutoSave];

    /// Key under which the event reports this flag in its arguments
    pub fn context_key(self) -> &'static str {
        match self {
            ArgumentFlag::SaveVersionOnly => "saveVersionOnly",
            ArgumentFlag::AutoSave => "isAutoSave",
        }
    }

    /// Identifier used in declarations and diagnostics
    pub fn identifier(self) -> &'static str {
        match self {
            ArgumentFlag::SaveVersionOnly => "SaveVersionOnly",
            ArgumentFlag::AutoSave => "IsAutoSave",
        }
    }
}

impl fmt::Display for ArgumentFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for ArgumentFlag {
    type Err = RegistryError;

    /// Accepts the identifier or the context key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArgumentFlag::ALL
            .into_iter()
            .find(|flag| flag.identifier() == s || flag.context_key() == s)
            .ok_or_else(|| RegistryError::UnknownFlag(s.to_string()))
    }
}
