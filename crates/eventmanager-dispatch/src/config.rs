//! Event manager configuration
//!
//! Loaded from the `event_manager` section of a YAML file:
//!
//! ```yaml
//! event_manager:
//!   enabled: true
//!   report_unbound_parameters: false
//! ```
//!
//! A missing file or section yields the defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Root key of the configuration section
pub const CONFIG_ROOT: &str = "event_manager";

/// Runtime settings of the [`EventManager`](crate::EventManager)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventManagerConfig {
    /// Initial state of the dispatch switch
    pub enabled: bool,

    /// Log skipped methods whose parameters could not be bound
    ///
    /// Off by default: such methods are skipped with a debug line only.
    pub report_unbound_parameters: bool,
}

impl Default for EventManagerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            report_unbound_parameters: false,
        }
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<EventManagerConfig, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No event manager config file, using defaults");
            return Ok(EventManagerConfig::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parses YAML content containing an `event_manager` section
    pub fn parse_yaml(content: &str) -> Result<EventManagerConfig, ConfigError> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;

        match value.get(CONFIG_ROOT) {
            Some(section) if !section.is_null() => {
                Ok(serde_yaml::from_value(section.clone())?)
            }
            _ => Ok(EventManagerConfig::default()),
        }
    }
}
