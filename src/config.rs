//! Registry options.
//!
//! Options can be built in code, read from environment variables, or, with
//! the `config` feature, parsed from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{FactoryError, FactoryResult};

/// Environment variable enabling the built-in logging observer.
pub const ENV_LOG: &str = "FERROUS_FACTORY_LOG";
/// Environment variable overriding the logging prefix.
pub const ENV_LOG_PREFIX: &str = "FERROUS_FACTORY_LOG_PREFIX";
/// Environment variable setting the registry label.
pub const ENV_LABEL: &str = "FERROUS_FACTORY_LABEL";

const DEFAULT_LOG_PREFIX: &str = "[ferrous-factory]";

/// Options applied when a registry is built.
///
/// # Examples
///
/// ```rust
/// use ferrous_factory::{FactoryRegistry, RegistryOptions};
///
/// let options = RegistryOptions::default()
///     .with_label("audio")
///     .with_logging(true)
///     .with_log_prefix("[audio]");
///
/// let registry = FactoryRegistry::with_options(options);
/// assert_eq!(registry.options().log_prefix, "[audio]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RegistryOptions {
    /// Diagnostic label for the registry
    pub label: Option<String>,
    /// Attach a [`LoggingObserver`](crate::LoggingObserver) when building
    pub log_events: bool,
    /// Prefix used by the attached logging observer
    pub log_prefix: String,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            label: None,
            log_events: false,
            log_prefix: DEFAULT_LOG_PREFIX.to_string(),
        }
    }
}

impl RegistryOptions {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }

    pub fn with_log_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_prefix = prefix.into();
        self
    }

    /// Reads options from `FERROUS_FACTORY_*` environment variables.
    ///
    /// Unset variables keep their defaults. `FERROUS_FACTORY_LOG` accepts
    /// `1/0`, `true/false`, `yes/no` and `on/off` (case-insensitive).
    pub fn from_env() -> FactoryResult<Self> {
        let mut options = Self::default();

        if let Ok(value) = env::var(ENV_LOG) {
            options.log_events = parse_flag(&value)
                .ok_or_else(|| FactoryError::Config(format!("{}={} is not a boolean", ENV_LOG, value)))?;
        }
        if let Ok(prefix) = env::var(ENV_LOG_PREFIX) {
            options.log_prefix = prefix;
        }
        if let Ok(label) = env::var(ENV_LABEL) {
            if !label.is_empty() {
                options.label = Some(label);
            }
        }

        Ok(options)
    }

    /// Parses options from JSON. Missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> FactoryResult<Self> {
        serde_json::from_str(json).map_err(|e| FactoryError::Config(e.to_string()))
    }

    #[cfg(feature = "config")]
    pub fn to_json_string(&self) -> FactoryResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FactoryError::Config(e.to_string()))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
