//! Widget configuration
//!
//! Defaults mirror a plain HTML `<select>`: empty placeholder, one second
//! of refresh debounce, search reset on close. Hosts that bind
//! configuration from string attributes go through [`SelectConfig::apply_attr`],
//! which coerces and validates the raw values.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while applying configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Attribute value failed to coerce to its expected type
    #[error("Invalid value '{value}' for attribute '{attr}'")]
    InvalidAttr {
        /// Attribute name
        attr: String,
        /// Offending raw value
        value: String,
    },
    /// Attribute is not a configuration the widget knows
    #[error("Unknown configuration attribute '{0}'")]
    UnknownAttr(String),
}

impl ConfigError {
    /// Short machine-readable cause code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        "config"
    }
}

/// Widget configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectConfig {
    /// Placeholder shown when nothing is selected. Empty by default, like
    /// the HTML `<select>` tag.
    pub placeholder: String,
    /// Debounce window for refresh triggers, in milliseconds.
    pub refresh_delay_ms: u64,
    /// Whether closing/opening resets the search input.
    pub reset_search_input: bool,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            placeholder: String::new(),
            refresh_delay_ms: 1000,
            reset_search_input: true,
        }
    }
}

impl SelectConfig {
    /// The refresh debounce window.
    #[must_use]
    pub const fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    /// Apply a raw string attribute, coercing it to the typed field.
    ///
    /// # Errors
    /// Fails when the attribute is unknown or its value does not coerce.
    pub fn apply_attr(&mut self, attr: &str, value: &str) -> Result<(), ConfigError> {
        match attr {
            "placeholder" => {
                self.placeholder = value.to_string();
                Ok(())
            }
            "refresh-delay" => {
                self.refresh_delay_ms =
                    value.trim().parse().map_err(|_| ConfigError::InvalidAttr {
                        attr: attr.to_string(),
                        value: value.to_string(),
                    })?;
                Ok(())
            }
            "reset-search-input" => {
                self.reset_search_input =
                    value.trim().parse().map_err(|_| ConfigError::InvalidAttr {
                        attr: attr.to_string(),
                        value: value.to_string(),
                    })?;
                Ok(())
            }
            _ => Err(ConfigError::UnknownAttr(attr.to_string())),
        }
    }
}
