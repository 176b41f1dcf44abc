//! Workspace configuration
//!
//! Loaded from TOML. Every section and field is optional and falls back to
//! its default:
//!
//! ```toml
//! [guard]
//! max_chars = 4000
//!
//! [console]
//! capacity = 200
//!
//! [assist]
//! provider = "none"   # or "mock"
//!
//! [preview]
//! clear_on_reload = false
//! ```

use crate::error::ConfigError;
use marklet_assist::{AssistConfig, Assistant, ProviderKind};
use marklet_core::{GuardConfig, GuardrailGate};
use marklet_sandbox::{ConsoleConfig, ConsoleLog, PreviewConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkletConfig {
    /// Guardrail limits
    pub guard: GuardConfig,
    /// Console log retention
    pub console: ConsoleConfig,
    /// Generation provider
    pub assist: AssistConfig,
    /// Preview behavior
    pub preview: PreviewConfig,
}

impl MarkletConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With guard limit
    #[inline]
    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.guard.max_chars = max_chars;
        self
    }

    /// With console capacity
    #[inline]
    #[must_use]
    pub fn with_console_capacity(mut self, capacity: usize) -> Self {
        self.console.capacity = capacity;
        self
    }

    /// With provider
    #[inline]
    #[must_use]
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.assist.provider = provider;
        self
    }

    /// With console clearing on reload
    #[inline]
    #[must_use]
    pub fn with_clear_on_reload(mut self, clear: bool) -> Self {
        self.preview.clear_on_reload = clear;
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML or a value is out of range
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns error naming the first out-of-range field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.guard.max_chars == 0 {
            return Err(ConfigError::Invalid {
                field: "guard.max_chars",
                reason: "must be greater than zero",
            });
        }
        if self.console.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "console.capacity",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    /// Gate with the configured limit
    #[must_use]
    pub fn gate(&self) -> GuardrailGate {
        GuardrailGate::new(self.guard)
    }

    /// Empty console log with the configured capacity
    #[must_use]
    pub fn console_log(&self) -> ConsoleLog {
        ConsoleLog::with_config(self.console)
    }

    /// Assistant for the configured provider
    #[must_use]
    pub fn assistant(&self) -> Assistant {
        Assistant::from_config(self.assist, self.gate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_default() {
        assert_eq!(MarkletConfig::from_toml_str("").unwrap(), MarkletConfig::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = MarkletConfig::from_toml_str("[assist]\nprovider = \"mock\"\n").unwrap();
        assert_eq!(config.assist.provider, ProviderKind::Mock);
        assert_eq!(config.guard.max_chars, 4000);
        assert_eq!(config.console.capacity, 200);
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = MarkletConfig::from_toml_str("[guard]\nmax_chars = 0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for guard.max_chars: must be greater than zero"
        );
        assert!(MarkletConfig::new().with_console_capacity(0).validate().is_err());
    }

    #[test]
    fn unknown_provider_is_a_parse_error() {
        let err = MarkletConfig::from_toml_str("[assist]\nprovider = \"cloud\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_round_trip() {
        let config = MarkletConfig::new()
            .with_max_chars(1200)
            .with_clear_on_reload(true);
        let text = config.to_toml_string().unwrap();
        assert_eq!(MarkletConfig::from_toml_str(&text).unwrap(), config);
    }
}
