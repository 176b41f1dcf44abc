//! Error types for the authoring facade

use marklet_assist::AssistError;
use std::path::PathBuf;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted field name
        field: &'static str,
        /// What is wrong
        reason: &'static str,
    },
}

/// Draft workflow errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkbenchError {
    /// Source has error-level issues; no link is built
    #[error("source has {count} error(s); fix them before generating")]
    HasErrors {
        /// Number of error-level issues
        count: usize,
    },

    /// Generated output was blocked
    #[error("generated output blocked: {0}")]
    Blocked(String),

    /// Response carries no code to insert
    #[error("response contains no code")]
    NotCode,

    /// Save attempted before a link was generated
    #[error("generate first")]
    NotGenerated,

    /// Save attempted with unacknowledged warnings
    #[error("acknowledge warnings")]
    WarningsNotAcknowledged,

    /// Generation request failed
    #[error(transparent)]
    Assist(#[from] AssistError),
}
