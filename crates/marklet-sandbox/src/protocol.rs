//! Preview message protocol
//!
//! Wire shape posted by the shim:
//!
//! ```json
//! {"type": "bookmarklet-console", "level": "log", "payload": "hi"}
//! ```
//!
//! Parsing is strict: unknown `type`, unknown `level` or a non-string
//! `payload` make the message malformed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value of the `type` field on every preview message
pub const CHANNEL_TAG: &str = "bookmarklet-console";

/// Console severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    /// `console.log`
    Log,
    /// `console.info` and dialog calls
    Info,
    /// `console.warn`
    Warn,
    /// `console.error` and runtime faults
    Error,
}

impl ConsoleLevel {
    /// All levels in display order
    pub const ALL: [Self; 4] = [Self::Log, Self::Info, Self::Warn, Self::Error];

    /// Wire name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsoleLevel {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownLevel(s.to_string()))
    }
}

/// Message posted by a preview realm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SandboxMessage {
    /// Console output, dialog text or a runtime fault
    #[serde(rename = "bookmarklet-console")]
    Console {
        /// Severity
        level: ConsoleLevel,
        /// Formatted text
        payload: String,
    },
}

impl SandboxMessage {
    /// Parse a posted value
    ///
    /// # Errors
    /// Returns error if the value does not match the wire shape
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProtocolError> {
        serde_json::from_value(value).map_err(|err| ProtocolError::Malformed(err.to_string()))
    }
}

/// Accepted console event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEvent {
    /// Severity
    pub level: ConsoleLevel,
    /// Formatted text
    pub payload: String,
}

impl From<SandboxMessage> for RuntimeEvent {
    fn from(message: SandboxMessage) -> Self {
        match message {
            SandboxMessage::Console { level, payload } => Self { level, payload },
        }
    }
}

impl From<RuntimeEvent> for SandboxMessage {
    fn from(event: RuntimeEvent) -> Self {
        Self::Console {
            level: event.level,
            payload: event.payload,
        }
    }
}

/// Protocol errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Value does not match the wire shape
    #[error("malformed preview message: {0}")]
    Malformed(String),

    /// Level name is not one of log, info, warn, error
    #[error("unknown console level: {0}")]
    UnknownLevel(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_console_message() {
        let message = SandboxMessage::from_value(json!({
            "type": "bookmarklet-console",
            "level": "log",
            "payload": "hi",
        }))
        .unwrap();
        assert_eq!(
            RuntimeEvent::from(message),
            RuntimeEvent {
                level: ConsoleLevel::Log,
                payload: "hi".to_string()
            }
        );
    }

    #[test]
    fn rejects_foreign_shapes() {
        for value in [
            json!({"type": "other", "level": "log", "payload": "x"}),
            json!({"type": "bookmarklet-console", "level": "debug", "payload": "x"}),
            json!({"type": "bookmarklet-console", "level": "", "payload": "x"}),
            json!({"type": "bookmarklet-console", "level": "log", "payload": 3}),
            json!({"type": "bookmarklet-console", "level": "log"}),
            json!("bookmarklet-console"),
        ] {
            assert!(SandboxMessage::from_value(value).is_err());
        }
    }

    #[test]
    fn level_names_round_trip() {
        for level in ConsoleLevel::ALL {
            assert_eq!(level.as_str().parse::<ConsoleLevel>().unwrap(), level);
        }
        assert!("trace".parse::<ConsoleLevel>().is_err());
    }

    #[test]
    fn serializes_wire_shape() {
        let message = SandboxMessage::from(RuntimeEvent {
            level: ConsoleLevel::Error,
            payload: "boom".to_string(),
        });
        assert_eq!(
            serde_json::to_value(message).unwrap(),
            json!({"type": "bookmarklet-console", "level": "error", "payload": "boom"})
        );
    }
}
