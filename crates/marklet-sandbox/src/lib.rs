//! Marklet Sandbox
//!
//! Isolated preview execution for bookmarklet sources, as seen from the host.
//!
//! # Components
//!
//! - [`document`]: builds the self-contained preview document and frame markup
//! - [`protocol`]: the single message shape a realm may post
//! - [`bridge`]: accepts messages from the live realm only
//! - [`console`]: bounded FIFO log of accepted output
//! - [`session`]: realm lifecycle (load, reload, teardown)
//!
//! # Example
//!
//! ```rust
//! use marklet_sandbox::{InboundMessage, PreviewSession};
//! use serde_json::json;
//!
//! let mut session = PreviewSession::default();
//! let realm = session.load("console.log('hi')").realm;
//!
//! let posted = json!({"type": "bookmarklet-console", "level": "log", "payload": "hi"});
//! session.bridge().on_message(InboundMessage::new(realm, posted));
//! assert_eq!(session.bridge().log().export_text(None), "[log] hi");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod bridge;
pub mod console;
pub mod document;
pub mod protocol;
pub mod session;

// Re-exports
pub use bridge::{channel, HostBridge, InboundMessage, RealmId};
pub use console::{ConsoleConfig, ConsoleLog, ConsoleLogEntry};
pub use document::{
    build_document, escape_html, iframe_markup, CONTENT_SECURITY_POLICY, SANDBOX_ATTRIBUTES,
};
pub use protocol::{ConsoleLevel, ProtocolError, RuntimeEvent, SandboxMessage, CHANNEL_TAG};
pub use session::{LoadedPreview, PreviewConfig, PreviewSession};
