//! Marklet
//!
//! Author, check, package and preview bookmarklets.
//!
//! # Pipeline
//!
//! ```text
//! source ─→ validate ─→ generate (minify + encode) ─→ javascript: link
//!    │
//!    └────→ build_document ─→ sandboxed realm ─→ HostBridge ─→ ConsoleLog
//!
//! prompt ─→ Assistant ─→ provider ─→ guard ─→ draft source
//! ```
//!
//! # Example
//!
//! ```rust
//! use marklet::{Draft, WorkbenchError};
//!
//! let mut draft = Draft::new("document.cookie.split(';').forEach(c => console.log(c))");
//! let link = draft.build_link().unwrap();
//! assert!(link.bookmarklet.starts_with("javascript:"));
//!
//! assert_eq!(draft.ready_to_save(), Err(WorkbenchError::WarningsNotAcknowledged));
//! draft.acknowledge_warnings();
//! assert!(draft.ready_to_save().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod workbench;

pub use marklet_assist as assist;
pub use marklet_sandbox as sandbox;
pub use marklet_transform as transform;

pub use config::MarkletConfig;
pub use error::{ConfigError, WorkbenchError};
pub use marklet_core::{
    guard, validate, AiResponse, GuardConfig, GuardrailGate, IssueLevel, ValidationIssue,
};
pub use marklet_transform::{generate, GeneratorResult};
pub use workbench::{Draft, Workbench};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
