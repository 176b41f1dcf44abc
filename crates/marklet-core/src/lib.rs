//! Marklet Core
//!
//! Static screening for bookmarklet sources and the guardrail applied to
//! machine-produced candidate code.
//!
//! # Components
//!
//! - [`validate`]: syntax check plus fixed-order risk detectors, returned as data
//! - [`guard`] / [`GuardrailGate`]: size and hard-ban gate producing an [`AiResponse`]
//! - [`syntax`]: tree-sitter backed parse-only check shared with the minifier
//!
//! # Example
//!
//! ```rust
//! use marklet_core::{guard, validate, IssueLevel};
//!
//! let issues = validate("eval('1')");
//! assert_eq!(issues.len(), 1);
//! assert_eq!(issues[0].level, IssueLevel::Warning);
//! assert_eq!(issues[0].index, 0);
//!
//! let response = guard("fetch('/x')", None);
//! assert_eq!(response.block_reason(), Some("Output contains a banned API."));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod guard;
pub mod issue;
pub mod patterns;
pub mod response;
pub mod syntax;
pub mod validator;

// Re-exports for convenience
pub use guard::{guard, GuardConfig, GuardrailGate, BANNED_API_REASON, DEFAULT_MAX_CHARS};
pub use issue::{IssueLevel, ValidationIssue};
pub use response::{AiResponse, ResponseShapeError};
pub use syntax::SyntaxError;
pub use validator::{
    has_errors, validate, validation_messages, warning_messages, EMPTY_SOURCE_MESSAGE,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for screening bookmarklet sources
    pub use crate::{
        guard, validate, AiResponse, GuardConfig, GuardrailGate, IssueLevel, ValidationIssue,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
