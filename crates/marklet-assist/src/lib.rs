//! Marklet Assist
//!
//! Optional code generation and explanation. Providers sit behind the
//! [`CodeGenerator`] trait; [`Assistant`] is the only path that hands
//! generated code to an author, and it runs every code response through the
//! guardrail gate first.
//!
//! # Example
//!
//! ```rust
//! use marklet_assist::{AssistConfig, Assistant, ProviderKind};
//! use marklet_core::GuardrailGate;
//!
//! let config = AssistConfig { provider: ProviderKind::Mock };
//! let assistant = Assistant::from_config(config, GuardrailGate::default());
//! assert!(assistant.is_enabled());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod assistant;
pub mod completion;
pub mod error;
pub mod mock;
pub mod provider;
pub mod text;
pub mod types;

// Re-exports
pub use assistant::{AssistConfig, Assistant, ProviderKind, DISABLED_REASON};
pub use completion::{CompletionBackend, CompletionGenerator, CompletionPrompt};
pub use error::AssistError;
pub use mock::{explain_code, pick_snippet, MockGenerator};
pub use provider::CodeGenerator;
pub use text::{strip_code_fences, to_bullet_lines};
pub use types::{Category, GenerationOptions, GenerationRequest, Intent, Tone};
