//! Error types for generation assist

/// Generation failures
///
/// Guardrail blocks are not errors; they arrive as
/// [`AiResponse::Blocked`](marklet_core::AiResponse::Blocked).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistError {
    /// Generate request without a prompt
    #[error("prompt is empty")]
    EmptyPrompt,

    /// Explain request without source code
    #[error("no source code to explain")]
    MissingSource,

    /// Completion backend failed
    #[error("completion backend error: {0}")]
    Backend(String),

    /// Backend answered with nothing usable
    #[error("completion was empty")]
    EmptyCompletion,
}
