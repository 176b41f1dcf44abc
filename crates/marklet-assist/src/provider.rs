//! Code generator seam

use crate::error::AssistError;
use crate::types::GenerationRequest;
use async_trait::async_trait;
use marklet_core::AiResponse;

/// Anything that can answer a generation request
///
/// Implementations return raw responses; callers that offer code to the
/// author go through [`Assistant`](crate::Assistant), which applies the
/// guardrail gate.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Answer a request
    async fn generate(&self, request: &GenerationRequest) -> Result<AiResponse, AssistError>;
}
