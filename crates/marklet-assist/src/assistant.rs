//! Guarded entry point for generation requests

use crate::error::AssistError;
use crate::mock::MockGenerator;
use crate::provider::CodeGenerator;
use crate::types::GenerationRequest;
use marklet_core::{AiResponse, GuardrailGate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Block reason when no provider is configured
pub const DISABLED_REASON: &str = "AI provider is disabled.";

/// Configured provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Generation disabled
    #[default]
    None,
    /// Offline canned snippets
    Mock,
}

/// Assist configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Provider to use
    pub provider: ProviderKind,
}

/// Provider plus guardrail gate
///
/// Every code response passes the gate with the request's size limit before
/// it is returned; explanations pass through unchanged.
#[derive(Clone)]
pub struct Assistant {
    provider: Option<Arc<dyn CodeGenerator>>,
    gate: GuardrailGate,
}

impl Assistant {
    /// Wrap a provider
    #[must_use]
    pub fn new(provider: Arc<dyn CodeGenerator>, gate: GuardrailGate) -> Self {
        Self {
            provider: Some(provider),
            gate,
        }
    }

    /// Assistant that blocks every request
    #[must_use]
    pub fn disabled(gate: GuardrailGate) -> Self {
        Self {
            provider: None,
            gate,
        }
    }

    /// Build from configuration
    #[must_use]
    pub fn from_config(config: AssistConfig, gate: GuardrailGate) -> Self {
        match config.provider {
            ProviderKind::None => Self::disabled(gate),
            ProviderKind::Mock => Self::new(Arc::new(MockGenerator), gate),
        }
    }

    /// Whether a provider is configured
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Answer a request with guarded output
    ///
    /// # Errors
    /// Returns error if the provider fails
    pub async fn request(&self, request: &GenerationRequest) -> Result<AiResponse, AssistError> {
        let Some(provider) = &self.provider else {
            return Ok(AiResponse::blocked(DISABLED_REASON));
        };

        let response = provider.generate(request).await?;
        let guarded = match response {
            AiResponse::Code { code, .. } => {
                self.gate.check_with_limit(&code, request.options.max_chars)
            }
            other => other,
        };

        if let Some(reason) = guarded.block_reason() {
            tracing::info!(provider = provider.name(), reason, "generated code blocked");
        }
        Ok(guarded)
    }
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("gate", &self.gate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_blocks() {
        let assistant = Assistant::from_config(AssistConfig::default(), GuardrailGate::default());
        let response = assistant
            .request(&GenerationRequest::generate("anything"))
            .await
            .unwrap();
        assert_eq!(response, AiResponse::blocked(DISABLED_REASON));
    }

    #[test]
    fn provider_kind_wire_names() {
        let config: AssistConfig = serde_json::from_str(r#"{"provider":"mock"}"#).unwrap();
        assert_eq!(config.provider, ProviderKind::Mock);
    }
}
