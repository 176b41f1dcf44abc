//! Generator backed by a text-completion service
//!
//! Transport is behind [`CompletionBackend`]; this module only builds the
//! prompts and shapes the reply.

use crate::error::AssistError;
use crate::provider::CodeGenerator;
use crate::text::{strip_code_fences, to_bullet_lines};
use crate::types::{Category, GenerationRequest, Intent, Tone};
use async_trait::async_trait;
use marklet_core::AiResponse;

const GENERATE_SYSTEM: &str = "You write bookmarklets: one self-contained JavaScript \
snippet that runs in the current page. Reply with code only. Never use eval, \
new Function, fetch or XMLHttpRequest, and do not read cookies or storage.";

const EXPLAIN_SYSTEM: &str = "Explain what the given bookmarklet does as short \
bullet points, one per line.";

/// Prompt pair sent to a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPrompt {
    /// Instructions
    pub system: String,
    /// Author content
    pub user: String,
}

/// Black-box completion service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Complete a prompt
    async fn complete(&self, prompt: CompletionPrompt) -> Result<String, AssistError>;
}

/// [`CodeGenerator`] over a completion backend
#[derive(Debug, Clone)]
pub struct CompletionGenerator<B> {
    backend: B,
}

impl<B: CompletionBackend> CompletionGenerator<B> {
    /// Wrap a backend
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Build the prompt for a request
    ///
    /// # Errors
    /// Returns error if the request has no prompt or no source to explain
    pub fn prompt_for(request: &GenerationRequest) -> Result<CompletionPrompt, AssistError> {
        match request.intent {
            Intent::Generate => {
                let prompt = request.prompt.trim();
                if prompt.is_empty() {
                    return Err(AssistError::EmptyPrompt);
                }
                let mut system = GENERATE_SYSTEM.to_string();
                if let Some(category) = request.options.category {
                    system.push_str(&format!(" Focus: {}.", category_hint(category)));
                }
                if let Some(max_chars) = request.options.max_chars {
                    system.push_str(&format!(" Keep it under {max_chars} characters."));
                }
                Ok(CompletionPrompt {
                    system,
                    user: prompt.to_string(),
                })
            }
            Intent::Explain => {
                let source = request
                    .source_code
                    .as_deref()
                    .map(str::trim)
                    .filter(|source| !source.is_empty())
                    .ok_or(AssistError::MissingSource)?;
                let mut system = EXPLAIN_SYSTEM.to_string();
                if request.options.tone == Some(Tone::Detailed) {
                    system.push_str(" Cover each step.");
                } else {
                    system.push_str(" At most four points.");
                }
                Ok(CompletionPrompt {
                    system,
                    user: source.to_string(),
                })
            }
        }
    }
}

fn category_hint(category: Category) -> &'static str {
    match category {
        Category::Dom => "page structure and styling",
        Category::Seo => "page metadata",
        Category::Content => "page text and media",
        Category::Debug => "debugging output in the console",
    }
}

#[async_trait]
impl<B: CompletionBackend> CodeGenerator for CompletionGenerator<B> {
    fn name(&self) -> &'static str {
        "completion"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<AiResponse, AssistError> {
        let prompt = Self::prompt_for(request)?;
        let reply = self.backend.complete(prompt).await?;

        match request.intent {
            Intent::Generate => {
                let code = strip_code_fences(&reply);
                if code.is_empty() {
                    return Err(AssistError::EmptyCompletion);
                }
                Ok(AiResponse::Code {
                    code: code.to_string(),
                    warnings: Vec::new(),
                })
            }
            Intent::Explain => {
                let explanation = to_bullet_lines(&reply);
                if explanation.is_empty() {
                    return Err(AssistError::EmptyCompletion);
                }
                Ok(AiResponse::Explanation { explanation })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::function;

    #[tokio::test]
    async fn generate_strips_fences() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .with(function(|prompt: &CompletionPrompt| {
                prompt.user == "outline links" && prompt.system.contains("under 300")
            }))
            .times(1)
            .returning(|_| Ok("```javascript\nalert(1)\n```".to_string()));

        let generator = CompletionGenerator::new(backend);
        let request = GenerationRequest::generate("outline links").with_max_chars(300);
        let response = generator.generate(&request).await.unwrap();
        assert_eq!(response.code(), Some("alert(1)"));
    }

    #[tokio::test]
    async fn explain_splits_bullets() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .returning(|_| Ok("- Finds links.\n- Outlines them.".to_string()));

        let generator = CompletionGenerator::new(backend);
        let response = generator
            .generate(&GenerationRequest::explain("x()"))
            .await
            .unwrap();
        assert_eq!(
            response.explanation(),
            Some(&["Finds links.".to_string(), "Outlines them.".to_string()][..])
        );
    }

    #[tokio::test]
    async fn empty_prompt_never_reaches_backend() {
        let mut backend = MockCompletionBackend::new();
        backend.expect_complete().never();

        let generator = CompletionGenerator::new(backend);
        let err = generator
            .generate(&GenerationRequest::generate("   "))
            .await
            .unwrap_err();
        assert_eq!(err, AssistError::EmptyPrompt);
    }

    #[tokio::test]
    async fn backend_errors_propagate() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .returning(|_| Err(AssistError::Backend("timeout".to_string())));

        let generator = CompletionGenerator::new(backend);
        let err = generator
            .generate(&GenerationRequest::generate("x"))
            .await
            .unwrap_err();
        assert_eq!(err, AssistError::Backend("timeout".to_string()));
    }
}
