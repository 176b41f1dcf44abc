//! Offline generator with canned snippets

use crate::error::AssistError;
use crate::provider::CodeGenerator;
use crate::types::{GenerationRequest, Intent};
use async_trait::async_trait;
use marklet_core::AiResponse;

const OUTLINE_LINKS: &str = r"(() => {
  document.querySelectorAll('a').forEach(link => {
    link.style.outline = '2px solid #f97316'
  })
})()";

const LIST_HEADINGS: &str = r"(() => {
  const headings = Array.from(document.querySelectorAll('h1,h2,h3'))
    .map(h => h.textContent?.trim())
    .filter(Boolean)
  console.log(headings.join('\n'))
})()";

const OUTLINE_IMAGES: &str = r"(() => {
  document.querySelectorAll('img').forEach(img => {
    img.style.outline = '2px solid #3b82f6'
  })
})()";

/// Pick a snippet by prompt keyword
#[must_use]
pub fn pick_snippet(prompt: &str) -> &'static str {
    let lowered = prompt.to_lowercase();
    if lowered.contains("heading") {
        LIST_HEADINGS
    } else if lowered.contains("image") {
        OUTLINE_IMAGES
    } else {
        OUTLINE_LINKS
    }
}

/// Describe code by the DOM features it touches
#[must_use]
pub fn explain_code(code: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if code.contains("querySelectorAll") {
        lines.push("Selects elements using querySelectorAll.".to_string());
    }
    if code.contains("style.") {
        lines.push("Applies inline styles to matched elements.".to_string());
    }
    if code.contains("console.log") {
        lines.push("Logs results to the console.".to_string());
    }
    if lines.is_empty() {
        lines.push("Runs a small DOM manipulation in the page context.".to_string());
    }
    lines
}

/// Generator that never leaves the process
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGenerator;

#[async_trait]
impl CodeGenerator for MockGenerator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<AiResponse, AssistError> {
        Ok(match request.intent {
            Intent::Generate => AiResponse::Code {
                code: pick_snippet(&request.prompt).to_string(),
                warnings: Vec::new(),
            },
            Intent::Explain => AiResponse::Explanation {
                explanation: explain_code(request.source_code.as_deref().unwrap_or_default()),
            },
        })
    }
}
