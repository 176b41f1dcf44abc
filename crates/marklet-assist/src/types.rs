//! Generation request types

use serde::{Deserialize, Serialize};

/// What the author asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// New code from a prompt
    Generate,
    /// Explanation of existing code
    Explain,
}

/// Kind of bookmarklet requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Page structure and styling
    Dom,
    /// Metadata inspection
    Seo,
    /// Text and media
    Content,
    /// Debugging aids
    Debug,
}

/// Explanation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Short answers
    Concise,
    /// Longer answers
    Detailed,
}

/// Optional request tuning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationOptions {
    /// Requested category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Guard limit for returned code, in characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
    /// Requested tone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
}

/// Request sent to a code generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Requested operation
    pub intent: Intent,
    /// Free-form author prompt
    #[serde(default)]
    pub prompt: String,
    /// Code to explain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_code: Option<String>,
    /// Tuning
    #[serde(default)]
    pub options: GenerationOptions,
}

impl GenerationRequest {
    /// Request new code
    #[must_use]
    pub fn generate(prompt: impl Into<String>) -> Self {
        Self {
            intent: Intent::Generate,
            prompt: prompt.into(),
            source_code: None,
            options: GenerationOptions::default(),
        }
    }

    /// Request an explanation of `source`
    #[must_use]
    pub fn explain(source: impl Into<String>) -> Self {
        Self {
            intent: Intent::Explain,
            prompt: String::new(),
            source_code: Some(source.into()),
            options: GenerationOptions::default(),
        }
    }

    /// Set guard limit
    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.options.max_chars = Some(max_chars);
        self
    }

    /// Set category
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.options.category = Some(category);
        self
    }

    /// Set tone
    #[must_use]
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.options.tone = Some(tone);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_request() {
        let request: GenerationRequest = serde_json::from_str(
            r#"{"intent":"generate","prompt":"outline images","options":{"maxChars":500,"tone":"concise"}}"#,
        )
        .unwrap();
        assert_eq!(
            request,
            GenerationRequest::generate("outline images")
                .with_max_chars(500)
                .with_tone(Tone::Concise)
        );
    }

    #[test]
    fn explain_carries_source() {
        let request = GenerationRequest::explain("alert(1)");
        assert_eq!(request.intent, Intent::Explain);
        assert_eq!(request.source_code.as_deref(), Some("alert(1)"));
    }
}
