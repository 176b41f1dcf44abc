//! Draft authoring workflow
//!
//! A [`Draft`] tracks one source through build and save:
//!
//! - a link is built only when the source has no error-level issue
//! - saving needs a link, and an explicit acknowledgement whenever the
//!   source carries warnings
//! - any edit invalidates both the link and the acknowledgement
//!
//! [`Workbench`] adds the configured collaborators around a draft: the link
//! cache, the preview session and the assistant.

use crate::config::MarkletConfig;
use crate::error::WorkbenchError;
use marklet_assist::{Assistant, GenerationRequest};
use marklet_core::{validate, AiResponse, IssueLevel, ValidationIssue};
use marklet_sandbox::{HostBridge, LoadedPreview, PreviewSession};
use marklet_transform::{generate, GeneratorResult, LinkCache};
use std::sync::Arc;

/// One bookmarklet being authored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    source: String,
    link: Option<GeneratorResult>,
    acknowledged: bool,
}

impl Draft {
    /// Start a draft from source text
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            link: None,
            acknowledged: false,
        }
    }

    /// Current source
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace the source; a changed source drops the link and acknowledgement
    pub fn set_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        if source != self.source {
            self.source = source;
            self.link = None;
            self.acknowledged = false;
        }
    }

    /// Validator issues for the current source
    #[must_use]
    pub fn issues(&self) -> Vec<ValidationIssue> {
        validate(&self.source)
    }

    /// Warning-level issues only
    #[must_use]
    pub fn warnings(&self) -> Vec<ValidationIssue> {
        self.issues()
            .into_iter()
            .filter(|issue| issue.level == IssueLevel::Warning)
            .collect()
    }

    /// Last built link
    #[inline]
    #[must_use]
    pub fn link(&self) -> Option<&GeneratorResult> {
        self.link.as_ref()
    }

    /// Whether the warnings were acknowledged
    #[inline]
    #[must_use]
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Build the link
    ///
    /// # Errors
    /// Returns [`WorkbenchError::HasErrors`] if any issue is error-level
    pub fn build_link(&mut self) -> Result<&GeneratorResult, WorkbenchError> {
        self.build_with(|source| generate(source))
    }

    /// Build the link through a cache
    ///
    /// # Errors
    /// Returns [`WorkbenchError::HasErrors`] if any issue is error-level
    pub fn build_link_cached(
        &mut self,
        cache: &LinkCache,
    ) -> Result<&GeneratorResult, WorkbenchError> {
        self.build_with(|source| (*cache.generate(source)).clone())
    }

    fn build_with(
        &mut self,
        build: impl FnOnce(&str) -> GeneratorResult,
    ) -> Result<&GeneratorResult, WorkbenchError> {
        let count = self.issues().iter().filter(|issue| issue.is_error()).count();
        if count > 0 {
            return Err(WorkbenchError::HasErrors { count });
        }
        Ok(self.link.insert(build(&self.source)))
    }

    /// Insert generated code into the draft
    ///
    /// Returns the warnings the gate attached to the code.
    ///
    /// # Errors
    /// Returns error for blocked responses and explanations
    pub fn accept_generated(&mut self, response: AiResponse) -> Result<Vec<String>, WorkbenchError> {
        match response {
            AiResponse::Code { code, warnings } => {
                self.source = code;
                self.link = None;
                self.acknowledged = false;
                Ok(warnings)
            }
            AiResponse::Blocked { block_reason } => Err(WorkbenchError::Blocked(block_reason)),
            AiResponse::Explanation { .. } => Err(WorkbenchError::NotCode),
        }
    }

    /// Acknowledge the current warnings
    pub fn acknowledge_warnings(&mut self) {
        self.acknowledged = true;
    }

    /// Check the save preconditions
    ///
    /// # Errors
    /// Returns error if no link was built or warnings are unacknowledged
    pub fn ready_to_save(&self) -> Result<(), WorkbenchError> {
        if self.link.is_none() {
            return Err(WorkbenchError::NotGenerated);
        }
        if !self.acknowledged && !self.warnings().is_empty() {
            return Err(WorkbenchError::WarningsNotAcknowledged);
        }
        Ok(())
    }
}

/// Draft plus its configured collaborators
#[derive(Debug)]
pub struct Workbench {
    config: MarkletConfig,
    draft: Draft,
    cache: LinkCache,
    session: PreviewSession,
    assistant: Assistant,
}

impl Workbench {
    /// Create workbench from configuration
    #[must_use]
    pub fn new(config: MarkletConfig) -> Self {
        let bridge = Arc::new(HostBridge::new(Arc::new(config.console_log())));
        Self {
            config,
            draft: Draft::default(),
            cache: LinkCache::default(),
            session: PreviewSession::new(bridge, config.preview),
            assistant: config.assistant(),
        }
    }

    /// Replace the assistant
    #[must_use]
    pub fn with_assistant(mut self, assistant: Assistant) -> Self {
        self.assistant = assistant;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MarkletConfig {
        &self.config
    }

    /// Current draft
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Current draft, mutably
    #[inline]
    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// Preview session
    #[inline]
    #[must_use]
    pub fn session(&self) -> &PreviewSession {
        &self.session
    }

    /// Build the draft's link through the cache
    ///
    /// # Errors
    /// Returns error if the source has error-level issues
    pub fn build_link(&mut self) -> Result<&GeneratorResult, WorkbenchError> {
        self.draft.build_link_cached(&self.cache)
    }

    /// Load the draft into a fresh preview realm
    pub fn preview(&mut self) -> &LoadedPreview {
        self.session.load(&self.draft.source)
    }

    /// Ask the assistant; code answers are inserted into the draft
    ///
    /// # Errors
    /// Returns error if the provider fails or the answer is blocked
    pub async fn assist(&mut self, request: &GenerationRequest) -> Result<AiResponse, WorkbenchError> {
        let response = self.assistant.request(request).await?;
        if let AiResponse::Code { .. } | AiResponse::Blocked { .. } = &response {
            self.draft.accept_generated(response.clone())?;
        }
        Ok(response)
    }
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(MarkletConfig::default())
    }
}
