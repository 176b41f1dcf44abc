//! Generation responses
//!
//! [`AiResponse`] is a closed sum type. Its wire form is the flat object the
//! authoring surface expects (`{code, warnings}`, `{explanation}` or
//! `{blocked: true, blockReason}`); deserialization rejects objects that
//! populate more than one variant.

use serde::{Deserialize, Serialize};

/// Result of a guardrail check or a generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireResponse", try_from = "WireResponse")]
pub enum AiResponse {
    /// Code that may be offered to the author, with advisory warnings
    Code {
        /// Candidate code
        code: String,
        /// Warning-level validator messages for `code`
        warnings: Vec<String>,
    },
    /// Plain-language explanation lines
    Explanation {
        /// Explanation lines, in order
        explanation: Vec<String>,
    },
    /// Blocked output; carries no code or explanation
    Blocked {
        /// Reason shown to the author
        block_reason: String,
    },
}

impl AiResponse {
    /// Create a blocked response
    #[inline]
    #[must_use]
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self::Blocked {
            block_reason: reason.into(),
        }
    }

    /// Check if the response is blocked
    #[inline]
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    /// Get code, if this is a code response
    #[inline]
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Code { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Get warnings (empty for non-code responses)
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Code { warnings, .. } => warnings,
            _ => &[],
        }
    }

    /// Get explanation lines, if this is an explanation
    #[inline]
    #[must_use]
    pub fn explanation(&self) -> Option<&[String]> {
        match self {
            Self::Explanation { explanation } => Some(explanation),
            _ => None,
        }
    }

    /// Get block reason, if blocked
    #[inline]
    #[must_use]
    pub fn block_reason(&self) -> Option<&str> {
        match self {
            Self::Blocked { block_reason } => Some(block_reason),
            _ => None,
        }
    }
}

/// Rejected wire shapes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseShapeError {
    /// `blocked` set alongside `code` or `explanation`
    #[error("blocked response must not carry code or explanation")]
    BlockedWithPayload,

    /// `blocked` set with no `blockReason`
    #[error("blocked response is missing blockReason")]
    MissingBlockReason,

    /// `blockReason` present while `blocked` is false
    #[error("blockReason given without blocked flag")]
    UnexpectedBlockReason,

    /// Both `code` and `explanation` present
    #[error("response carries both code and explanation")]
    AmbiguousPayload,

    /// None of the three shapes
    #[error("response carries no code, explanation or block")]
    Empty,
}

/// Flat wire representation
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    block_reason: Option<String>,
}

impl From<AiResponse> for WireResponse {
    fn from(response: AiResponse) -> Self {
        match response {
            AiResponse::Code { code, warnings } => Self {
                code: Some(code),
                warnings: Some(warnings),
                ..Self::default()
            },
            AiResponse::Explanation { explanation } => Self {
                explanation: Some(explanation),
                ..Self::default()
            },
            AiResponse::Blocked { block_reason } => Self {
                blocked: true,
                block_reason: Some(block_reason),
                ..Self::default()
            },
        }
    }
}

impl TryFrom<WireResponse> for AiResponse {
    type Error = ResponseShapeError;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        if wire.blocked {
            if wire.code.is_some() || wire.explanation.is_some() || wire.warnings.is_some() {
                return Err(ResponseShapeError::BlockedWithPayload);
            }
            let block_reason = wire.block_reason.ok_or(ResponseShapeError::MissingBlockReason)?;
            return Ok(Self::Blocked { block_reason });
        }

        if wire.block_reason.is_some() {
            return Err(ResponseShapeError::UnexpectedBlockReason);
        }

        match (wire.code, wire.explanation) {
            (Some(_), Some(_)) => Err(ResponseShapeError::AmbiguousPayload),
            (Some(code), None) => Ok(Self::Code {
                code,
                warnings: wire.warnings.unwrap_or_default(),
            }),
            (None, Some(explanation)) => Ok(Self::Explanation { explanation }),
            (None, None) => Err(ResponseShapeError::Empty),
        }
    }
}
