//! Validation issues reported by the static validator

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    /// Advisory; does not block transformation
    Warning,
    /// Blocking; the source must not be transformed
    Error,
}

impl IssueLevel {
    /// Lowercase wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueLevel::Warning => "warning",
            IssueLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for IssueLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding in a source text
///
/// `index` and `length` are byte offsets into the UTF-8 source. Issues
/// without a precise location (empty source, syntax errors) use the
/// sentinel span `0..1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Human-readable message
    pub message: String,
    /// Byte offset of the finding
    pub index: usize,
    /// Byte length of the finding, always positive
    pub length: usize,
    /// Severity
    pub level: IssueLevel,
}

impl ValidationIssue {
    /// Error issue at the sentinel position
    #[inline]
    #[must_use]
    pub fn error_at_start(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            index: 0,
            length: 1,
            level: IssueLevel::Error,
        }
    }

    /// Warning issue covering a matched byte range
    #[inline]
    #[must_use]
    pub fn warning(message: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            message: message.into(),
            index: span.start,
            length: span.len().max(1),
            level: IssueLevel::Warning,
        }
    }

    /// Byte range covered by this issue
    #[inline]
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.index..self.index + self.length
    }

    /// Check if this issue blocks transformation
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_span() {
        let issue = ValidationIssue::error_at_start("Source is empty.");
        assert_eq!(issue.span(), 0..1);
        assert!(issue.is_error());
    }

    #[test]
    fn serializes_lowercase_level() {
        let issue = ValidationIssue::warning("w", 3..7);
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"message": "w", "index": 3, "length": 4, "level": "warning"})
        );
    }
}
