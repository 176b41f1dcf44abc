//! Static validator
//!
//! Screens a bookmarklet source for syntax validity and known-risky API
//! usage. Findings are returned as data, never as errors.
//!
//! Issue order is observable: the syntax verdict comes first, then each
//! risk detector in declaration order with its matches left to right. No
//! deduplication or re-sorting happens, even when spans overlap.

use crate::issue::{IssueLevel, ValidationIssue};
use crate::patterns::RISK_PATTERNS;
use crate::syntax;

/// Message for a source that is empty after trimming
pub const EMPTY_SOURCE_MESSAGE: &str = "Source is empty.";

/// Validate a source text
#[must_use]
pub fn validate(source: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if source.trim().is_empty() {
        issues.push(ValidationIssue::error_at_start(EMPTY_SOURCE_MESSAGE));
        return issues;
    }

    if let Err(error) = syntax::check(source) {
        issues.push(ValidationIssue::error_at_start(format!("Syntax error: {error}")));
    }

    for pattern in RISK_PATTERNS.iter() {
        issues.extend(
            pattern
                .regex
                .find_iter(source)
                .map(|m| ValidationIssue::warning(pattern.label, m.range())),
        );
    }

    tracing::trace!(issues = issues.len(), "validated source");
    issues
}

/// Messages of every issue, in reporting order
#[must_use]
pub fn validation_messages(source: &str) -> Vec<String> {
    validate(source).into_iter().map(|issue| issue.message).collect()
}

/// Messages of warning-level issues only
#[must_use]
pub fn warning_messages(source: &str) -> Vec<String> {
    validate(source)
        .into_iter()
        .filter(|issue| issue.level == IssueLevel::Warning)
        .map(|issue| issue.message)
        .collect()
}

/// Check if any issue blocks transformation
#[inline]
#[must_use]
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(ValidationIssue::is_error)
}
