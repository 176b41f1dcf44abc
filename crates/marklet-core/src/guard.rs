//! Guardrail gate for generated candidate code
//!
//! Applied only to code produced by an external generator, never to the
//! author's own source. Checks run in a fixed order:
//!
//! 1. length limit (characters), before any pattern scan
//! 2. hard-ban list ([`BANNED_PATTERNS`](crate::patterns::BANNED_PATTERNS))
//! 3. advisory warnings from the validator
//!
//! The gate is pure, so running it on its own accepted output yields the
//! same response.

use crate::patterns::contains_banned_api;
use crate::response::AiResponse;
use crate::validator::warning_messages;
use serde::{Deserialize, Serialize};

/// Default candidate size limit, in Unicode scalar values
pub const DEFAULT_MAX_CHARS: usize = 4000;

/// Block reason for hard-ban matches
pub const BANNED_API_REASON: &str = "Output contains a banned API.";

/// Gate a candidate with an optional size limit
///
/// Length is the number of Unicode scalar values (`str::chars`), not UTF-16
/// code units, so a character outside the Basic Multilingual Plane counts
/// once. The limit defaults to [`DEFAULT_MAX_CHARS`].
#[must_use]
pub fn guard(candidate: &str, max_chars: Option<usize>) -> AiResponse {
    let max_chars = max_chars.unwrap_or(DEFAULT_MAX_CHARS);

    let length = candidate.chars().count();
    if length > max_chars {
        tracing::debug!(length, max_chars, "candidate blocked: too long");
        return AiResponse::blocked(format!("Output too long ({length} chars)."));
    }

    if contains_banned_api(candidate) {
        tracing::debug!("candidate blocked: banned API");
        return AiResponse::blocked(BANNED_API_REASON);
    }

    AiResponse::Code {
        code: candidate.to_string(),
        warnings: warning_messages(candidate),
    }
}

/// Guardrail configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Maximum candidate length in Unicode scalar values
    pub max_chars: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// Gate bound to a configured size limit
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardrailGate {
    config: GuardConfig,
}

impl GuardrailGate {
    /// Create gate with configuration
    #[inline]
    #[must_use]
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Configured size limit
    #[inline]
    #[must_use]
    pub fn max_chars(&self) -> usize {
        self.config.max_chars
    }

    /// Gate a candidate with the configured limit
    #[inline]
    #[must_use]
    pub fn check(&self, candidate: &str) -> AiResponse {
        guard(candidate, Some(self.config.max_chars))
    }

    /// Gate a candidate, letting a per-request limit override the configured one
    #[inline]
    #[must_use]
    pub fn check_with_limit(&self, candidate: &str, max_chars: Option<usize>) -> AiResponse {
        guard(candidate, Some(max_chars.unwrap_or(self.config.max_chars)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_scalar_values() {
        let candidate = "console.log('😀😀')";
        assert_eq!(candidate.chars().count(), 17);
        assert_eq!(candidate.encode_utf16().count(), 19);
        assert!(!guard(candidate, Some(17)).is_blocked());
        assert_eq!(
            guard(candidate, Some(16)),
            AiResponse::blocked("Output too long (17 chars).")
        );
    }

    #[test]
    fn length_checked_before_bans() {
        let candidate = format!("eval('x');{}", " ".repeat(DEFAULT_MAX_CHARS));
        let response = guard(&candidate, None);
        assert_eq!(
            response.block_reason(),
            Some(format!("Output too long ({} chars).", candidate.len()).as_str())
        );
    }

    #[test]
    fn exact_limit_is_allowed() {
        let candidate = "x".repeat(DEFAULT_MAX_CHARS);
        assert!(!guard(&candidate, None).is_blocked());
    }

    #[test]
    fn limit_counts_characters() {
        let candidate = "é".repeat(10);
        assert!(!guard(&candidate, Some(10)).is_blocked());
        assert!(guard(&candidate, Some(9)).is_blocked());
    }

    #[test]
    fn xhr_is_banned() {
        let response = guard("new XMLHttpRequest()", None);
        assert_eq!(response.block_reason(), Some(BANNED_API_REASON));
    }

    #[test]
    fn remaining_risks_are_warnings() {
        let response = guard("localStorage.clear()", None);
        assert_eq!(response.code(), Some("localStorage.clear()"));
        assert_eq!(
            response.warnings(),
            &["Direct localStorage access may leak data.".to_string()]
        );
    }

    #[test]
    fn gate_uses_configured_limit() {
        let gate = GuardrailGate::new(GuardConfig { max_chars: 5 });
        assert!(gate.check("abcdef").is_blocked());
        assert!(!gate.check_with_limit("abcdef", Some(10)).is_blocked());
    }
}
