//! Risk signatures
//!
//! Two fixed lists: the validator's advisory detectors, and the guardrail's
//! hard bans. Declaration order is part of the observable contract.

use once_cell::sync::Lazy;
use regex::Regex;

/// A named risk signature
#[derive(Debug)]
pub struct RiskPattern {
    /// Message reported for each match
    pub label: &'static str,
    /// Compiled signature
    pub regex: Regex,
}

impl RiskPattern {
    fn new(label: &'static str, pattern: &str) -> Self {
        Self {
            label,
            regex: Regex::new(pattern).expect("risk pattern is a valid regex"),
        }
    }
}

/// Advisory detectors, in reporting order
pub static RISK_PATTERNS: Lazy<Vec<RiskPattern>> = Lazy::new(|| {
    vec![
        RiskPattern::new("Avoid eval() in bookmarklets.", r"\beval\s*\("),
        RiskPattern::new("Avoid new Function() in bookmarklets.", r"\bnew\s+Function\s*\("),
        RiskPattern::new("Accessing document.cookie may be unsafe.", r"\bdocument\.cookie\b"),
        RiskPattern::new("Network requests are discouraged (fetch).", r"\bfetch\s*\("),
        RiskPattern::new(
            "Network requests are discouraged (XMLHttpRequest).",
            r"\bXMLHttpRequest\b",
        ),
        RiskPattern::new("Use of document.write can be unsafe.", r"\bdocument\.write\b"),
        RiskPattern::new("Direct localStorage access may leak data.", r"\blocalStorage\b"),
        RiskPattern::new(
            "Direct sessionStorage access may leak data.",
            r"\bsessionStorage\b",
        ),
    ]
});

/// Hard bans for generated code; any match blocks the candidate
pub static BANNED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\beval\b",
        r"(?i)\bnew\s+Function\b",
        r"(?i)\bfetch\b",
        r"(?i)\bXMLHttpRequest\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("banned pattern is a valid regex"))
    .collect()
});

/// Check if text matches any hard ban
#[inline]
#[must_use]
pub fn contains_banned_api(text: &str) -> bool {
    BANNED_PATTERNS.iter().any(|re| re.is_match(text))
}
