//! Link generation with whitespace fallback

use crate::encode::to_bookmarklet;
use crate::minify::minify;
use marklet_core::validation_messages;
use serde::{Deserialize, Serialize};

/// Generated link plus advisory warnings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratorResult {
    /// `javascript:` link with a single-line percent-encoded payload
    pub bookmarklet: String,
    /// Validator messages for the source, advisory only
    pub warnings: Vec<String>,
}

/// Collapse every whitespace run to one space and trim the ends
#[must_use]
pub fn collapse_whitespace(source: &str) -> String {
    source.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Minify, falling back to whitespace collapse on any failure
#[must_use]
pub fn minify_or_collapse(source: &str) -> String {
    match minify(source) {
        Ok(minified) => minified,
        Err(err) => {
            tracing::debug!(error = %err, "minify failed, collapsing whitespace");
            collapse_whitespace(source)
        }
    }
}

/// Produce the link for a source
#[must_use]
pub fn generate(source: &str) -> GeneratorResult {
    let script = minify_or_collapse(source);
    tracing::debug!(
        source_len = source.len(),
        script_len = script.len(),
        "bookmarklet generated"
    );
    GeneratorResult {
        bookmarklet: to_bookmarklet(&script),
        warnings: validation_messages(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::decode_payload;

    #[test]
    fn collapse_trims_and_joins() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn invalid_source_falls_back() {
        let result = generate("let x = (1 +\n  2");
        assert_eq!(decode_payload(&result.bookmarklet).unwrap(), "let x = (1 + 2");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("Syntax error: "));
    }

    #[test]
    fn empty_source_yields_bare_scheme() {
        let result = generate("   ");
        assert_eq!(result.bookmarklet, "javascript:");
        assert_eq!(result.warnings, vec!["Source is empty.".to_string()]);
    }

    #[test]
    fn risky_source_still_generates() {
        let result = generate("eval(x)");
        assert_eq!(result.bookmarklet, "javascript:eval(x)");
        assert_eq!(result.warnings, vec!["Avoid eval() in bookmarklets.".to_string()]);
    }
}
