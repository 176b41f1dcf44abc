//! Preview document builder
//!
//! The document runs inside an `allow-scripts` sandbox with an opaque
//! origin. A fixed CSP forbids every network fetch and external resource, so
//! the only way out of the realm is `postMessage` to the host.
//!
//! Layout, in order:
//!
//! 1. instrumentation shim that forwards console output and runtime faults
//! 2. the user source inside `try`/`catch`
//! 3. the "no visible output" notice update
//!
//! The user source sits in its own script element so a syntax error in it
//! still reaches the shim's `error` listener.

use crate::protocol::CHANNEL_TAG;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Content security policy embedded in every preview document
pub const CONTENT_SECURITY_POLICY: &str =
    "default-src 'none'; script-src 'unsafe-inline'; style-src 'unsafe-inline'; img-src data:;";

/// Sandbox flags for the preview frame; no same-origin, no modals
pub const SANDBOX_ATTRIBUTES: &str = "allow-scripts";

const TEMPLATE: &str = include_str!("../assets/preview.html");

static SCRIPT_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(script)").expect("script-close pattern must compile"));

/// Escape every `</script` (any case) so the source cannot end its element
#[must_use]
pub fn escape_script_close(source: &str) -> Cow<'_, str> {
    SCRIPT_CLOSE.replace_all(source, r"<\/$1")
}

/// Build the complete preview document for a source
#[must_use]
pub fn build_document(source: &str) -> String {
    let escaped = escape_script_close(source);
    TEMPLATE
        .replace("{{csp}}", CONTENT_SECURITY_POLICY)
        .replace("{{channel}}", CHANNEL_TAG)
        .replacen("{{source}}", &escaped, 1)
}

/// Escape text for an HTML attribute value
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `<iframe>` element hosting a document with the sandbox flags
#[must_use]
pub fn iframe_markup(document: &str) -> String {
    format!(
        r#"<iframe title="Bookmarklet preview" sandbox="{SANDBOX_ATTRIBUTES}" srcdoc="{}"></iframe>"#,
        escape_html(document)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_script_close_preserving_case() {
        assert_eq!(
            escape_script_close("a</script>b</SCRIPT>c</ScRiPt"),
            r"a<\/script>b<\/SCRIPT>c<\/ScRiPt"
        );
        assert!(matches!(escape_script_close("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn document_carries_policy_and_channel() {
        let doc = build_document("console.log('hi')");
        assert!(doc.contains(CONTENT_SECURITY_POLICY));
        assert!(doc.contains("var CHANNEL = 'bookmarklet-console';"));
        assert!(doc.contains("console.log('hi')"));
        assert!(!doc.contains("{{"));
    }

    #[test]
    fn user_source_follows_shim() {
        let doc = build_document("run()");
        let shim = doc.find("Object.defineProperty(window, '__marklet'").unwrap();
        let user = doc.find("run()").unwrap();
        let settle = doc.find("window.__marklet.settle();").unwrap();
        assert!(shim < user && user < settle);
    }

    #[test]
    fn placeholder_text_in_source_is_left_alone() {
        let doc = build_document("x = '{{csp}}'");
        assert!(doc.contains("x = '{{csp}}'"));
    }

    #[test]
    fn iframe_has_no_same_origin() {
        let markup = iframe_markup(&build_document("alert(1)"));
        assert!(markup.contains(r#"sandbox="allow-scripts""#));
        assert!(!markup.contains("allow-same-origin"));
        assert!(!markup.contains("<script"));
    }
}
