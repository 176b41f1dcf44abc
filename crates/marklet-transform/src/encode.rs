//! URI-component encoding for link payloads

use crate::error::DecodeError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Scheme token every link starts with
pub const SCHEME: &str = "javascript:";

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode text for use inside a URI component
#[inline]
#[must_use]
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

/// Decode a percent-encoded component
///
/// # Errors
/// Returns error if the decoded bytes are not UTF-8
pub fn decode_component(text: &str) -> Result<String, DecodeError> {
    Ok(percent_decode_str(text).decode_utf8()?.into_owned())
}

/// Package a script as a link
#[inline]
#[must_use]
pub fn to_bookmarklet(script: &str) -> String {
    format!("{SCHEME}{}", encode_component(script))
}

/// Recover the script from a link
///
/// # Errors
/// Returns error if the scheme is missing or the payload is not UTF-8
pub fn decode_payload(link: &str) -> Result<String, DecodeError> {
    let payload = link.strip_prefix(SCHEME).ok_or(DecodeError::MissingScheme)?;
    decode_component(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_uri_component_rules() {
        assert_eq!(encode_component("a b"), "a%20b");
        assert_eq!(encode_component("x=1;y"), "x%3D1%3By");
        assert_eq!(encode_component("f('a')!~*"), "f('a')!~*");
        assert_eq!(encode_component("\n"), "%0A");
        assert_eq!(encode_component("é"), "%C3%A9");
    }

    #[test]
    fn link_round_trip() {
        let script = "alert(\"100% ok\")";
        let link = to_bookmarklet(script);
        assert!(link.starts_with(SCHEME));
        assert!(!link.contains(' '));
        assert_eq!(decode_payload(&link).unwrap(), script);
    }

    #[test]
    fn rejects_foreign_scheme() {
        assert_eq!(decode_payload("https://x"), Err(DecodeError::MissingScheme));
    }
}
