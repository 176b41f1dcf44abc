//! Error types for the transformer

use marklet_core::SyntaxError;

/// Minification failures; always recovered by the whitespace fallback
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MinifyError {
    /// Source does not parse
    #[error("cannot minify: {0}")]
    Syntax(#[from] SyntaxError),

    /// Minifier produced nothing for a non-empty source
    #[error("minifier produced no output")]
    Empty,
}

/// Errors decoding a link payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Link does not start with the scheme token
    #[error("link does not start with 'javascript:'")]
    MissingScheme,

    /// Decoded bytes are not UTF-8
    #[error("payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minify_error_display() {
        assert_eq!(MinifyError::Empty.to_string(), "minifier produced no output");
        let err: MinifyError = SyntaxError::UnexpectedEnd.into();
        assert_eq!(err.to_string(), "cannot minify: Unexpected end of input");
    }
}
