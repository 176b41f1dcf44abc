//! Marklet Transform
//!
//! Turns a bookmarklet source into a single-line `javascript:` link.
//!
//! # Pipeline
//!
//! ```text
//! source → minify (tree-sitter) ──ok──→ encode_component → "javascript:" + payload
//!              └──err──→ collapse_whitespace ──┘
//! ```
//!
//! Minification failures are recovered locally and never reach the caller;
//! [`generate`] always returns a usable link.
//!
//! # Example
//!
//! ```rust
//! use marklet_transform::{decode_payload, generate};
//!
//! let result = generate("alert( 'hi' ) ;");
//! assert_eq!(result.bookmarklet, "javascript:alert('hi')");
//! assert_eq!(decode_payload(&result.bookmarklet).unwrap(), "alert('hi')");
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod cache;
pub mod encode;
pub mod error;
pub mod generator;
pub mod minify;

// Re-exports
pub use cache::LinkCache;
pub use encode::{decode_component, decode_payload, encode_component, to_bookmarklet, SCHEME};
pub use error::{DecodeError, MinifyError};
pub use generator::{collapse_whitespace, generate, minify_or_collapse, GeneratorResult};
pub use minify::minify;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
