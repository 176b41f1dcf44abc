//! Testing utilities for the marklet workspace
//!
//! Shared sources, preview messages, config files and an embedded
//! JavaScript engine for running generated scripts.

#![allow(missing_docs)]

pub mod js;

use marklet_sandbox::{ConsoleLevel, InboundMessage, RealmId, CHANNEL_TAG};
use std::io::Write;
use tempfile::NamedTempFile;

/// Parses, no risky APIs
pub const CLEAN_SOURCE: &str = r"(() => {
  const links = document.querySelectorAll('a');
  links.forEach((link) => {
    link.style.outline = '2px solid orange';
  });
  console.log('outlined ' + links.length + ' links');
})();";

/// Parses, touches storage and cookies
pub const RISKY_SOURCE: &str = r"const token = document.cookie;
localStorage.setItem('token', token);
console.log(token);";

/// Does not parse
pub const BROKEN_SOURCE: &str = "function (";

/// Whitespace only
pub const BLANK_SOURCE: &str = " \n\t ";

pub fn console_value(level: ConsoleLevel, payload: &str) -> serde_json::Value {
    serde_json::json!({
        "type": CHANNEL_TAG,
        "level": level.as_str(),
        "payload": payload,
    })
}

pub fn console_message(realm: RealmId, level: ConsoleLevel, payload: &str) -> InboundMessage {
    InboundMessage::new(realm, console_value(level, payload))
}

/// Write a config file that lives as long as the returned handle
pub fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
