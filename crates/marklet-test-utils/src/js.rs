//! Run scripts in an embedded JavaScript engine
//!
//! `run_preview` executes the `<script>` elements of a preview document in
//! order against a stub page: `window` is the global object, `parent.postMessage`
//! records what the document posts, and an uncaught exception in one script
//! is delivered to the `error` listeners before the next script runs, the
//! way a browser does.

use boa_engine::{Context, Source};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<script>(.*?)</script>").unwrap());

const STUB_PAGE: &str = r#"
var window = globalThis;
var __posted = [];
var __listeners = {};

function __Element(tag) {
  this.tagName = tag;
  this.children = [];
  this.textContent = '';
  this.className = '';
  this.removed = false;
}
__Element.prototype.appendChild = function (child) { this.children.push(child); return child; };
__Element.prototype.remove = function () { this.removed = true; };
__Element.prototype.querySelectorAll = function () { return this.children; };

var __notice = new __Element('p');
__notice.textContent = 'Running bookmarklet preview...';
var __output = new __Element('div');

var document = {
  body: new __Element('body'),
  createElement: function (tag) { return new __Element(tag); },
  getElementById: function (id) {
    if (id === 'preview-notice') return __notice.removed ? null : __notice;
    if (id === 'preview-output') return __output;
    return null;
  }
};
document.body.children.push(__notice, __output);

var console = {
  log: function () {}, info: function () {}, warn: function () {}, error: function () {}
};
window.parent = { postMessage: function (message) { __posted.push(message); } };
window.addEventListener = function (type, handler) {
  (__listeners[type] = __listeners[type] || []).push(handler);
};

function __runScript(code) {
  try {
    (0, eval)(code);
  } catch (error) {
    var message = 'Uncaught ' + (error && error.name ? error.name + ': ' + error.message : String(error));
    (__listeners.error || []).forEach(function (handler) {
      handler({ message: message, error: error });
    });
  }
}

function __report() {
  return JSON.stringify({
    posted: __posted,
    output: __output.children.map(function (item) { return item.textContent; }),
    faults: document.body.children
      .filter(function (item) { return item.className === 'fault'; })
      .map(function (item) { return item.textContent; }),
    notice: __notice.removed ? null : __notice.textContent
  });
}
"#;

/// What a preview document did when its scripts ran
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRun {
    /// Messages posted to the parent window, in order
    pub posted: Vec<Value>,
    /// Text of the visible output list
    pub output: Vec<String>,
    /// Text of rendered fault blocks
    pub faults: Vec<String>,
    /// Notice text, or `None` once it was removed
    pub notice: Option<String>,
}

impl PreviewRun {
    /// Posted messages as `(level, payload)` pairs
    pub fn console(&self) -> Vec<(String, String)> {
        self.posted
            .iter()
            .map(|message| {
                (
                    message["level"].as_str().unwrap_or_default().to_string(),
                    message["payload"].as_str().unwrap_or_default().to_string(),
                )
            })
            .collect()
    }
}

fn eval_text(context: &mut Context, code: &str) -> Result<String, String> {
    let value = context
        .eval(Source::from_bytes(code))
        .map_err(|error| error.to_string())?;
    value
        .to_string(context)
        .map(|text| text.to_std_string_escaped())
        .map_err(|error| error.to_string())
}

/// Evaluate a classic script and return its completion value as a string
pub fn evaluate(script: &str) -> Result<String, String> {
    eval_text(&mut Context::default(), script)
}

/// Bodies of the document's `<script>` elements
pub fn script_bodies(document: &str) -> Vec<&str> {
    SCRIPT
        .captures_iter(document)
        .filter_map(|captures| captures.get(1))
        .map(|body| body.as_str())
        .collect()
}

/// Run every script of a preview document against the stub page
pub fn run_preview(document: &str) -> PreviewRun {
    let mut context = Context::default();
    eval_text(&mut context, STUB_PAGE).unwrap();
    for body in script_bodies(document) {
        let call = format!("__runScript({});", serde_json::to_string(body).unwrap());
        eval_text(&mut context, &call).unwrap();
    }

    let report = eval_text(&mut context, "__report()").unwrap();
    let report: Value = serde_json::from_str(&report).unwrap();
    let strings = |key: &str| -> Vec<String> {
        report[key]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };

    PreviewRun {
        posted: report["posted"].as_array().cloned().unwrap_or_default(),
        output: strings("output"),
        faults: strings("faults"),
        notice: report["notice"].as_str().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_completion_value() {
        assert_eq!(evaluate("var a = 2; a * 21").unwrap(), "42");
        assert!(evaluate("throw new Error('x')").is_err());
    }

    #[test]
    fn finds_script_bodies() {
        let page = "<p>x</p><script>one()</script><script>\ntwo()\n</script>";
        assert_eq!(script_bodies(page), vec!["one()", "\ntwo()\n"]);
    }
}
