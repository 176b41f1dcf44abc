//! Parse-only syntax check
//!
//! Sources are parsed with the tree-sitter JavaScript grammar and treated as
//! a function body: statements (including `return`) are accepted, module
//! syntax is not. A clean tree then goes through the early-error pass, so
//! anything an engine would refuse to compile is rejected here. Nothing is
//! evaluated.

mod early;

use tree_sitter::{Language, Node, Parser, Tree};

/// Longest token excerpt quoted in an error message
const MAX_TOKEN_EXCERPT: usize = 24;

/// Syntax error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// Grammar could not be loaded
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// Parser returned no tree
    #[error("parse failed")]
    ParseFailed,

    /// Error node in the tree
    #[error("Unexpected token '{token}' at line {line}, column {column}")]
    UnexpectedToken {
        /// Offending text, shortened
        token: String,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
    },

    /// Token the parser had to insert
    #[error("Missing '{token}' at line {line}, column {column}")]
    MissingToken {
        /// Expected token
        token: String,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
    },

    /// Source ends inside a construct
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// Top-level `import`
    #[error("Cannot use import statement outside a module")]
    ImportOutsideModule,

    /// Top-level `export`
    #[error("Unexpected token 'export'")]
    UnexpectedExport,

    /// Lexical name declared twice in one scope
    #[error("Identifier '{0}' has already been declared")]
    Redeclared(String),

    /// `break` outside any loop, switch or label
    #[error("Illegal break statement")]
    IllegalBreak,

    /// `continue` outside any loop
    #[error("Illegal continue statement: no surrounding iteration statement")]
    IllegalContinue,

    /// `continue` naming a label that is not on a loop
    #[error("Illegal continue statement: '{0}' does not denote an iteration statement")]
    IllegalContinueLabel(String),

    /// Jump to a label that does not enclose it
    #[error("Undefined label '{0}'")]
    UndefinedLabel(String),

    /// `await` operand outside an async function
    #[error("await is only valid in async functions and the top level bodies of modules")]
    AwaitOutsideAsync,

    /// `with` in strict code
    #[error("Strict mode code may not include a with statement")]
    StrictWith,

    /// `delete` of a plain identifier in strict code
    #[error("Delete of an unqualified identifier in strict mode.")]
    StrictDelete,
}

/// The grammar used for every parse
#[inline]
#[must_use]
pub fn language() -> Language {
    tree_sitter_javascript::LANGUAGE.into()
}

/// Parse source into a concrete syntax tree
///
/// The tree may contain error nodes; use [`check`] for a verdict.
///
/// # Errors
/// Returns error if the parser cannot be initialized or gives up
pub fn parse(source: &str) -> Result<Tree, SyntaxError> {
    let mut parser = Parser::new();
    parser
        .set_language(&language())
        .map_err(|e| SyntaxError::ParserInit(e.to_string()))?;

    parser.parse(source, None).ok_or(SyntaxError::ParseFailed)
}

/// Check that source parses as a function body
///
/// # Errors
/// Returns the first syntax problem found, in document order
pub fn check(source: &str) -> Result<(), SyntaxError> {
    let tree = parse(source)?;
    check_tree(&tree, source)
}

/// Check an already parsed tree
///
/// # Errors
/// Returns the first syntax problem found, in document order
pub fn check_tree(tree: &Tree, source: &str) -> Result<(), SyntaxError> {
    let root = tree.root_node();

    if root.has_error() {
        let error = first_error(root, source).unwrap_or(SyntaxError::UnexpectedEnd);
        tracing::debug!(%error, "syntax check failed");
        return Err(error);
    }

    for i in 0..root.child_count() {
        if let Some(child) = root.child(i) {
            match child.kind() {
                "import_statement" => return Err(SyntaxError::ImportOutsideModule),
                "export_statement" => return Err(SyntaxError::UnexpectedExport),
                _ => {}
            }
        }
    }

    early::check(root, source).inspect_err(|error| {
        tracing::debug!(%error, "early error");
    })
}

/// Find the first error or missing node in document order
fn first_error(node: Node<'_>, source: &str) -> Option<SyntaxError> {
    let position = node.start_position();
    let (line, column) = (position.row + 1, position.column + 1);

    if node.is_missing() {
        return Some(SyntaxError::MissingToken {
            token: node.kind().to_string(),
            line,
            column,
        });
    }

    if node.is_error() {
        let token = first_token_text(node, source);
        if token.is_empty() {
            return Some(SyntaxError::UnexpectedEnd);
        }
        return Some(SyntaxError::UnexpectedToken {
            token,
            line,
            column,
        });
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.has_error() || child.is_missing() {
                if let Some(error) = first_error(child, source) {
                    return Some(error);
                }
            }
        }
    }

    None
}

/// Text of the leftmost leaf under `node`, shortened for messages
fn first_token_text(node: Node<'_>, source: &str) -> String {
    let mut leaf = node;
    while let Some(child) = leaf.child(0) {
        leaf = child;
    }

    let text = leaf.utf8_text(source.as_bytes()).unwrap_or("");
    let text = if text.is_empty() {
        node.utf8_text(source.as_bytes()).unwrap_or("")
    } else {
        text
    };

    text.split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .take(MAX_TOKEN_EXCERPT)
        .collect()
}
