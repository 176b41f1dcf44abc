//! Token-level JavaScript minifier
//!
//! Walks the tree-sitter syntax tree and re-emits tokens with the minimum
//! whitespace that keeps them from fusing. Strings, template literals,
//! regular expressions and numbers are copied verbatim. Comments are dropped.
//!
//! Statement terminators are held back and only written when another token
//! follows that is not `}`; a terminator is synthesized wherever the source
//! relied on automatic insertion, so removing newlines never joins two
//! statements.
//!
//! Simple locals of leaf functions are shortened by [`rename`].

mod rename;

use crate::error::MinifyError;
use marklet_core::syntax;
use rename::Renames;
use tree_sitter::Node;

/// Statements that end with a terminator
const TERMINATED: &[&str] = &[
    "expression_statement",
    "variable_declaration",
    "lexical_declaration",
    "return_statement",
    "throw_statement",
    "break_statement",
    "continue_statement",
    "debugger_statement",
    "do_statement",
    "field_definition",
    "import_statement",
    "export_statement",
];

/// Nodes copied byte-for-byte from the source
const VERBATIM: &[&str] = &["string", "template_string", "regex", "number"];

/// Positions where `!0`/`!1` may stand in for `true`/`false`
const VALUE_POSITIONS: &[&str] = &[
    "variable_declarator",
    "assignment_expression",
    "return_statement",
    "arguments",
    "array",
    "pair",
];

/// Minify a parseable source
///
/// # Errors
/// Returns error if the source does not parse or minifies to nothing
pub fn minify(source: &str) -> Result<String, MinifyError> {
    let tree = syntax::parse(source)?;
    syntax::check_tree(&tree, source)?;

    let root = tree.root_node();
    let renames = rename::plan(root, source);
    tracing::trace!(renamed = renames.len(), "rename plan ready");

    let mut emitter = Emitter::new(source, &renames);
    emitter.visit(root);
    let output = emitter.finish();

    if output.is_empty() {
        return Err(MinifyError::Empty);
    }
    Ok(output)
}

/// Last token written, for fusion checks
#[derive(Debug, Clone, Copy)]
struct LastToken {
    last_char: char,
    is_number: bool,
}

struct Emitter<'a> {
    source: &'a str,
    renames: &'a Renames,
    out: String,
    last: Option<LastToken>,
    pending_terminator: bool,
}

impl<'a> Emitter<'a> {
    fn new(source: &'a str, renames: &'a Renames) -> Self {
        Self {
            source,
            renames,
            out: String::with_capacity(source.len()),
            last: None,
            pending_terminator: false,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn visit(&mut self, node: Node<'_>) {
        let kind = node.kind();
        if is_comment(kind) {
            return;
        }
        if node.child_count() == 0 || VERBATIM.contains(&kind) {
            self.leaf(node);
            return;
        }

        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                self.visit(child);
            }
        }

        if TERMINATED.contains(&kind) && !ends_with_semicolon(node) && !followed_by_semicolon(node)
        {
            self.pending_terminator = true;
        }
    }

    fn leaf(&mut self, node: Node<'_>) {
        let kind = node.kind();
        let parent = node.parent().map(|p| p.kind());

        if kind == ";" && parent.is_some_and(|p| TERMINATED.contains(&p)) {
            self.pending_terminator = true;
            return;
        }

        let renames = self.renames;
        let text: &str = match kind {
            "identifier" => renames
                .get(&node.start_byte())
                .map_or_else(|| self.text(node), String::as_str),
            "true" | "false" if parent.is_some_and(|p| VALUE_POSITIONS.contains(&p)) => {
                if kind == "true" {
                    "!0"
                } else {
                    "!1"
                }
            }
            _ => self.text(node),
        };

        self.push(text, kind == "number");
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        &self.source[node.start_byte()..node.end_byte()]
    }

    fn push(&mut self, token: &str, is_number: bool) {
        let Some(last_char) = token.chars().last() else {
            return;
        };

        if self.pending_terminator {
            self.pending_terminator = false;
            if token != "}" {
                self.out.push(';');
                self.last = Some(LastToken {
                    last_char: ';',
                    is_number: false,
                });
            }
        }

        if let Some(prev) = self.last {
            if needs_space(prev, token) {
                self.out.push(' ');
            }
        }

        self.out.push_str(token);
        self.last = Some(LastToken {
            last_char,
            is_number,
        });
    }
}

fn is_comment(kind: &str) -> bool {
    matches!(kind, "comment" | "html_comment" | "hash_bang_line")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '\\' || !c.is_ascii()
}

/// Whether two adjacent tokens would fuse into a different token
fn needs_space(prev: LastToken, next: &str) -> bool {
    let Some(first) = next.chars().next() else {
        return false;
    };
    let last = prev.last_char;

    (is_word_char(last) && is_word_char(first))
        || (last == '+' && first == '+')
        || (last == '-' && first == '-')
        || (last == '/' && matches!(first, '/' | '*'))
        || (last == '<' && first == '!')
        || (prev.is_number && first == '.')
}

fn significant_children<'t>(node: Node<'t>) -> impl DoubleEndedIterator<Item = Node<'t>> {
    (0..node.child_count())
        .filter_map(move |i| node.child(i))
        .filter(|child| !is_comment(child.kind()))
}

fn ends_with_semicolon(node: Node<'_>) -> bool {
    significant_children(node)
        .next_back()
        .is_some_and(|child| child.kind() == ";")
}

fn followed_by_semicolon(node: Node<'_>) -> bool {
    let mut sibling = node.next_sibling();
    while let Some(next) = sibling {
        if !is_comment(next.kind()) {
            return next.kind() == ";";
        }
        sibling = next.next_sibling();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn min(source: &str) -> String {
        minify(source).unwrap()
    }

    #[test]
    fn drops_comments_and_trailing_terminator() {
        assert_eq!(min("// greet\nalert( \"hi\" ) ;"), "alert(\"hi\")");
        assert_eq!(min("/* a */ foo(/* b */ 1)"), "foo(1)");
    }

    #[test]
    fn inserts_terminators_lost_with_newlines() {
        assert_eq!(
            min("const x = 1\nconst y = 2\nconsole.log(x + y)"),
            "const x=1;const y=2;console.log(x+y)"
        );
        assert_eq!(min("go()\nstop()"), "go();stop()");
    }

    #[test]
    fn drops_terminator_before_closing_brace() {
        assert_eq!(min("if (ok) { run(); stop(); }"), "if(ok){run();stop()}");
    }

    #[test]
    fn keeps_loop_header_semicolons() {
        assert_eq!(
            min("for (let i = 0; i < 3; i++) { go(i) }"),
            "for(let i=0;i<3;i++){go(i)}"
        );
        assert_eq!(min("for (;;) { break }"), "for(;;){break}");
    }

    #[test]
    fn separates_tokens_that_would_fuse() {
        assert_eq!(min("x = a + +b; y = typeof z"), "x=a+ +b;y=typeof z");
        assert_eq!(min("x = a - -b"), "x=a- -b");
        assert_eq!(min("n = 1 .toString()"), "n=1 .toString()");
        assert_eq!(min("if (a in b) void 0"), "if(a in b)void 0");
    }

    #[test]
    fn literals_are_verbatim() {
        assert_eq!(min("s = 'a  b'  +  `x  ${ y }`"), "s='a  b'+`x  ${ y }`");
        assert_eq!(min("ok = /a  b/g.test(s)"), "ok=/a  b/g.test(s)");
    }

    #[test]
    fn shortens_booleans_in_value_positions() {
        assert_eq!(
            min("if (ok) { flag = true } else { flag = false }"),
            "if(ok){flag=!0}else{flag=!1}"
        );
        assert_eq!(min("f(true, [false])"), "f(!0,[!1])");
        assert_eq!(min("if (true) go()"), "if(true)go()");
    }

    #[test]
    fn renames_leaf_function_locals() {
        assert_eq!(
            min("function add(first, second) {\n  return first + second;\n}"),
            "function add(a,b){return a+b}"
        );
        assert_eq!(
            min("items.forEach(function (item) { var label = item.name; console.log(label) })"),
            "items.forEach(function(a){var b=a.name;console.log(b)})"
        );
    }

    #[test]
    fn rejects_invalid_source() {
        assert!(matches!(minify("const = 1"), Err(MinifyError::Syntax(_))));
    }

    #[test]
    fn comment_only_source_is_empty() {
        assert_eq!(minify("// nothing"), Err(MinifyError::Empty));
    }
}
