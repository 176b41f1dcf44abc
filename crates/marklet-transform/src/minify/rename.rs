//! Local identifier shortening for leaf functions
//!
//! A function qualifies only when it contains no nested function or class,
//! no direct `eval`, no `with` and no template substitution, and none of its
//! parameters has a default value. Within a qualifying function, parameters,
//! top-level `let`/`const` and every `var` get the shortest names that do
//! not collide with any identifier already in the function.

use std::collections::{HashMap, HashSet};
use tree_sitter::Node;

/// Replacement text keyed by identifier start byte
pub(crate) type Renames = HashMap<usize, String>;

const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "generator_function_declaration",
    "arrow_function",
    "method_definition",
];

const SCOPE_KINDS: &[&str] = &["class", "class_declaration"];

const RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield", "NaN", "Infinity",
];

/// Build the rename plan for a whole tree
pub(crate) fn plan(root: Node<'_>, source: &str) -> Renames {
    let mut renames = Renames::new();
    collect(root, source, &mut renames);
    renames
}

fn collect(node: Node<'_>, source: &str, renames: &mut Renames) {
    if FUNCTION_KINDS.contains(&node.kind()) {
        plan_function(node, source, renames);
    }
    for child in children(node) {
        collect(child, source, renames);
    }
}

#[derive(Default)]
struct Scan<'t> {
    identifiers: Vec<Node<'t>>,
    used: HashSet<String>,
    shorthand: HashSet<String>,
}

fn plan_function(function: Node<'_>, source: &str, renames: &mut Renames) {
    let params = function
        .child_by_field_name("parameters")
        .or_else(|| function.child_by_field_name("parameter"));
    let Some(body) = function.child_by_field_name("body") else {
        return;
    };

    let mut scan = Scan::default();
    for part in params.into_iter().chain(Some(body)) {
        if !scan_node(part, source, &mut scan) {
            return;
        }
    }

    let mut bound = Vec::new();
    if let Some(params) = params {
        if !bind_params(params, source, &mut bound) {
            return;
        }
    }
    if body.kind() == "statement_block" {
        for statement in children(body) {
            if matches!(statement.kind(), "lexical_declaration" | "variable_declaration") {
                bind_declarators(statement, source, &mut bound);
            }
        }
    }
    bind_vars(body, source, &mut bound);
    bound.retain(|name| !scan.shorthand.contains(name) && !RESERVED.contains(&name.as_str()));

    let mut fresh = FreshNames::new(&scan.used);
    let mut mapping: HashMap<String, String> = HashMap::new();
    for name in bound {
        let short = fresh.peek();
        if short.len() < name.len() {
            fresh.take();
            mapping.insert(name, short);
        }
    }
    if mapping.is_empty() {
        return;
    }

    for identifier in scan.identifiers {
        if let Some(short) = mapping.get(text(identifier, source)) {
            renames.insert(identifier.start_byte(), short.clone());
        }
    }
}

/// Record identifiers; false when the function must not be touched
fn scan_node<'t>(node: Node<'t>, source: &str, scan: &mut Scan<'t>) -> bool {
    let kind = node.kind();
    if FUNCTION_KINDS.contains(&kind) || SCOPE_KINDS.contains(&kind) {
        return false;
    }
    match kind {
        "with_statement" | "template_substitution" => return false,
        "identifier" => {
            let name = text(node, source);
            if name == "eval" {
                return false;
            }
            scan.used.insert(name.to_string());
            scan.identifiers.push(node);
        }
        "shorthand_property_identifier" | "shorthand_property_identifier_pattern" => {
            let name = text(node, source).to_string();
            scan.used.insert(name.clone());
            scan.shorthand.insert(name);
        }
        "property_identifier" | "statement_identifier" => {
            scan.used.insert(text(node, source).to_string());
        }
        _ => {}
    }
    children(node).all(|child| scan_node(child, source, scan))
}

/// Bind simple parameters; false when any parameter has a default
fn bind_params(params: Node<'_>, source: &str, bound: &mut Vec<String>) -> bool {
    if params.kind() == "identifier" {
        push_unique(bound, text(params, source));
        return true;
    }
    for param in children(params) {
        match param.kind() {
            "identifier" => push_unique(bound, text(param, source)),
            "assignment_pattern" => return false,
            _ => {}
        }
    }
    true
}

fn bind_declarators(declaration: Node<'_>, source: &str, bound: &mut Vec<String>) {
    for declarator in children(declaration) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        if let Some(name) = declarator.child_by_field_name("name") {
            if name.kind() == "identifier" {
                push_unique(bound, text(name, source));
            }
        }
    }
}

fn bind_vars(node: Node<'_>, source: &str, bound: &mut Vec<String>) {
    if node.kind() == "variable_declaration" {
        bind_declarators(node, source, bound);
    }
    for child in children(node) {
        bind_vars(child, source, bound);
    }
}

fn push_unique(bound: &mut Vec<String>, name: &str) {
    if !bound.iter().any(|existing| existing == name) {
        bound.push(name.to_string());
    }
}

fn children<'t>(node: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    (0..node.child_count()).filter_map(move |i| node.child(i))
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.start_byte()..node.end_byte()]
}

/// `a`, `b`, ..., `z`, `aa`, `ab`, ... skipping taken and reserved names
struct FreshNames<'a> {
    used: &'a HashSet<String>,
    next: usize,
}

impl<'a> FreshNames<'a> {
    fn new(used: &'a HashSet<String>) -> Self {
        Self { used, next: 0 }
    }

    fn peek(&mut self) -> String {
        loop {
            let candidate = short_name(self.next);
            if !self.used.contains(&candidate) && !RESERVED.contains(&candidate.as_str()) {
                return candidate;
            }
            self.next += 1;
        }
    }

    fn take(&mut self) {
        self.next += 1;
    }
}

fn short_name(mut index: usize) -> String {
    const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";
    let mut name = Vec::new();
    loop {
        name.push(char::from(ALPHABET[index % 26]));
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use marklet_core::syntax;

    fn renamed(source: &str) -> Vec<(String, String)> {
        let tree = syntax::parse(source).unwrap();
        let plan = plan(tree.root_node(), source);
        let mut pairs: Vec<_> = plan
            .iter()
            .map(|(start, short)| {
                let original: String = source[*start..]
                    .chars()
                    .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
                    .collect();
                (original, short.clone())
            })
            .collect();
        pairs.sort();
        pairs.dedup();
        pairs
    }

    #[test]
    fn short_names_are_bijective_base26() {
        assert_eq!(short_name(0), "a");
        assert_eq!(short_name(25), "z");
        assert_eq!(short_name(26), "aa");
        assert_eq!(short_name(27), "ab");
        assert_eq!(short_name(26 + 26 * 26), "aaa");
    }

    #[test]
    fn avoids_names_already_in_scope() {
        let pairs = renamed("function f(total) { var a = 1; return total + a }");
        assert_eq!(pairs, vec![("total".to_string(), "b".to_string())]);
    }

    #[test]
    fn skips_functions_with_nested_scopes() {
        assert!(renamed("function f(value) { return () => value }").is_empty());
        assert!(renamed("function f(value) { class K {} return value }").is_empty());
    }

    #[test]
    fn skips_unsafe_functions() {
        assert!(renamed("function f(value) { eval('value') }").is_empty());
        assert!(renamed("function f(value) { return `${value}` }").is_empty());
        assert!(renamed("function f(value = 1) { return value }").is_empty());
    }

    #[test]
    fn keeps_shorthand_properties() {
        assert!(renamed("function f(value) { return { value } }").is_empty());
    }

    #[test]
    fn leaves_globals_alone() {
        let pairs = renamed("const list = items.map((entry) => entry.id)");
        assert_eq!(pairs, vec![("entry".to_string(), "a".to_string())]);
    }
}
