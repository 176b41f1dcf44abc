//! Early errors the grammar lets through
//!
//! The tree-sitter grammar accepts JSX and does not apply the static
//! semantics a JavaScript engine enforces before running a function body.
//! This pass walks a clean tree and rejects what an engine would refuse to
//! compile: JSX, redeclared lexical bindings, `break`/`continue` with no
//! target, `await`/`yield` outside their functions and strict-mode `with`
//! or `delete name`.

use super::SyntaxError;
use std::collections::HashSet;
use tree_sitter::Node;

const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "generator_function_declaration",
    "arrow_function",
    "method_definition",
];

const LOOP_KINDS: &[&str] = &[
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
];

/// What the enclosing code allows
#[derive(Clone, Default)]
struct Context<'s> {
    strict: bool,
    is_async: bool,
    generator: bool,
    in_loop: bool,
    in_switch: bool,
    /// Enclosing labels and whether each labels a loop
    labels: Vec<(&'s str, bool)>,
}

impl Context<'_> {
    /// Fresh context for a function body; only strictness is inherited
    fn function(&self, strict: bool, is_async: bool, generator: bool) -> Self {
        Self {
            strict: self.strict || strict,
            is_async,
            generator,
            ..Self::default()
        }
    }
}

/// Check a parsed program treated as a function body
pub(super) fn check(root: Node<'_>, source: &str) -> Result<(), SyntaxError> {
    let cx = Context {
        strict: has_use_strict(root, source),
        ..Context::default()
    };
    check_function_scope(root, None, source)?;
    visit_children(root, source, &cx)
}

fn visit<'s>(node: Node<'_>, source: &'s str, cx: &Context<'s>) -> Result<(), SyntaxError> {
    let kind = node.kind();
    if kind.starts_with("jsx_") {
        return Err(unexpected(node, "<"));
    }
    if FUNCTION_KINDS.contains(&kind) {
        return visit_function(node, source, cx);
    }

    match kind {
        "class" | "class_declaration" => {
            let inner = Context {
                strict: true,
                ..cx.clone()
            };
            visit_children(node, source, &inner)
        }
        "class_static_block" => {
            let inner = cx.function(true, false, false);
            match node.child_by_field_name("body") {
                Some(body) => {
                    check_block_scope(body, None, source, true)?;
                    visit_children(body, source, &inner)
                }
                None => Ok(()),
            }
        }
        "statement_block" => {
            let parameter = node
                .parent()
                .filter(|parent| parent.kind() == "catch_clause")
                .and_then(|parent| parent.child_by_field_name("parameter"));
            check_block_scope(node, parameter, source, cx.strict)?;
            visit_children(node, source, cx)
        }
        "switch_body" => {
            check_block_scope(node, None, source, cx.strict)?;
            visit_children(node, source, cx)
        }
        "for_statement" | "for_in_statement" | "while_statement" | "do_statement" => {
            let inner = Context {
                in_loop: true,
                ..cx.clone()
            };
            visit_children(node, source, &inner)
        }
        "switch_statement" => {
            let inner = Context {
                in_switch: true,
                ..cx.clone()
            };
            visit_children(node, source, &inner)
        }
        "labeled_statement" => {
            let mut inner = cx.clone();
            if let Some(label) = node.child_by_field_name("label") {
                let on_loop = node
                    .child_by_field_name("body")
                    .is_some_and(|body| LOOP_KINDS.contains(&body.kind()));
                inner.labels.push((text(label, source), on_loop));
            }
            visit_children(node, source, &inner)
        }
        "break_statement" => check_break(node, source, cx),
        "continue_statement" => check_continue(node, source, cx),
        "await_expression" if !cx.is_async && !is_call_like(node) => {
            Err(SyntaxError::AwaitOutsideAsync)
        }
        "yield_expression" if !cx.generator && (cx.strict || !is_call_like(node)) => {
            Err(unexpected(node, "yield"))
        }
        "with_statement" if cx.strict => Err(SyntaxError::StrictWith),
        "unary_expression" if cx.strict && is_delete_of_name(node) => {
            Err(SyntaxError::StrictDelete)
        }
        _ => visit_children(node, source, cx),
    }
}

fn visit_children<'s>(
    node: Node<'_>,
    source: &'s str,
    cx: &Context<'s>,
) -> Result<(), SyntaxError> {
    children(node).try_for_each(|child| visit(child, source, cx))
}

fn visit_function<'s>(
    node: Node<'_>,
    source: &'s str,
    cx: &Context<'s>,
) -> Result<(), SyntaxError> {
    let body = node.child_by_field_name("body");
    let block = body.filter(|body| body.kind() == "statement_block");
    let strict = block.is_some_and(|block| has_use_strict(block, source));
    let inner = cx.function(strict, has_token(node, "async"), is_generator(node));

    if let Some(block) = block {
        let params = node
            .child_by_field_name("parameters")
            .or_else(|| node.child_by_field_name("parameter"));
        check_function_scope(block, params, source)?;
    }

    for child in children(node) {
        if Some(child) == block {
            visit_children(child, source, &inner)?;
        } else {
            visit(child, source, &inner)?;
        }
    }
    Ok(())
}

fn check_break(node: Node<'_>, source: &str, cx: &Context<'_>) -> Result<(), SyntaxError> {
    match node.child_by_field_name("label") {
        Some(label) => {
            let label = text(label, source);
            if cx.labels.iter().any(|(name, _)| *name == label) {
                Ok(())
            } else {
                Err(SyntaxError::UndefinedLabel(label.to_string()))
            }
        }
        None if cx.in_loop || cx.in_switch => Ok(()),
        None => Err(SyntaxError::IllegalBreak),
    }
}

fn check_continue(node: Node<'_>, source: &str, cx: &Context<'_>) -> Result<(), SyntaxError> {
    match node.child_by_field_name("label") {
        Some(label) => {
            let label = text(label, source);
            match cx.labels.iter().rev().find(|(name, _)| *name == label) {
                Some((_, true)) => Ok(()),
                Some((_, false)) if cx.in_loop => {
                    Err(SyntaxError::IllegalContinueLabel(label.to_string()))
                }
                Some(_) => Err(SyntaxError::IllegalContinue),
                None => Err(SyntaxError::UndefinedLabel(label.to_string())),
            }
        }
        None if cx.in_loop => Ok(()),
        None => Err(SyntaxError::IllegalContinue),
    }
}

/// Top level of a function body: functions bind like `var`
fn check_function_scope(
    block: Node<'_>,
    params: Option<Node<'_>>,
    source: &str,
) -> Result<(), SyntaxError> {
    let mut lexical = Vec::new();
    let mut var_like = HashSet::new();
    if let Some(params) = params {
        bound_names(params, source, &mut |name| {
            var_like.insert(name);
        });
    }

    for statement in children(block) {
        match statement.kind() {
            "function_declaration" | "generator_function_declaration" => {
                if let Some(name) = statement.child_by_field_name("name") {
                    var_like.insert(text(name, source));
                }
            }
            _ => lexical_names(statement, source, &mut lexical),
        }
    }
    collect_vars(block, source, &mut var_like);
    reject_conflicts(&lexical, &var_like, true)
}

/// Any other block: functions bind lexically
fn check_block_scope(
    block: Node<'_>,
    catch_parameter: Option<Node<'_>>,
    source: &str,
    strict: bool,
) -> Result<(), SyntaxError> {
    let statements: Vec<Node<'_>> = if block.kind() == "switch_body" {
        children(block)
            .flat_map(|case| {
                let mut cursor = case.walk();
                let body: Vec<Node<'_>> = case.children_by_field_name("body", &mut cursor).collect();
                body
            })
            .collect()
    } else {
        children(block).collect()
    };

    let mut lexical = Vec::new();
    for statement in statements {
        match statement.kind() {
            "function_declaration" | "generator_function_declaration" => {
                if let Some(name) = statement.child_by_field_name("name") {
                    lexical.push(Binding {
                        name: text(name, source),
                        function: true,
                    });
                }
            }
            _ => lexical_names(statement, source, &mut lexical),
        }
    }

    let mut vars = HashSet::new();
    collect_vars(block, source, &mut vars);
    if let Some(parameter) = catch_parameter {
        bound_names(parameter, source, &mut |name| {
            vars.insert(name);
        });
    }
    reject_conflicts(&lexical, &vars, strict)
}

#[derive(Clone, Copy)]
struct Binding<'s> {
    name: &'s str,
    function: bool,
}

fn lexical_names<'s>(statement: Node<'_>, source: &'s str, out: &mut Vec<Binding<'s>>) {
    match statement.kind() {
        "lexical_declaration" => {
            for declarator in children(statement) {
                if let Some(pattern) = declarator.child_by_field_name("name") {
                    bound_names(pattern, source, &mut |name| {
                        out.push(Binding {
                            name,
                            function: false,
                        });
                    });
                }
            }
        }
        "class_declaration" => {
            if let Some(name) = statement.child_by_field_name("name") {
                out.push(Binding {
                    name: text(name, source),
                    function: false,
                });
            }
        }
        _ => {}
    }
}

/// Sloppy code may declare the same block-level function twice
fn reject_conflicts(
    lexical: &[Binding<'_>],
    vars: &HashSet<&str>,
    strict: bool,
) -> Result<(), SyntaxError> {
    for (index, binding) in lexical.iter().enumerate() {
        let repeated = lexical[..index].iter().any(|earlier| {
            earlier.name == binding.name && (strict || !(earlier.function && binding.function))
        });
        if repeated || vars.contains(binding.name) {
            return Err(SyntaxError::Redeclared(binding.name.to_string()));
        }
    }
    Ok(())
}

/// `var` names hoisted through `node`, stopping at nested functions
fn collect_vars<'s>(node: Node<'_>, source: &'s str, out: &mut HashSet<&'s str>) {
    for child in children(node) {
        let kind = child.kind();
        if FUNCTION_KINDS.contains(&kind) || matches!(kind, "class" | "class_declaration") {
            continue;
        }
        match kind {
            "variable_declaration" => {
                for declarator in children(child) {
                    if let Some(pattern) = declarator.child_by_field_name("name") {
                        bound_names(pattern, source, &mut |name| {
                            out.insert(name);
                        });
                    }
                }
            }
            "for_in_statement" if declares_var(child) => {
                if let Some(left) = child.child_by_field_name("left") {
                    bound_names(left, source, &mut |name| {
                        out.insert(name);
                    });
                }
            }
            _ => {}
        }
        collect_vars(child, source, out);
    }
}

fn declares_var(statement: Node<'_>) -> bool {
    statement
        .child_by_field_name("kind")
        .is_some_and(|kind| kind.kind() == "var")
}

/// Identifiers bound by a pattern or parameter list
fn bound_names<'s>(node: Node<'_>, source: &'s str, emit: &mut dyn FnMut(&'s str)) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => emit(text(node, source)),
        "pair_pattern" => {
            if let Some(value) = node.child_by_field_name("value") {
                bound_names(value, source, emit);
            }
        }
        "assignment_pattern" | "object_assignment_pattern" => {
            if let Some(left) = node.child_by_field_name("left") {
                bound_names(left, source, emit);
            }
        }
        "formal_parameters" | "object_pattern" | "array_pattern" | "rest_pattern" => {
            for child in children(node) {
                bound_names(child, source, emit);
            }
        }
        _ => {}
    }
}

/// First statements of the block that are plain string literals
fn has_use_strict(block: Node<'_>, source: &str) -> bool {
    for statement in children(block) {
        match statement.kind() {
            "comment" | "hash_bang_line" | "{" => continue,
            "expression_statement" => {
                let Some(literal) = statement.named_child(0).filter(|n| n.kind() == "string")
                else {
                    return false;
                };
                let raw = text(literal, source);
                if raw.len() >= 2 && &raw[1..raw.len() - 1] == "use strict" {
                    return true;
                }
            }
            _ => return false,
        }
    }
    false
}

/// `await (x)` and `yield (x)` are calls in code that does not reserve the word
fn is_call_like(node: Node<'_>) -> bool {
    match node.named_child(0) {
        Some(argument) => argument.kind() == "parenthesized_expression",
        None => true,
    }
}

fn is_delete_of_name(node: Node<'_>) -> bool {
    let operator = node.child_by_field_name("operator");
    let argument = node.child_by_field_name("argument");
    operator.is_some_and(|op| op.kind() == "delete")
        && argument.is_some_and(|arg| arg.kind() == "identifier")
}

fn is_generator(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "generator_function" | "generator_function_declaration"
    ) || (node.kind() == "method_definition" && has_token(node, "*"))
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    children(node).any(|child| !child.is_named() && child.kind() == token)
}

fn unexpected(node: Node<'_>, token: &str) -> SyntaxError {
    let position = node.start_position();
    SyntaxError::UnexpectedToken {
        token: token.to_string(),
        line: position.row + 1,
        column: position.column + 1,
    }
}

fn children<'t>(node: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    (0..node.child_count()).filter_map(move |i| node.child(i))
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.start_byte()..node.end_byte()]
}
