//! Syntax-node classification and source spans.
//!
//! Node roles are modeled as a closed sum type so the walker and the throw
//! analyzer can match exhaustively instead of chaining kind-string predicates.
//! Adding a new function-like or call-like form is a compile-checked change.

use std::fmt;

use crate::analysis::language::SourceUnit;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

/// The function-like forms that introduce an executable body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// `function f() {}` (generators included).
    Declaration,
    /// `function () {}` appearing as an expression.
    Expression,
    /// `() => {}`.
    Arrow,
    /// A method in a class or object body.
    Method,
    /// A `constructor() {}` member.
    Constructor,
    /// A `get x() {}` accessor.
    Getter,
    /// A `set x(v) {}` accessor.
    Setter,
}

impl FunctionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionKind::Declaration => "function",
            FunctionKind::Expression => "function expression",
            FunctionKind::Arrow => "arrow function",
            FunctionKind::Method => "method",
            FunctionKind::Constructor => "constructor",
            FunctionKind::Getter => "getter",
            FunctionKind::Setter => "setter",
        }
    }
}

/// The call-like forms that are candidate highlight targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `f(...)`.
    Call,
    /// `new C(...)`.
    New,
}

/// Role of a syntax node as seen by the walker and the throw analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    FunctionLike(FunctionKind),
    CallLike(CallKind),
    ThrowStatement,
    TryStatement,
    CatchClause,
    Other,
}

/// Classify a node. Needs the unit because constructor detection reads the
/// method name text.
pub fn classify(unit: &SourceUnit, node: tree_sitter::Node) -> NodeClass {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            NodeClass::FunctionLike(FunctionKind::Declaration)
        }
        "function_expression" | "function" | "generator_function" => {
            NodeClass::FunctionLike(FunctionKind::Expression)
        }
        "arrow_function" => NodeClass::FunctionLike(FunctionKind::Arrow),
        "method_definition" => NodeClass::FunctionLike(method_kind(unit, node)),
        "call_expression" => NodeClass::CallLike(CallKind::Call),
        "new_expression" => NodeClass::CallLike(CallKind::New),
        "throw_statement" => NodeClass::ThrowStatement,
        "try_statement" => NodeClass::TryStatement,
        "catch_clause" => NodeClass::CatchClause,
        _ => NodeClass::Other,
    }
}

/// Distinguish plain methods from constructors and accessors.
fn method_kind(unit: &SourceUnit, node: tree_sitter::Node) -> FunctionKind {
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            match child.kind() {
                "get" => return FunctionKind::Getter,
                "set" => return FunctionKind::Setter,
                _ => {}
            }
        }
    }
    if let Some(name) = node.child_by_field_name("name") {
        if unit.node_text(name) == "constructor" {
            return FunctionKind::Constructor;
        }
    }
    FunctionKind::Method
}

/// The identifying name node of a function-like node, if it has one.
///
/// Anonymous forms (arrows, unnamed function expressions) have none and are
/// never highlighted at declaration sites.
pub fn name_of(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    node.child_by_field_name("name")
}

/// The body of a function-like node. Absent for ambient/overload signatures.
pub fn body_of(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    node.child_by_field_name("body")
}

/// The callee expression of a call-like node.
pub fn callee_of(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    match node.kind() {
        "call_expression" => node.child_by_field_name("function"),
        "new_expression" => node.child_by_field_name("constructor"),
        _ => None,
    }
}

/// Whether a resolved declaration node is one of the function-like forms.
pub fn is_function_like(unit: &SourceUnit, node: tree_sitter::Node) -> bool {
    matches!(classify(unit, node), NodeClass::FunctionLike(_))
}
