//! Pre-order tree walk that collects highlight ranges.
//!
//! Visits every node of a unit once. Function-like nodes are judged by their
//! own body; call-like nodes by their resolved callee. Ranges cover the name
//! of a declaration or the callee expression of a call, never the whole
//! statement, and come out in discovery order: top-to-bottom, left-to-right
//! as written in source.

use crate::analysis::ambient::AmbientIndex;
use crate::analysis::language::SourceUnit;
use crate::analysis::node::{self, classify, NodeClass, Span};
use crate::analysis::throws::ThrowAnalyzer;

/// Which highlight targets are enabled. Each gate is independent.
#[derive(Debug, Clone, Copy)]
pub struct AnnotateOptions {
    pub show_on_declarations: bool,
    pub show_on_calls: bool,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            show_on_declarations: true,
            show_on_calls: true,
        }
    }
}

/// What a highlight range points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightTarget {
    /// The name of a function-like declaration whose body might throw.
    Declaration,
    /// The callee of a call/construction whose target might throw.
    Call,
}

impl HighlightTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightTarget::Declaration => "declaration",
            HighlightTarget::Call => "call",
        }
    }
}

/// One flagged source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    /// Range of the declaration name or callee expression.
    pub span: Span,
    /// The flagged text, for reporting.
    pub text: String,
    pub target: HighlightTarget,
}

/// Walk a unit and collect highlight ranges in discovery order.
pub fn annotate(
    unit: &SourceUnit,
    ambients: &AmbientIndex,
    options: &AnnotateOptions,
) -> Vec<Highlight> {
    let mut highlights = Vec::new();
    if !options.show_on_declarations && !options.show_on_calls {
        // Nothing could be emitted; skip the walk.
        return highlights;
    }

    let analyzer = ThrowAnalyzer::new(unit, ambients);
    visit(unit, &analyzer, options, unit.tree.root_node(), &mut highlights);
    highlights
}

fn visit<'a>(
    unit: &'a SourceUnit,
    analyzer: &ThrowAnalyzer<'a>,
    options: &AnnotateOptions,
    node: tree_sitter::Node<'a>,
    out: &mut Vec<Highlight>,
) {
    match classify(unit, node) {
        NodeClass::FunctionLike(_) => {
            if options.show_on_declarations {
                // Anonymous or bodiless forms are never declaration targets.
                if let (Some(name), Some(body)) = (node::name_of(node), node::body_of(node)) {
                    if analyzer.might_throw(body) {
                        out.push(Highlight {
                            span: Span::from_node(name),
                            text: unit.node_text(name).to_string(),
                            target: HighlightTarget::Declaration,
                        });
                    }
                }
            }
        }
        NodeClass::CallLike(_) => {
            if options.show_on_calls && analyzer.call_might_throw(node) {
                if let Some(callee) = node::callee_of(node) {
                    out.push(Highlight {
                        span: Span::from_node(callee),
                        text: unit.node_text(callee).to_string(),
                        target: HighlightTarget::Call,
                    });
                }
            }
        }
        NodeClass::ThrowStatement
        | NodeClass::TryStatement
        | NodeClass::CatchClause
        | NodeClass::Other => {}
    }

    // Keep descending regardless: a throwing call nested inside a throwing
    // function is flagged at both levels.
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(unit, analyzer, options, child, out);
    }
}
