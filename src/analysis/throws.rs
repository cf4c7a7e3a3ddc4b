//! The "might throw" analysis.
//!
//! Answers, for a syntax subtree, whether executing it risks raising an
//! exception observable by the caller. Depth-first with a single piece of
//! traversal state: whether the current node sits under an exception handler.
//! Call sites recurse into resolved callee bodies, so "might throw"
//! propagates transitively through statically resolvable calls.
//!
//! The handler model is deliberately coarse: a `try` with a catch handler
//! neutralizes every throw in its protected block and in the handler body.
//! The finalizer stays unprotected, since a throw there escapes past the
//! catch. Re-throws and nested-try precision are not modeled.
//! False positives are acceptable noise; false negatives on direct unguarded
//! throws are not.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::analysis::ambient::AmbientIndex;
use crate::analysis::language::SourceUnit;
use crate::analysis::node::{classify, NodeClass};
use crate::analysis::resolver::{Resolved, Resolver};

/// Per-pass throw analysis over one source unit.
///
/// Holds the cycle guard and the memo table for the duration of a pass;
/// otherwise a pure function of its inputs. Re-create per pass.
pub struct ThrowAnalyzer<'a> {
    unit: &'a SourceUnit,
    resolver: Resolver<'a>,
    /// Bodies on the active analysis stack, keyed by node identity. A callee
    /// already in progress is a cycle: assume safe rather than recurse
    /// forever.
    in_progress: RefCell<HashSet<usize>>,
    /// Completed per-body results, valid for this pass only.
    memo: RefCell<HashMap<usize, bool>>,
}

impl<'a> ThrowAnalyzer<'a> {
    pub fn new(unit: &'a SourceUnit, ambients: &'a AmbientIndex) -> Self {
        Self {
            unit,
            resolver: Resolver::new(unit, ambients),
            in_progress: RefCell::new(HashSet::new()),
            memo: RefCell::new(HashMap::new()),
        }
    }

    /// Does executing this subtree risk an exception escaping it?
    pub fn might_throw(&self, root: tree_sitter::Node<'a>) -> bool {
        self.walk(root, false)
    }

    /// The call-site verdict: resolve the callee and judge the declaration.
    /// An unresolvable callee is assumed to throw.
    pub fn call_might_throw(&self, call: tree_sitter::Node<'a>) -> bool {
        match self.resolver.resolve(call) {
            Some(resolved) => self.resolved_might_throw(&resolved),
            None => true,
        }
    }

    /// Judge a resolved declaration: analyze its body when there is one to
    /// inspect, otherwise fall back to the conservative default. Hand-authored
    /// project code with no inspectable implementation is assumed risky;
    /// opaque declaration-only APIs are assumed safe.
    pub fn resolved_might_throw(&self, resolved: &Resolved<'a>) -> bool {
        if resolved.is_function_like() {
            if let Some(body) = resolved.body() {
                // Bodies only exist in the analyzed unit; ambient units are
                // declaration-only by construction.
                if std::ptr::eq(resolved.unit, self.unit) {
                    return self.body_might_throw(body);
                }
            }
        }
        !resolved.is_ambient()
    }

    /// Analyze a callee body with fresh handler state, guarded against
    /// recursion cycles and memoized for the pass.
    fn body_might_throw(&self, body: tree_sitter::Node<'a>) -> bool {
        let key = body.id();

        if let Some(&known) = self.memo.borrow().get(&key) {
            return known;
        }
        if !self.in_progress.borrow_mut().insert(key) {
            // Direct or mutual recursion: unknown, assume safe.
            return false;
        }

        let result = self.walk(body, false);

        self.in_progress.borrow_mut().remove(&key);
        self.memo.borrow_mut().insert(key, result);
        result
    }

    fn walk(&self, node: tree_sitter::Node<'a>, in_handler: bool) -> bool {
        match classify(self.unit, node) {
            NodeClass::ThrowStatement => {
                if !in_handler {
                    return true;
                }
                self.walk_children(node, in_handler)
            }
            NodeClass::TryStatement => {
                // A catch handler neutralizes the protected block and the
                // handler itself, but never the finalizer: a throw there
                // escapes regardless. try/finally without a catch protects
                // nothing.
                let has_handler = node.child_by_field_name("handler").is_some();
                let finalizer = node.child_by_field_name("finalizer");
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    let in_finalizer = finalizer.map_or(false, |f| f.id() == child.id());
                    let handled = in_handler || (has_handler && !in_finalizer);
                    if self.walk(child, handled) {
                        return true;
                    }
                }
                false
            }
            NodeClass::CatchClause => self.walk_children(node, true),
            NodeClass::CallLike(_) => {
                if !in_handler && self.call_might_throw(node) {
                    return true;
                }
                self.walk_children(node, in_handler)
            }
            // Nested function bodies are descended like any other subtree;
            // the traversal is structural, not flow-aware.
            NodeClass::FunctionLike(_) | NodeClass::Other => {
                self.walk_children(node, in_handler)
            }
        }
    }

    fn walk_children(&self, node: tree_sitter::Node<'a>, in_handler: bool) -> bool {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if self.walk(child, in_handler) {
                // Found once is sufficient.
                return true;
            }
        }
        false
    }
}
