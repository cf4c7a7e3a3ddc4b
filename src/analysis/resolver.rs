//! Declaration resolution for call and construction expressions.
//!
//! Maps a callee expression to the declaration it invokes. tree-sitter has no
//! symbol binder, so this is a lexical scope walk: from the call site outward
//! through enclosing blocks, then the ambient-globals index. The resolved
//! target may not be function-like at all (a parameter, an import specifier,
//! a class); the analyzer decides what that means.
//!
//! Pure function of (call node, unit, ambient index); no state, no errors.

use crate::analysis::ambient::AmbientIndex;
use crate::analysis::language::SourceUnit;
use crate::analysis::node;

/// The resolved target of a callee reference.
#[derive(Clone, Copy)]
pub struct Resolved<'a> {
    /// The unit the declaration lives in (the analyzed unit or an ambient one).
    pub unit: &'a SourceUnit,
    /// The declaration node itself.
    pub node: tree_sitter::Node<'a>,
}

impl<'a> Resolved<'a> {
    /// Whether the declaration comes from a declaration-only unit.
    pub fn is_ambient(&self) -> bool {
        self.unit.ambient
    }

    /// Whether the declaration is one of the function-like forms.
    pub fn is_function_like(&self) -> bool {
        node::is_function_like(self.unit, self.node)
    }

    /// The executable body, when the declaration carries one.
    pub fn body(&self) -> Option<tree_sitter::Node<'a>> {
        node::body_of(self.node)
    }
}

/// Resolves callees within one source unit.
pub struct Resolver<'a> {
    unit: &'a SourceUnit,
    ambients: &'a AmbientIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(unit: &'a SourceUnit, ambients: &'a AmbientIndex) -> Self {
        Self { unit, ambients }
    }

    /// Resolve a call-like node to the declaration it invokes.
    pub fn resolve(&self, call: tree_sitter::Node<'a>) -> Option<Resolved<'a>> {
        let callee = node::callee_of(call)?;
        self.resolve_callee(callee)
    }

    /// Resolve a callee expression directly.
    pub fn resolve_callee(&self, callee: tree_sitter::Node<'a>) -> Option<Resolved<'a>> {
        match callee.kind() {
            "identifier" => self.resolve_identifier(self.unit.node_text(callee), callee),
            "member_expression" => {
                let object = callee.child_by_field_name("object")?;
                let property = callee.child_by_field_name("property")?;
                match object.kind() {
                    // this.m() binds against the enclosing class body.
                    "this" => {
                        self.resolve_class_member(callee, self.unit.node_text(property))
                    }
                    // obj.m() where obj is an opaque global: hand back the
                    // ambient declaration so the caller applies the
                    // declaration-only rule. Locally-bound objects stay
                    // unresolved (conservative).
                    "identifier" => {
                        let object_decl =
                            self.resolve_identifier(self.unit.node_text(object), object)?;
                        if object_decl.is_ambient() {
                            Some(object_decl)
                        } else {
                            None
                        }
                    }
                    _ => None,
                }
            }
            // Computed access, call chains, everything else: unresolvable.
            _ => None,
        }
    }

    /// Walk enclosing scopes from the reference site outward, then fall back
    /// to the ambient index.
    fn resolve_identifier(
        &self,
        name: &str,
        site: tree_sitter::Node<'a>,
    ) -> Option<Resolved<'a>> {
        let mut current = site;
        while let Some(ancestor) = current.parent() {
            let candidates = match ancestor.kind() {
                "statement_block" | "program" => self.bindings_in_block(ancestor, name),
                "catch_clause" => self.catch_binding(ancestor, name),
                _ if node::is_function_like(self.unit, ancestor) => {
                    self.parameter_bindings(ancestor, name)
                }
                _ => Vec::new(),
            };

            if !candidates.is_empty() {
                return Some(self.pick_implementation(candidates));
            }
            current = ancestor;
        }

        self.ambients.lookup(name)
    }

    /// Of several declarations of one symbol (overload signatures plus the
    /// implementation), prefer the one carrying the executable body;
    /// otherwise the first.
    fn pick_implementation(&self, candidates: Vec<tree_sitter::Node<'a>>) -> Resolved<'a> {
        let node = candidates
            .iter()
            .copied()
            .find(|n| node::is_function_like(self.unit, *n) && node::body_of(*n).is_some())
            .unwrap_or(candidates[0]);
        Resolved {
            unit: self.unit,
            node,
        }
    }

    /// Declarations binding `name` among the direct statements of a block.
    fn bindings_in_block(
        &self,
        block: tree_sitter::Node<'a>,
        name: &str,
    ) -> Vec<tree_sitter::Node<'a>> {
        let mut out = Vec::new();
        let mut cursor = block.walk();
        for stmt in block.named_children(&mut cursor) {
            self.bindings_in_statement(stmt, name, &mut out);
        }
        out
    }

    fn bindings_in_statement(
        &self,
        stmt: tree_sitter::Node<'a>,
        name: &str,
        out: &mut Vec<tree_sitter::Node<'a>>,
    ) {
        match stmt.kind() {
            // export / declare wrappers: bind through to the inner statement.
            "export_statement" => {
                if let Some(inner) = stmt.child_by_field_name("declaration") {
                    self.bindings_in_statement(inner, name, out);
                }
            }
            "ambient_declaration" => {
                let mut cursor = stmt.walk();
                for inner in stmt.named_children(&mut cursor) {
                    self.bindings_in_statement(inner, name, out);
                }
            }
            "function_declaration"
            | "generator_function_declaration"
            | "function_signature"
            | "class_declaration" => {
                if self.name_matches(stmt, name) {
                    out.push(stmt);
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                let mut cursor = stmt.walk();
                for declarator in stmt.named_children(&mut cursor) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    let Some(binding) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    if binding.kind() != "identifier" || self.unit.node_text(binding) != name {
                        continue;
                    }
                    // const f = () => {} resolves through to the initializer:
                    // that is the declaration carrying the executable body.
                    match declarator.child_by_field_name("value") {
                        Some(value) if node::is_function_like(self.unit, value) => {
                            out.push(value)
                        }
                        _ => out.push(declarator),
                    }
                }
            }
            "import_statement" => self.import_bindings(stmt, name, out),
            _ => {}
        }
    }

    fn name_matches(&self, decl: tree_sitter::Node<'a>, name: &str) -> bool {
        decl.child_by_field_name("name")
            .map(|n| self.unit.node_text(n) == name)
            .unwrap_or(false)
    }

    /// Names bound by an import statement. Cross-file resolution is out of
    /// scope, so the binding is the specifier itself: bodiless and not
    /// ambient, which lands on the conservative default.
    fn import_bindings(
        &self,
        stmt: tree_sitter::Node<'a>,
        name: &str,
        out: &mut Vec<tree_sitter::Node<'a>>,
    ) {
        let mut stack = vec![stmt];
        while let Some(current) = stack.pop() {
            match current.kind() {
                "import_specifier" => {
                    let bound = current
                        .child_by_field_name("alias")
                        .or_else(|| current.child_by_field_name("name"));
                    if let Some(bound) = bound {
                        if self.unit.node_text(bound) == name {
                            out.push(current);
                        }
                    }
                }
                "namespace_import" => {
                    let mut cursor = current.walk();
                    for child in current.named_children(&mut cursor) {
                        if child.kind() == "identifier" && self.unit.node_text(child) == name {
                            out.push(current);
                        }
                    }
                }
                "identifier" => {
                    // Default import: `import foo from "mod"`.
                    if self.unit.node_text(current) == name {
                        out.push(current);
                    }
                }
                _ => {
                    let mut cursor = current.walk();
                    for child in current.named_children(&mut cursor) {
                        stack.push(child);
                    }
                }
            }
        }
    }

    /// Formal parameters of a function-like ancestor shadowing `name`.
    fn parameter_bindings(
        &self,
        function: tree_sitter::Node<'a>,
        name: &str,
    ) -> Vec<tree_sitter::Node<'a>> {
        let mut out = Vec::new();

        // Arrow shorthand: x => ...
        if let Some(single) = function.child_by_field_name("parameter") {
            if single.kind() == "identifier" && self.unit.node_text(single) == name {
                out.push(single);
            }
            return out;
        }

        let Some(params) = function.child_by_field_name("parameters") else {
            return out;
        };
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            let binding = match param.kind() {
                // JS grammar puts the identifier directly in the list.
                "identifier" => Some(param),
                // TS grammar wraps it: (required_parameter pattern: ...).
                "required_parameter" | "optional_parameter" => {
                    param.child_by_field_name("pattern")
                }
                _ => None,
            };
            if let Some(binding) = binding {
                if binding.kind() == "identifier" && self.unit.node_text(binding) == name {
                    out.push(param);
                }
            }
        }
        out
    }

    fn catch_binding(
        &self,
        clause: tree_sitter::Node<'a>,
        name: &str,
    ) -> Vec<tree_sitter::Node<'a>> {
        match clause.child_by_field_name("parameter") {
            Some(p) if p.kind() == "identifier" && self.unit.node_text(p) == name => vec![p],
            _ => Vec::new(),
        }
    }

    /// Resolve a member name against the nearest enclosing class body.
    fn resolve_class_member(
        &self,
        site: tree_sitter::Node<'a>,
        member: &str,
    ) -> Option<Resolved<'a>> {
        let mut current = site;
        while let Some(ancestor) = current.parent() {
            if ancestor.kind() == "class_body" {
                let mut candidates = Vec::new();
                let mut cursor = ancestor.walk();
                for child in ancestor.named_children(&mut cursor) {
                    match child.kind() {
                        "method_definition" => {
                            if self.name_matches(child, member) {
                                candidates.push(child);
                            }
                        }
                        // Class fields holding a function value.
                        "public_field_definition" | "field_definition" => {
                            if self.name_matches(child, member) {
                                match child.child_by_field_name("value") {
                                    Some(value)
                                        if node::is_function_like(self.unit, value) =>
                                    {
                                        candidates.push(value)
                                    }
                                    _ => candidates.push(child),
                                }
                            }
                        }
                        _ => {}
                    }
                }
                if !candidates.is_empty() {
                    return Some(self.pick_implementation(candidates));
                }
                return None;
            }
            current = ancestor;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::language::Language;
    use crate::analysis::node::callee_of;

    fn parse(source: &str) -> SourceUnit {
        SourceUnit::parse("test.ts", Language::Typescript, source.as_bytes()).unwrap()
    }

    fn find_calls<'a>(
        unit: &'a SourceUnit,
        out: &mut Vec<tree_sitter::Node<'a>>,
        node: tree_sitter::Node<'a>,
    ) {
        if matches!(node.kind(), "call_expression" | "new_expression") {
            out.push(node);
        }
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                find_calls(unit, out, child);
            }
        }
    }

    fn calls(unit: &SourceUnit) -> Vec<tree_sitter::Node<'_>> {
        let mut out = Vec::new();
        find_calls(unit, &mut out, unit.tree.root_node());
        out
    }

    fn call_named<'a>(
        unit: &'a SourceUnit,
        callee_text: &str,
    ) -> tree_sitter::Node<'a> {
        calls(unit)
            .into_iter()
            .find(|c| unit.node_text(callee_of(*c).unwrap()) == callee_text)
            .unwrap_or_else(|| panic!("no call with callee {:?}", callee_text))
    }

    #[test]
    fn test_resolve_local_function() {
        let unit = parse("function f() { return 1; }\nf();\n");
        let ambients = AmbientIndex::empty();
        let resolver = Resolver::new(&unit, &ambients);

        let resolved = resolver.resolve(call_named(&unit, "f")).unwrap();
        assert!(resolved.is_function_like());
        assert!(resolved.body().is_some());
        assert!(!resolved.is_ambient());
    }

    #[test]
    fn test_overloads_prefer_implementation() {
        let unit = parse(
            r#"
function pick(x: string): string;
function pick(x: number): number;
function pick(x: any): any { return x; }
pick(1);
"#,
        );
        let ambients = AmbientIndex::empty();
        let resolver = Resolver::new(&unit, &ambients);

        let resolved = resolver.resolve(call_named(&unit, "pick")).unwrap();
        assert_eq!(resolved.node.kind(), "function_declaration");
        assert!(resolved.body().is_some());
    }

    #[test]
    fn test_signature_only_returns_first() {
        let unit = parse("declare function only(x: number): void;\nonly(1);\n");
        let ambients = AmbientIndex::empty();
        let resolver = Resolver::new(&unit, &ambients);

        let resolved = resolver.resolve(call_named(&unit, "only")).unwrap();
        assert_eq!(resolved.node.kind(), "function_signature");
        assert!(resolved.body().is_none());
    }

    #[test]
    fn test_arrow_const_resolves_to_initializer() {
        let unit = parse("const greet = (n: string) => { return n; };\ngreet(\"x\");\n");
        let ambients = AmbientIndex::empty();
        let resolver = Resolver::new(&unit, &ambients);

        let resolved = resolver.resolve(call_named(&unit, "greet")).unwrap();
        assert_eq!(resolved.node.kind(), "arrow_function");
        assert!(resolved.body().is_some());
    }

    #[test]
    fn test_parameter_shadows_outer_function() {
        let unit = parse(
            r#"
function f() { throw new Error("outer"); }
function wrapper(f: () => void) {
    f();
}
"#,
        );
        let ambients = AmbientIndex::empty();
        let resolver = Resolver::new(&unit, &ambients);

        let resolved = resolver.resolve(call_named(&unit, "f")).unwrap();
        assert!(!resolved.is_function_like());
        assert!(resolved.body().is_none());
    }

    #[test]
    fn test_this_method_resolution() {
        let unit = parse(
            r#"
class Svc {
    run() { this.step(); }
    step() { return 1; }
}
"#,
        );
        let ambients = AmbientIndex::empty();
        let resolver = Resolver::new(&unit, &ambients);

        let resolved = resolver.resolve(call_named(&unit, "this.step")).unwrap();
        assert_eq!(resolved.node.kind(), "method_definition");
        assert!(resolved.body().is_some());
    }

    #[test]
    fn test_ambient_member_call() {
        let unit = parse("console.log(\"hi\");\n");
        let ambients = AmbientIndex::with_builtins().unwrap();
        let resolver = Resolver::new(&unit, &ambients);

        let resolved = resolver.resolve(call_named(&unit, "console.log")).unwrap();
        assert!(resolved.is_ambient());
        assert!(resolved.body().is_none());
    }

    #[test]
    fn test_computed_access_is_unresolvable() {
        let unit = parse("const obj: any = {};\nconst key = \"x\";\nobj[key]();\n");
        let ambients = AmbientIndex::with_builtins().unwrap();
        let resolver = Resolver::new(&unit, &ambients);

        assert!(resolver.resolve(call_named(&unit, "obj[key]")).is_none());
    }

    #[test]
    fn test_new_resolves_to_class() {
        let unit = parse("class Widget { constructor() {} }\nnew Widget();\n");
        let ambients = AmbientIndex::empty();
        let resolver = Resolver::new(&unit, &ambients);

        let resolved = resolver.resolve(call_named(&unit, "Widget")).unwrap();
        assert_eq!(resolved.node.kind(), "class_declaration");
        assert!(!resolved.is_function_like());
    }

    #[test]
    fn test_import_binds_specifier() {
        let unit = parse("import { helper } from \"./helpers\";\nhelper();\n");
        let ambients = AmbientIndex::empty();
        let resolver = Resolver::new(&unit, &ambients);

        let resolved = resolver.resolve(call_named(&unit, "helper")).unwrap();
        assert!(!resolved.is_function_like());
        assert!(!resolved.is_ambient());
    }

    #[test]
    fn test_global_falls_back_to_ambient_index() {
        let unit = parse("setTimeout(() => {}, 10);\n");
        let ambients = AmbientIndex::with_builtins().unwrap();
        let resolver = Resolver::new(&unit, &ambients);

        let resolved = resolver.resolve(call_named(&unit, "setTimeout")).unwrap();
        assert!(resolved.is_ambient());
    }
}
