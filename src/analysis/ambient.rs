//! Ambient-globals index built from declaration-only units.
//!
//! Names that only exist as signatures (library typings, `declare` blocks)
//! have no visible implementation to inspect. The resolver falls back to this
//! index for identifiers it cannot bind lexically; calls that land here are
//! assumed non-throwing, the other half of the conservative-default policy.

use std::collections::HashMap;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Query, QueryCursor};

use crate::analysis::language::{Language, SourceUnit};
use crate::analysis::resolver::Resolved;

/// Baseline globals embedded in the binary so platform calls stay unflagged
/// even when a project ships no typings.
const BUILTIN_GLOBALS: &str = include_str!("globals.d.ts");

/// Path label for the embedded unit in reports and debug output.
const BUILTIN_PATH: &str = "<builtin>/globals.d.ts";

/// Tree-sitter query for the declaration forms that bind a global value name.
/// Interfaces and type aliases bind no value and are skipped.
const GLOBAL_NAME_QUERY: &str = r#"
(function_signature
  name: (identifier) @name) @decl

(variable_declarator
  name: (identifier) @name) @decl

(class_declaration
  name: (type_identifier) @name) @decl

(enum_declaration
  name: (identifier) @name) @decl
"#;

/// Byte range of a declaration inside one of the indexed units.
#[derive(Debug, Clone, Copy)]
struct DeclSite {
    unit: usize,
    start_byte: usize,
    end_byte: usize,
}

/// Index of global value names declared by ambient units.
pub struct AmbientIndex {
    units: Vec<SourceUnit>,
    /// First declaration site per name, in unit load order.
    names: HashMap<String, DeclSite>,
}

impl AmbientIndex {
    /// An index containing only the embedded baseline globals.
    pub fn with_builtins() -> anyhow::Result<Self> {
        let mut index = Self::empty();
        let unit = SourceUnit::parse_ambient(
            BUILTIN_PATH,
            Language::Typescript,
            BUILTIN_GLOBALS.as_bytes(),
        )?;
        index.add_unit(unit)?;
        Ok(index)
    }

    /// An index with no units at all (every global lookup misses).
    pub fn empty() -> Self {
        Self {
            units: Vec::new(),
            names: HashMap::new(),
        }
    }

    /// Add a declaration-only unit and index the value names it declares.
    pub fn add_unit(&mut self, unit: SourceUnit) -> anyhow::Result<()> {
        let unit_idx = self.units.len();

        let query = Query::new(&unit.language.grammar(), GLOBAL_NAME_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, unit.tree.root_node(), &unit.source[..]);

        while let Some(m) = matches.next() {
            let mut name = String::new();
            let mut site = None;

            for capture in m.captures {
                let capture_name = query.capture_names()[capture.index as usize];
                match capture_name {
                    "name" => name = unit.node_text(capture.node).to_string(),
                    "decl" => {
                        site = Some(DeclSite {
                            unit: unit_idx,
                            start_byte: capture.node.start_byte(),
                            end_byte: capture.node.end_byte(),
                        });
                    }
                    _ => {}
                }
            }

            if let (false, Some(site)) = (name.is_empty(), site) {
                // First declaration wins across units, matching load order.
                self.names.entry(name).or_insert(site);
            }
        }

        self.units.push(unit);
        Ok(())
    }

    /// Parse and add a declaration file from raw source.
    pub fn add_source(&mut self, path: &str, source: &[u8]) -> anyhow::Result<()> {
        let unit = SourceUnit::parse_ambient(path, Language::Typescript, source)?;
        self.add_unit(unit)
    }

    /// Look up a global value name. The returned declaration always comes
    /// from a declaration-only unit and never carries an executable body.
    pub fn lookup(&self, name: &str) -> Option<Resolved<'_>> {
        let site = self.names.get(name)?;
        let unit = &self.units[site.unit];
        let node = unit
            .tree
            .root_node()
            .named_descendant_for_byte_range(site.start_byte, site.end_byte)?;
        Some(Resolved { unit, node })
    }

    /// Number of indexed global names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Paths of the loaded ambient units.
    pub fn unit_paths(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_cover_platform_globals() {
        let index = AmbientIndex::with_builtins().unwrap();
        for name in ["console", "Math", "JSON", "setTimeout", "parseInt", "Error"] {
            let resolved = index.lookup(name).unwrap_or_else(|| {
                panic!("builtin global {:?} should be indexed", name)
            });
            assert!(resolved.unit.ambient);
        }
        assert!(index.lookup("myProjectHelper").is_none());
    }

    #[test]
    fn test_project_declarations_extend_index() {
        let mut index = AmbientIndex::empty();
        index
            .add_source(
                "vendor.d.ts",
                b"declare function track(event: string): void;\ndeclare var sdk: any;\n",
            )
            .unwrap();

        assert!(index.lookup("track").is_some());
        assert!(index.lookup("sdk").is_some());
        assert!(index.lookup("console").is_none());
    }

    #[test]
    fn test_first_declaration_wins() {
        let mut index = AmbientIndex::empty();
        index
            .add_source("a.d.ts", b"declare function dup(): void;\n")
            .unwrap();
        index
            .add_source("b.d.ts", b"declare function dup(): void;\n")
            .unwrap();

        let resolved = index.lookup("dup").unwrap();
        assert_eq!(resolved.unit.path, "a.d.ts");
    }

    #[test]
    fn test_interfaces_bind_no_value() {
        let mut index = AmbientIndex::empty();
        index
            .add_source("types.d.ts", b"interface Shape { area(): number; }\n")
            .unwrap();
        assert!(index.lookup("Shape").is_none());
    }
}
