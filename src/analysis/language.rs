//! Recognized source languages and parsed source units.

use std::path::Path;

use tree_sitter::Parser;

/// The language dialects the analysis recognizes. Anything else is ignored
/// entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Typescript,
    TypescriptReact,
    Javascript,
    JavascriptReact,
}

impl Language {
    /// Map a file extension (without dot) to a language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "mts" | "cts" => Some(Language::Typescript),
            "tsx" => Some(Language::TypescriptReact),
            "js" | "mjs" | "cjs" => Some(Language::Javascript),
            "jsx" => Some(Language::JavascriptReact),
            _ => None,
        }
    }

    /// Map an editor language identifier to a language.
    pub fn from_language_id(id: &str) -> Option<Self> {
        match id {
            "typescript" => Some(Language::Typescript),
            "typescriptreact" => Some(Language::TypescriptReact),
            "javascript" => Some(Language::Javascript),
            "javascriptreact" => Some(Language::JavascriptReact),
            _ => None,
        }
    }

    /// Map a path to a language via its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        Self::from_extension(ext)
    }

    pub fn language_id(&self) -> &'static str {
        match self {
            Language::Typescript => "typescript",
            Language::TypescriptReact => "typescriptreact",
            Language::Javascript => "javascript",
            Language::JavascriptReact => "javascriptreact",
        }
    }

    /// The tree-sitter grammar for this dialect.
    ///
    /// The JavaScript grammar already handles JSX, so both JS dialects share
    /// it; TSX needs its own grammar.
    pub fn grammar(&self) -> tree_sitter::Language {
        match self {
            Language::Typescript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::TypescriptReact => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Javascript | Language::JavascriptReact => {
                tree_sitter_javascript::LANGUAGE.into()
            }
        }
    }
}

/// One parsed document: tree, source bytes, and identity.
///
/// The tree is immutable once parsed; everything downstream borrows nodes
/// from it. Derived fresh from the current text on every analysis pass.
pub struct SourceUnit {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for reporting).
    pub path: String,
    /// The source language.
    pub language: Language,
    /// Whether this is a declaration-only unit (e.g. `.d.ts`). Calls that
    /// resolve into an ambient unit are assumed non-throwing.
    pub ambient: bool,
}

impl SourceUnit {
    /// Parse a source unit. Paths ending in `.d.ts` are marked ambient.
    pub fn parse(path: &str, language: Language, source: &[u8]) -> anyhow::Result<Self> {
        let ambient = path.ends_with(".d.ts");
        Self::parse_with_ambient(path, language, source, ambient)
    }

    /// Parse a declaration-only unit regardless of its path.
    pub fn parse_ambient(path: &str, language: Language, source: &[u8]) -> anyhow::Result<Self> {
        Self::parse_with_ambient(path, language, source, true)
    }

    fn parse_with_ambient(
        path: &str,
        language: Language,
        source: &[u8],
        ambient: bool,
    ) -> anyhow::Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&language.grammar())?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse source: {}", path))?;

        Ok(Self {
            tree,
            source: source.to_vec(),
            path: path.to_string(),
            language,
            ambient,
        })
    }

    /// Get the source code as a string slice.
    pub fn source_str(&self) -> &str {
        std::str::from_utf8(&self.source).unwrap_or("")
    }

    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(Language::from_extension("ts"), Some(Language::Typescript));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypescriptReact));
        assert_eq!(Language::from_extension("js"), Some(Language::Javascript));
        assert_eq!(Language::from_extension("jsx"), Some(Language::JavascriptReact));
        assert_eq!(Language::from_extension("py"), None);
        assert_eq!(Language::from_extension("rs"), None);
    }

    #[test]
    fn test_language_from_id() {
        assert_eq!(
            Language::from_language_id("typescript"),
            Some(Language::Typescript)
        );
        assert_eq!(
            Language::from_language_id("javascriptreact"),
            Some(Language::JavascriptReact)
        );
        assert_eq!(Language::from_language_id("markdown"), None);
    }

    #[test]
    fn test_parse_marks_declaration_files_ambient() {
        let unit =
            SourceUnit::parse("lib.d.ts", Language::Typescript, b"declare var x: number;")
                .unwrap();
        assert!(unit.ambient);

        let unit = SourceUnit::parse("app.ts", Language::Typescript, b"let x = 1;").unwrap();
        assert!(!unit.ambient);
    }

    #[test]
    fn test_parse_tsx() {
        let unit = SourceUnit::parse(
            "app.tsx",
            Language::TypescriptReact,
            b"const el = <div onClick={() => { throw 1; }} />;",
        )
        .unwrap();
        assert!(!unit.tree.root_node().has_error());
    }
}
