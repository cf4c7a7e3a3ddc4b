//! Multi-file analysis front door.
//!
//! Owns the ambient index and the annotate options; analyzes files
//! independently of each other (the core is pure per unit, so batches can run
//! in parallel). Everything derives fresh from the file contents on every
//! call; no per-file state survives between passes.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::analysis::ambient::AmbientIndex;
use crate::analysis::language::{Language, SourceUnit};
use crate::analysis::walker::{annotate, AnnotateOptions, Highlight};

/// Highlights for one analyzed file.
#[derive(Debug, Clone)]
pub struct FileHighlights {
    pub path: String,
    pub language: Language,
    pub highlights: Vec<Highlight>,
}

/// Analysis engine for a set of files sharing one ambient index.
pub struct Engine {
    ambients: AmbientIndex,
    options: AnnotateOptions,
}

impl Engine {
    /// Engine seeded with the embedded baseline globals.
    pub fn new(options: AnnotateOptions) -> anyhow::Result<Self> {
        Ok(Self {
            ambients: AmbientIndex::with_builtins()?,
            options,
        })
    }

    /// Engine with an empty ambient index (every global is unresolvable).
    pub fn without_builtins(options: AnnotateOptions) -> Self {
        Self {
            ambients: AmbientIndex::empty(),
            options,
        }
    }

    pub fn options(&self) -> &AnnotateOptions {
        &self.options
    }

    pub fn ambients(&self) -> &AmbientIndex {
        &self.ambients
    }

    /// Load a project declaration file into the ambient index.
    pub fn add_ambient_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let source = fs::read(path)?;
        self.ambients
            .add_source(&path.to_string_lossy(), &source)
    }

    /// Load declaration source into the ambient index.
    pub fn add_ambient_source(&mut self, path: &str, source: &[u8]) -> anyhow::Result<()> {
        self.ambients.add_source(path, source)
    }

    /// Analyze in-memory source.
    pub fn analyze_source(
        &self,
        path: &str,
        language: Language,
        source: &[u8],
    ) -> anyhow::Result<FileHighlights> {
        let unit = SourceUnit::parse(path, language, source)?;
        if unit.ambient {
            // Declaration-only units have nothing executable to flag.
            return Ok(FileHighlights {
                path: unit.path,
                language,
                highlights: Vec::new(),
            });
        }
        let highlights = annotate(&unit, &self.ambients, &self.options);
        Ok(FileHighlights {
            path: unit.path,
            language,
            highlights,
        })
    }

    /// Analyze a file on disk, inferring the language from its extension.
    pub fn analyze_file(&self, path: &Path) -> anyhow::Result<FileHighlights> {
        let language = Language::from_path(path)
            .ok_or_else(|| anyhow::anyhow!("unrecognized source kind: {}", path.display()))?;
        let source = fs::read(path)?;
        self.analyze_source(&path.to_string_lossy(), language, &source)
    }

    /// Analyze many files in parallel. Unreadable or unparseable files warn
    /// and are skipped; results are sorted by path for deterministic output.
    pub fn analyze_files(&self, paths: &[PathBuf]) -> Vec<FileHighlights> {
        let results: Vec<_> = paths.par_iter().map(|p| self.analyze_file(p)).collect();

        let mut all = Vec::new();
        for result in results {
            match result {
                Ok(file) => all.push(file),
                Err(e) => {
                    eprintln!("Warning: failed to analyze file: {}", e);
                }
            }
        }

        all.sort_by(|a, b| a.path.cmp(&b.path));
        all
    }
}
