//! The might-throw analysis core.
//!
//! Three components, consumed through one front door:
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌────────────────┐
//! │ SourceUnit   │────▶│ Tree Walker   │────▶│ Vec<Highlight> │
//! │ (tree-sitter)│     │ (annotate)    │     │ discovery order│
//! └──────────────┘     └───────┬───────┘     └────────────────┘
//!                              ▼
//!                      ┌───────────────┐     ┌────────────────┐
//!                      │ ThrowAnalyzer │◀───▶│ Resolver       │
//!                      │ (might_throw) │     │ + AmbientIndex │
//!                      └───────────────┘     └────────────────┘
//! ```
//!
//! The walker visits every node once and delegates the yes/no decision to the
//! analyzer, which resolves callees and recurses into their bodies. All three
//! are pure per pass; `Engine` batches files over a shared ambient index.

mod ambient;
mod engine;
mod language;
mod node;
mod resolver;
mod throws;
mod walker;

pub use ambient::AmbientIndex;
pub use engine::{Engine, FileHighlights};
pub use language::{Language, SourceUnit};
pub use node::{classify, CallKind, FunctionKind, NodeClass, Span};
pub use resolver::{Resolved, Resolver};
pub use throws::ThrowAnalyzer;
pub use walker::{annotate, AnnotateOptions, Highlight, HighlightTarget};
