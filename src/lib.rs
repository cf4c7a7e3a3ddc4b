//! throwscan - flags source locations that may propagate an uncaught
//! exception.
//!
//! throwscan statically analyzes TypeScript/JavaScript syntax trees and
//! flags function declarations and call/construction sites whose execution
//! risks raising an exception observable by the caller, so an editor can
//! render an inline marker. The analysis is call-graph aware: call sites
//! resolve to the declaration they invoke and the analysis recurses into its
//! body. Where resolution is impossible the verdict is conservative -
//! hand-authored code is assumed to throw, declaration-only typings are not.
//!
//! # Architecture
//!
//! - `analysis`: the core - parsing, declaration resolution, the might-throw
//!   analysis, the annotating tree walk, and a multi-file engine
//! - `config`: YAML configuration with silent fallbacks
//! - `decoration`: visual style derived from configuration
//! - `session`: per-host-session decoration ownership and edit debouncing
//! - `report`: output formatting (pretty, JSON)
//! - `cli`: the `scan` and `init` subcommands

pub mod analysis;
pub mod cli;
pub mod config;
pub mod decoration;
pub mod report;
pub mod session;

pub use analysis::{
    annotate, AmbientIndex, AnnotateOptions, Engine, FileHighlights, Highlight,
    HighlightTarget, Language, SourceUnit, Span, ThrowAnalyzer,
};
pub use config::Config;
pub use decoration::{hex_to_rgb, DecorationSet, DecorationStyle, Rgb};
pub use session::{AnalysisSession, Debouncer, DEFAULT_QUIESCENCE};
