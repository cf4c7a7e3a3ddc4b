//! Output formatting for scan results.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::Serialize;

use crate::analysis::{FileHighlights, HighlightTarget};
use crate::decoration::{hex_to_rgb, DecorationStyle, Rgb};

/// Top-level JSON report.
#[derive(Serialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub config: String,
    pub files_scanned: usize,
    pub total_highlights: usize,
    pub style: DecorationStyle,
    pub files: Vec<JsonFile>,
}

#[derive(Serialize)]
pub struct JsonFile {
    pub file: String,
    pub language: String,
    pub highlights: Vec<JsonHighlight>,
}

#[derive(Serialize)]
pub struct JsonHighlight {
    pub target: String,
    pub text: String,
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

/// Build the JSON report value (separated from writing for testability).
pub fn build_json(
    path: &str,
    config_label: &str,
    files: &[FileHighlights],
    style: &DecorationStyle,
) -> JsonReport {
    let total = files.iter().map(|f| f.highlights.len()).sum();
    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        config: config_label.to_string(),
        files_scanned: files.len(),
        total_highlights: total,
        style: style.clone(),
        files: files
            .iter()
            .map(|f| JsonFile {
                file: f.path.clone(),
                language: f.language.language_id().to_string(),
                highlights: f.highlights.iter().map(highlight_to_json).collect(),
            })
            .collect(),
    }
}

fn highlight_to_json(h: &crate::analysis::Highlight) -> JsonHighlight {
    JsonHighlight {
        target: h.target.as_str().to_string(),
        text: h.text.clone(),
        start_line: h.span.start_line,
        start_col: h.span.start_col,
        end_line: h.span.end_line,
        end_col: h.span.end_col,
    }
}

/// Write results as pretty-printed JSON to stdout.
pub fn write_json(
    path: &str,
    config_label: &str,
    files: &[FileHighlights],
    style: &DecorationStyle,
) -> anyhow::Result<()> {
    let report = build_json(path, config_label, files, style);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

/// Write colored, human-readable results to stdout.
pub fn write_pretty(path: &str, files: &[FileHighlights], style: &DecorationStyle) {
    let total: usize = files.iter().map(|f| f.highlights.len()).sum();
    let rgb = hex_to_rgb(&style.color).unwrap_or(Rgb { r: 255, g: 136, b: 0 });

    println!("{} {}", "throwscan".bold(), path.dimmed());
    println!();

    for file in files {
        if file.highlights.is_empty() {
            continue;
        }
        println!("{}", file.path.bold().underline());
        for h in &file.highlights {
            let marker = match h.target {
                HighlightTarget::Declaration => "declaration".yellow(),
                HighlightTarget::Call => "call".cyan(),
            };
            println!(
                "  {:<12} {:<12} {} {}",
                h.span.to_string().dimmed(),
                marker,
                h.text,
                style.text.color(Color::TrueColor {
                    r: rgb.r,
                    g: rgb.g,
                    b: rgb.b
                })
            );
        }
        println!();
    }

    if total == 0 {
        println!("{}", "No might-throw sites flagged.".green());
    } else {
        println!(
            "{} might-throw site{} across {} file{}",
            total.to_string().bold(),
            if total == 1 { "" } else { "s" },
            files.len(),
            if files.len() == 1 { "" } else { "s" },
        );
    }
}
