//! Command-line interface for throwscan.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::analysis::{AnnotateOptions, Engine};
use crate::config::Config;
use crate::decoration::DecorationStyle;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Default config template written by `throwscan init`.
const DEFAULT_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Flags source locations that may propagate an uncaught exception.
///
/// throwscan statically analyzes TypeScript/JavaScript sources: a function
/// whose body contains an unhandled throw, or a call whose resolved target
/// does, is flagged so an editor can render an inline marker. Unresolvable
/// calls are conservatively flagged; calls into declaration-only typings are
/// not.
#[derive(Parser)]
#[command(name = "throwscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a file or directory tree
    Scan(ScanArgs),
    /// Create a throwscan.yaml config with the defaults written out
    Init(InitArgs),
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Do not flag function declarations
    #[arg(long)]
    pub no_declarations: bool,

    /// Do not flag call and construction sites
    #[arg(long)]
    pub no_calls: bool,

    /// Override the highlight color (hex)
    #[arg(long)]
    pub color: Option<String>,

    /// Override the decoration text
    #[arg(long)]
    pub decoration: Option<String>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "throwscan.yaml")]
    pub output: PathBuf,
}

/// Extensions collected from directory scans. Declaration files (`.d.ts`)
/// are picked up separately as ambient typings.
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"];

/// Collect analyzable sources and ambient declaration files under a root.
fn collect_sources(root: &Path, config: &Config) -> anyhow::Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut sources = Vec::new();
    let mut ambients = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            // Depth 0 is the scan root itself ("." would otherwise match the
            // hidden-directory rule).
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if e.file_type().is_dir() && (name.starts_with('.') || name == "node_modules") {
                return false;
            }
            true
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();

        let rel = path.strip_prefix(root).unwrap_or(path);
        if config.is_path_excluded(rel) {
            continue;
        }

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.ends_with(".d.ts") {
            ambients.push(path.to_path_buf());
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if SOURCE_EXTENSIONS.contains(&ext) {
            sources.push(path.to_path_buf());
        }
    }

    sources.sort();
    ambients.sort();
    Ok((sources, ambients))
}

/// Load config from an explicit path, a discovered file, or the defaults.
fn load_config(args: &ScanArgs) -> anyhow::Result<(Config, String)> {
    if let Some(path) = &args.config {
        let config = Config::parse_file(path)?;
        return Ok((config, path.to_string_lossy().to_string()));
    }
    if let Some(found) = Config::discover(Path::new(".")) {
        let config = Config::parse_file(&found)?;
        return Ok((config, found.to_string_lossy().to_string()));
    }
    Ok((Config::default(), "defaults".to_string()))
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let (mut config, config_label) = match load_config(args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // CLI overrides. Invalid colors take the same silent fallback as
    // configured ones.
    if args.no_declarations {
        config.show_on_declarations = false;
    }
    if args.no_calls {
        config.show_on_calls = false;
    }
    if let Some(color) = &args.color {
        config.highlight_color = color.clone();
    }
    if let Some(decoration) = &args.decoration {
        config.decoration = decoration.clone();
    }

    if !config.enable {
        eprintln!("throwscan is disabled by configuration");
        return Ok(EXIT_SUCCESS);
    }

    let metadata = match std::fs::metadata(&args.path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let (sources, ambient_files) = if metadata.is_dir() {
        collect_sources(&args.path, &config)?
    } else {
        let name = args
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("");
        if name.ends_with(".d.ts") {
            eprintln!("Warning: declaration files have nothing executable to flag");
            (Vec::new(), Vec::new())
        } else {
            (vec![args.path.clone()], Vec::new())
        }
    };

    if sources.is_empty() {
        eprintln!("Warning: no files to scan");
        return Ok(EXIT_SUCCESS);
    }

    let options = AnnotateOptions {
        show_on_declarations: config.show_on_declarations,
        show_on_calls: config.show_on_calls,
    };
    let mut engine = Engine::new(options)?;
    for ambient in &ambient_files {
        if let Err(e) = engine.add_ambient_file(ambient) {
            eprintln!("Warning: failed to load typings {}: {}", ambient.display(), e);
        }
    }

    let results = engine.analyze_files(&sources);
    let style = DecorationStyle::from_config(&config);
    let path_str = args.path.to_string_lossy();

    match args.format.as_str() {
        "json" => report::write_json(&path_str, &config_label, &results, &style)?,
        _ => report::write_pretty(&path_str, &results, &style),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&args.output, DEFAULT_TEMPLATE)?;

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to taste", args.output.display());
    println!("  2. Run: throwscan scan . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_sources_splits_ambients() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("app.ts"), "let x = 1;").unwrap();
        fs::write(temp.path().join("util.js"), "let y = 1;").unwrap();
        fs::write(temp.path().join("vendor.d.ts"), "declare var z: any;").unwrap();
        fs::write(temp.path().join("readme.md"), "# hi").unwrap();
        fs::create_dir(temp.path().join("node_modules")).unwrap();
        fs::write(temp.path().join("node_modules/dep.ts"), "let d = 1;").unwrap();

        let (sources, ambients) = collect_sources(temp.path(), &Config::default()).unwrap();
        let names: Vec<_> = sources
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["app.ts", "util.js"]);
        assert_eq!(ambients.len(), 1);
        assert!(ambients[0].ends_with("vendor.d.ts"));
    }

    #[test]
    fn test_collect_sources_honors_excludes() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("generated")).unwrap();
        fs::write(temp.path().join("generated/api.ts"), "let x = 1;").unwrap();
        fs::write(temp.path().join("app.ts"), "let y = 1;").unwrap();

        let config = Config {
            excluded_paths: vec!["generated/**".to_string()],
            ..Config::default()
        };
        let (sources, _) = collect_sources(temp.path(), &config).unwrap();
        assert_eq!(sources.len(), 1);
        assert!(sources[0].ends_with("app.ts"));
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let parsed: Config = serde_yaml::from_str(DEFAULT_TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.enable, defaults.enable);
        assert_eq!(parsed.show_on_calls, defaults.show_on_calls);
        assert_eq!(parsed.show_on_declarations, defaults.show_on_declarations);
        assert_eq!(parsed.highlight_color, defaults.highlight_color);
        assert_eq!(parsed.decoration, defaults.decoration);
        assert!(parsed.excluded_paths.is_empty());
    }
}
