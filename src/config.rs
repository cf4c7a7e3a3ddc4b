//! Configuration for the might-throw highlighter.
//!
//! Read fresh per pass from a YAML file (auto-discovered) plus host/CLI
//! overrides. Every irregular value degrades to a documented default; nothing
//! here raises a user-visible error for bad option content.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["throwscan.yaml", ".throwscan.yaml"];

/// Built-in highlight color, also the fallback for invalid configured colors.
pub const DEFAULT_COLOR: &str = "#ff8800";

/// Built-in decoration text rendered after a flagged range.
pub const DEFAULT_DECORATION: &str = "!";

/// 3- or 6-digit hex color, case-insensitive.
static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9A-Fa-f]{3}){1,2}$").expect("static regex"));

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// User-facing options. Unknown keys are ignored; missing keys take defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Gates whether analysis runs at all.
    pub enable: bool,
    /// Highlight function-like declarations whose body might throw.
    pub show_on_declarations: bool,
    /// Highlight call/construction sites whose target might throw.
    pub show_on_calls: bool,
    /// Hex color for the decoration text; invalid values silently fall back
    /// to the default.
    pub highlight_color: String,
    /// Literal text rendered after a flagged range.
    pub decoration: String,
    /// Glob patterns for paths to skip in directory scans.
    pub excluded_paths: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable: true,
            show_on_declarations: true,
            show_on_calls: true,
            highlight_color: DEFAULT_COLOR.to_string(),
            decoration: DEFAULT_DECORATION.to_string(),
            excluded_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Discover a config file in the given directory. Absence is not an
    /// error; the defaults apply.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
    }

    /// The configured color if valid, the built-in default otherwise.
    pub fn effective_color(&self) -> &str {
        if is_valid_hex_color(&self.highlight_color) {
            &self.highlight_color
        } else {
            DEFAULT_COLOR
        }
    }

    /// Check a path against the excluded_paths globs.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();
        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                if glob.compile_matcher().is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }
}

/// Validate a hex color string (`#abc` or `#aabbcc`, case-insensitive).
pub fn is_valid_hex_color(hex: &str) -> bool {
    HEX_COLOR.is_match(hex)
}
