//! Driver configuration.
//!
//! Configuration is resolved in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via DFARUN_CONFIG or --config)
//! 3. Environment variables
//! 4. Command-line flags

use dfarun_core::{BlankLines, BuildOptions, EvalOptions, SelfLoopPolicy, SymbolEncoding};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Driver configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Description parsing options.
    pub format: BuildOptions,
    /// Evaluation options.
    pub engine: EvalOptions,
    /// Output options.
    pub output: OutputConfig,
    /// Environment overrides that were ignored, logged once logging is up.
    #[serde(skip)]
    pub ignored_overrides: Vec<String>,
}

impl Config {
    /// Loads configuration from `path` if given, then applies environment
    /// variable overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    ///
    /// Unrecognized values are ignored and recorded in `ignored_overrides`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("DFARUN_SELF_LOOPS") {
            match parse_self_loops(&value) {
                Ok(policy) => self.engine.self_loops = policy,
                Err(e) => self.ignore("DFARUN_SELF_LOOPS", e),
            }
        }

        if let Some(value) = lookup("DFARUN_SYMBOLS") {
            match parse_symbols(&value) {
                Ok(encoding) => self.format.symbols = encoding,
                Err(e) => self.ignore("DFARUN_SYMBOLS", e),
            }
        }

        if let Some(value) = lookup("DFARUN_BLANK_LINES") {
            match parse_blank_lines(&value) {
                Ok(policy) => self.format.blank_lines = policy,
                Err(e) => self.ignore("DFARUN_BLANK_LINES", e),
            }
        }

        self.output.apply_overrides(lookup);
    }

    fn ignore(&mut self, key: &str, reason: String) {
        let message = format!("Ignoring {}: {}", key, reason);
        self.ignored_overrides.push(message);
    }
}

/// Returns true if `DFARUN_JSON` asks for JSON output.
///
/// Used when the configuration itself failed to load.
pub fn json_requested_by_env() -> bool {
    std::env::var("DFARUN_JSON")
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print a JSON report instead of text.
    pub json: bool,
    /// Print the transition table before evaluating.
    pub dump: bool,
    /// Colorize text output.
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            dump: false,
            color: true,
        }
    }
}

impl OutputConfig {
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(json) = lookup("DFARUN_JSON") {
            self.json = is_truthy(&json);
        }
        if let Some(dump) = lookup("DFARUN_DUMP") {
            self.dump = is_truthy(&dump);
        }
        if let Some(color) = lookup("DFARUN_COLOR") {
            self.color = is_truthy(&color);
        }
    }
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.to_lowercase() == "true"
}

/// Parses a self-loop policy name (`skip` or `follow`).
pub fn parse_self_loops(value: &str) -> Result<SelfLoopPolicy, String> {
    match value.to_lowercase().as_str() {
        "skip" => Ok(SelfLoopPolicy::Skip),
        "follow" => Ok(SelfLoopPolicy::Follow),
        other => Err(format!(
            "unknown self-loop policy '{}' (expected skip or follow)",
            other
        )),
    }
}

/// Parses a symbol encoding name (`ordinal` or `literal`).
pub fn parse_symbols(value: &str) -> Result<SymbolEncoding, String> {
    match value.to_lowercase().as_str() {
        "ordinal" => Ok(SymbolEncoding::Ordinal),
        "literal" => Ok(SymbolEncoding::Literal),
        other => Err(format!(
            "unknown symbol encoding '{}' (expected ordinal or literal)",
            other
        )),
    }
}

/// Parses a blank line policy name (`skip` or `reject`).
pub fn parse_blank_lines(value: &str) -> Result<BlankLines, String> {
    match value.to_lowercase().as_str() {
        "skip" => Ok(BlankLines::Skip),
        "reject" => Ok(BlankLines::Reject),
        other => Err(format!(
            "unknown blank line policy '{}' (expected skip or reject)",
            other
        )),
    }
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
