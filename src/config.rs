use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::parser::ParserOptions;
use crate::pretty::{UnparseOptions, WrapOperator};

pub const CONFIG_FILE_NAME: &str = "celparse.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("{}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("{}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}

impl ConfigError {
    fn invalid(path: &Path, message: impl Into<String>) -> Self {
        Self::Invalid { path: path.to_path_buf(), message: message.into() }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } | Self::Invalid { path, .. } => path,
        }
    }
}

/// Resolved settings for the parser and the unparser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub parser: ParserOptions,
    pub unparse: UnparseOptions,
}

// ---- TOML deserialization types ----

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    parser: ParserOptions,
    #[serde(default)]
    unparse: TomlUnparse,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlUnparse {
    wrap_on_column: Option<usize>,
    wrap_on_operators: Option<Vec<String>>,
    wrap_after_column_limit: Option<bool>,
}

// ---- Discovery ----

/// Walk up from `start_dir` looking for `celparse.toml`. The walk stops at a
/// directory containing `.git` (file or dir) or at the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            return None;
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Load an explicitly named config file, or discover one from `cwd`. No file
/// at all yields the defaults.
pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match find_config(cwd) {
            Some(p) => p,
            None => {
                tracing::debug!(dir = %cwd.display(), "no {CONFIG_FILE_NAME} found, using defaults");
                return Ok(Config::default());
            }
        },
    };
    load_config(&path)
}

// ---- Parsing & validation ----

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let config = parse_config(&text, path)?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

/// Parse config text. `path` is only used to label errors.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let raw: TomlConfig = toml::from_str(text)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

    if raw.parser.max_recursion_depth == 0 {
        return Err(ConfigError::invalid(path, "parser.max_recursion_depth must be at least 1"));
    }

    let mut unparse = UnparseOptions::default();
    if let Some(column) = raw.unparse.wrap_on_column {
        if column == 0 {
            return Err(ConfigError::invalid(path, "unparse.wrap_on_column must be at least 1"));
        }
        unparse.wrap_on_column = column;
    }
    if let Some(symbols) = raw.unparse.wrap_on_operators {
        unparse.wrap_on_operators = symbols
            .iter()
            .map(|s| {
                WrapOperator::from_symbol(s).ok_or_else(|| {
                    ConfigError::invalid(path, format!("unparse.wrap_on_operators: cannot wrap on '{s}'"))
                })
            })
            .collect::<Result<_, _>>()?;
    }
    if let Some(after) = raw.unparse.wrap_after_column_limit {
        unparse.wrap_after_column_limit = after;
    }

    Ok(Config { parser: raw.parser, unparse })
}
