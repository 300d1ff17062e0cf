//! Runtime configuration: built-in defaults, an optional TOML file, then environment overrides.

use crate::error::Result;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DOCINDEX_CONFIG";

const DEFAULT_CACHE_CAPACITY: usize = 16;
const DEFAULT_LIMIT: usize = 25;

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Compact => "compact",
            Self::Json => "json",
        })
    }
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory for postcard-encoded parsed indexes. `None` disables the disk cache.
    pub cache_dir: Option<PathBuf>,
    /// Number of loaded indexes kept in memory.
    pub cache_capacity: usize,
    /// Default number of entries returned by listing operations.
    pub default_limit: usize,
    /// Treat unrecognized categories as validation errors.
    pub strict: bool,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: dirs::cache_dir().map(|dir| dir.join("docindex-mcp")),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            default_limit: DEFAULT_LIMIT,
            strict: false,
            log_format: LogFormat::Compact,
        }
    }
}

/// On-disk shape of the config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    cache_dir: Option<PathBuf>,
    no_cache: Option<bool>,
    cache_capacity: Option<usize>,
    default_limit: Option<usize>,
    strict: Option<bool>,
    log_format: Option<LogFormat>,
}

/// An environment override that could not be parsed and was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvWarning {
    pub var: &'static str,
    pub value: String,
    pub kept: String,
}

impl std::fmt::Display for EnvWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid value '{}' for {}, keeping {}",
            self.value, self.var, self.kept
        )
    }
}

impl Config {
    /// Load configuration from the default file location and the process environment.
    ///
    /// Ignored environment values are returned for the caller to log once tracing is up.
    pub fn load() -> Result<(Self, Vec<EnvWarning>)> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(default_config_path);

        let mut config = Self::default();
        if let Some(path) = path {
            config.apply_file(&path)?;
        }
        let warnings = config.apply_env(|key| std::env::var(key).ok());
        Ok((config, warnings))
    }

    /// Merge a TOML config file. A missing file is not an error.
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}", path.display());
                return Ok(());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        self.apply_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(())
    }

    /// Merge config values from TOML text.
    pub fn apply_toml(&mut self, content: &str) -> Result<()> {
        let file: FileConfig = toml::from_str(content).context("Failed to parse TOML")?;

        if let Some(dir) = file.cache_dir {
            self.cache_dir = Some(dir);
        }
        if file.no_cache == Some(true) {
            self.cache_dir = None;
        }
        if let Some(capacity) = file.cache_capacity {
            self.cache_capacity = capacity.max(1);
        }
        if let Some(limit) = file.default_limit {
            self.default_limit = limit.max(1);
        }
        if let Some(strict) = file.strict {
            self.strict = strict;
        }
        if let Some(format) = file.log_format {
            self.log_format = format;
        }
        Ok(())
    }

    /// Apply `DOCINDEX_*` overrides read through `lookup`.
    ///
    /// Unparseable values leave the current value untouched and are reported back.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Vec<EnvWarning> {
        let mut warnings = Vec::new();
        if let Some(dir) = lookup("DOCINDEX_CACHE_DIR").filter(|v| !v.is_empty()) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
        if lookup("DOCINDEX_NO_CACHE").is_some_and(|v| is_truthy(&v)) {
            self.cache_dir = None;
        }
        self.cache_capacity = parse_or_keep(
            &lookup,
            "DOCINDEX_CACHE_CAPACITY",
            self.cache_capacity,
            &mut warnings,
        )
        .max(1);
        self.default_limit = parse_or_keep(
            &lookup,
            "DOCINDEX_DEFAULT_LIMIT",
            self.default_limit,
            &mut warnings,
        )
        .max(1);
        if let Some(strict) = lookup("DOCINDEX_STRICT") {
            self.strict = is_truthy(&strict);
        }
        self.log_format = parse_or_keep(
            &lookup,
            "DOCINDEX_LOG_FORMAT",
            self.log_format,
            &mut warnings,
        );
        warnings
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docindex-mcp").join("config.toml"))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_or_keep<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    current: T,
    warnings: &mut Vec<EnvWarning>,
) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(var) {
        Some(value) => match value.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warnings.push(EnvWarning {
                    var,
                    value,
                    kept: current.to_string(),
                });
                current
            }
        },
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_defaults() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("DOCINDEX_CACHE_DIR", "/tmp/idx"),
            ("DOCINDEX_CACHE_CAPACITY", "4"),
            ("DOCINDEX_STRICT", "yes"),
            ("DOCINDEX_LOG_FORMAT", "json"),
        ]));

        check!(config.cache_dir == Some(PathBuf::from("/tmp/idx")));
        check!(config.cache_capacity == 4);
        check!(config.strict);
        check!(config.log_format == LogFormat::Json);
    }

    #[test]
    fn invalid_env_value_keeps_current() {
        let mut config = Config::default();
        let warnings = config.apply_env(env(&[
            ("DOCINDEX_DEFAULT_LIMIT", "banana"),
            ("DOCINDEX_LOG_FORMAT", "xml"),
            ("DOCINDEX_CACHE_CAPACITY", "8"),
        ]));
        check!(config.default_limit == DEFAULT_LIMIT);
        check!(config.log_format == LogFormat::Compact);
        check!(config.cache_capacity == 8);

        let_assert!([limit, format] = warnings.as_slice());
        check!(limit.var == "DOCINDEX_DEFAULT_LIMIT");
        check!(
            limit.to_string() == "invalid value 'banana' for DOCINDEX_DEFAULT_LIMIT, keeping 25"
        );
        check!(format.var == "DOCINDEX_LOG_FORMAT");
        check!(format.kept == "compact");
    }

    #[test]
    fn valid_env_values_produce_no_warnings() {
        let mut config = Config::default();
        let warnings = config.apply_env(env(&[
            ("DOCINDEX_DEFAULT_LIMIT", "10"),
            ("DOCINDEX_LOG_FORMAT", "json"),
        ]));
        check!(warnings.is_empty());
        check!(config.default_limit == 10);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut config = Config::default();
        config.apply_env(env(&[("DOCINDEX_CACHE_CAPACITY", "0")]));
        check!(config.cache_capacity == 1);
    }

    #[test]
    fn no_cache_wins_over_cache_dir() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("DOCINDEX_CACHE_DIR", "/tmp/idx"),
            ("DOCINDEX_NO_CACHE", "1"),
        ]));
        check!(config.cache_dir.is_none());
    }

    #[test]
    fn toml_file_values_apply() {
        let mut config = Config::default();
        let_assert!(
            Ok(()) = config.apply_toml(
                r#"
                cache_dir = "/var/cache/docindex"
                default_limit = 10
                log_format = "json"
                "#
            )
        );
        check!(config.cache_dir == Some(PathBuf::from("/var/cache/docindex")));
        check!(config.default_limit == 10);
        check!(config.log_format == LogFormat::Json);
        check!(!config.strict);
    }

    #[test]
    fn unknown_toml_key_is_rejected() {
        let mut config = Config::default();
        check!(config.apply_toml("colour = \"blue\"").is_err());
    }

    #[test]
    fn missing_config_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        let_assert!(Ok(()) = config.apply_file(&dir.path().join("absent.toml")));
        check!(config == Config::default());
    }
}
