//! TOML-based configuration.
//!
//! Supports a config file (touchline.toml) with environment variable
//! expansion in path values.
//!
//! Example configuration:
//! ```toml
//! [database]
//! stats_path = "${TOUCHLINE_DATA_DIR}/stats.db"
//! reports_path = "./touchline.db"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

static ENV_VAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
}

/// Database locations. The stats source and the report store may share
/// one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file holding the player/team/match/stat tables.
    pub stats_path: PathBuf,
    /// SQLite file holding the reports table.
    pub reports_path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            stats_path: PathBuf::from("./touchline.db"),
            reports_path: PathBuf::from("./touchline.db"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, expanding `${VAR}` references
    /// from the environment.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        let expanded = expand_env_vars(&content)?;
        Ok(toml::from_str(&expanded)?)
    }

    /// Load from an explicit path, or fall back to `touchline.toml` in
    /// the working directory, or defaults if no file exists.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default_path = Path::new("touchline.toml");
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

fn expand_env_vars(content: &str) -> ConfigResult<String> {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for caps in ENV_VAR_RE.captures_iter(content) {
        let whole = caps.get(0).unwrap();
        let name = &caps[1];
        let value =
            env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        out.push_str(&content[last..whole.start()]);
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&content[last..]);
    Ok(out)
}
