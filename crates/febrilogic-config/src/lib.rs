//! Configuration loading for FebriLogic.
//! Reads febrilogic.toml from the current directory or the path in the
//! FEBRILOGIC_CONFIG env var. A missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_ENV: &str = "FEBRILOGIC_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "febrilogic.toml";
pub const SYMPTOM_WEIGHTS_ENV: &str = "SYMPTOM_WEIGHTS_FILE";
pub const BIOMARKER_STATS_ENV: &str = "BIOMARKER_STATS_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_symptom_weights_file")]
    pub symptom_weights_file: PathBuf,
    #[serde(default = "default_biomarker_stats_file")]
    pub biomarker_stats_file: PathBuf,
}

fn default_symptom_weights_file() -> PathBuf { PathBuf::from("data/symptom_weights.csv") }
fn default_biomarker_stats_file() -> PathBuf { PathBuf::from("data/biomarker_stats.csv") }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            symptom_weights_file: default_symptom_weights_file(),
            biomarker_stats_file: default_biomarker_stats_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Candidates reported per distribution.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize { 3 }

impl Default for RankingConfig {
    fn default() -> Self {
        Self { top_k: default_top_k() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; RUST_LOG wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "febrilogic=info,warn".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}

mod tests;

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise FEBRILOGIC_CONFIG is checked,
    /// then febrilogic.toml; if neither file exists the defaults are used.
    /// Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = std::env::var(CONFIG_ENV)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    debug!(path = %path.display(), "No config file, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Replace table paths with SYMPTOM_WEIGHTS_FILE / BIOMARKER_STATS_FILE
    /// when `lookup` yields a non-empty value.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(SYMPTOM_WEIGHTS_ENV).filter(|v| !v.is_empty()) {
            self.data.symptom_weights_file = PathBuf::from(path);
        }
        if let Some(path) = lookup(BIOMARKER_STATS_ENV).filter(|v| !v.is_empty()) {
            self.data.biomarker_stats_file = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ranking.top_k == 0 {
            return Err(ConfigError::Invalid("ranking.top_k must be at least 1".to_string()));
        }
        if self.data.symptom_weights_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data.symptom_weights_file is empty".to_string()));
        }
        if self.data.biomarker_stats_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data.biomarker_stats_file is empty".to_string()));
        }
        Ok(())
    }
}
