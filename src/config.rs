//! Configuration types for Forager

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ForagerError, ForagerResult};
use crate::resolver::SearchPolicy;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchPolicy,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Root of the observation API, without the `/v1` path
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    /// Decimal places shown for distances in tables
    #[serde(default = "default_precision")]
    pub precision: usize,
}

// Default value functions
fn default_base_url() -> String { "https://api.inaturalist.org".to_string() }
fn default_user_agent() -> String { format!("Forager/{}", crate::VERSION) }
fn default_timeout_secs() -> u64 { 30 }
fn default_connect_timeout_secs() -> u64 { 10 }
fn default_format() -> OutputFormat { OutputFormat::Table }
fn default_precision() -> usize { 2 }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            precision: default_precision(),
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> ForagerResult<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| ForagerError::Configuration(format!("Failed to parse config: {}", e)))?;
    config.search.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> ForagerResult<()> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| ForagerError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Default config location: `~/.forager/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".forager").join("config.toml"))
}

/// Pick the config file: explicit path, then `FORAGER_CONFIG`, then the
/// default location if it exists
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("FORAGER_CONFIG") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    default_config_path().filter(|p| p.exists())
}

/// Load the selected config file, or defaults when there is none
pub fn load_or_default(explicit: Option<&Path>) -> ForagerResult<Config> {
    match resolve_config_path(explicit) {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            load_config(&path)
        }
        None => Ok(Config::default()),
    }
}
