//! Configuration loading and generation.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::store::DEFAULT_ITEMS_COLUMN;

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable debug logging to file
    pub debug: bool,

    /// Path to log directory
    pub log_path: PathBuf,

    /// Directory holding named datasets (`<data_dir>/<name>.csv`)
    pub data_dir: PathBuf,

    /// Defaults for mining queries
    pub mining: MiningConfig,
}

/// `[mining]` section: defaults applied when a request leaves them out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Minimum support, percent of transactions (0 to 100)
    pub min_support: f64,

    /// Minimum confidence, percent (0 to 100)
    pub min_confidence: f64,

    /// CSV column holding the `", "`-joined items
    pub items_column: String,

    /// Upper bound on frequent single items; 0 disables the check
    pub max_frequent_items: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            log_path: default_config_dir().join("logs"),
            data_dir: default_config_dir().join("datasets"),
            mining: MiningConfig::default(),
        }
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 10.0,
            min_confidence: 50.0,
            items_column: DEFAULT_ITEMS_COLUMN.to_string(),
            max_frequent_items: 20,
        }
    }
}

impl MiningConfig {
    pub fn frequent_item_limit(&self) -> Option<usize> {
        (self.max_frequent_items > 0).then_some(self.max_frequent_items)
    }
}

/// Default config directory: ~/.config/basket-miner
fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("basket-miner")
}

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_dir().join("config.toml")
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// If the file doesn't exist, returns default configuration.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let config_dir = path.parent();

        if !path.exists() {
            let mut config = Config::default();
            if let Some(dir) = config_dir {
                config.log_path = dir.join("logs");
                config.data_dir = dir.join("datasets");
            }
            return Ok(config);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // Unset directories follow the config file's location
        if let Some(dir) = config_dir {
            if config.log_path == default_config_dir().join("logs") {
                config.log_path = dir.join("logs");
            }
            if config.data_dir == default_config_dir().join("datasets") {
                config.data_dir = dir.join("datasets");
            }
        }

        Ok(config)
    }

    /// Generate default configuration file at the default path.
    pub fn generate_default() -> Result<()> {
        Self::generate_at(&Self::default_path())
    }

    /// Generate default configuration file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = Self::default_config_content();
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    fn default_config_content() -> String {
        r#"# basket-miner configuration file
# https://github.com/owayo/basket-miner

# Enable debug logging to file (default: false)
debug = false

# Path to log directory (default: ~/.config/basket-miner/logs)
# log_path = "~/.config/basket-miner/logs"

# Directory for named datasets, used by `--dataset NAME` (default: ~/.config/basket-miner/datasets)
# data_dir = "~/.config/basket-miner/datasets"

[mining]
# Minimum support, percent of transactions (0-100)
min_support = 10.0

# Minimum confidence, percent (0-100)
min_confidence = 50.0

# CSV column holding the items, joined by ", "
items_column = "Items"

# Refuse queries with more frequent single items than this (0 = no limit).
# Candidate itemsets grow as 2^k.
max_frequent_items = 20
"#
        .to_string()
    }
}
