//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::index::DEFAULT_MAX_MARKERS;
use crate::storage::StoreConfig;
use crate::walk::DEFAULT_MAP_URL;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub diary: DiaryConfig,

    #[serde(default)]
    pub walk: WalkConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Record display and entry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiaryConfig {
    /// chrono format for calendar days
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// chrono format for record timestamps
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Records shown in the home screen's recent list
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,

    /// Markers drawn per calendar cell
    #[serde(default = "default_max_markers")]
    pub max_markers: usize,

    #[serde(default = "default_validate_weight")]
    pub validate_weight_on_entry: bool,
}

fn default_date_format() -> String {
    "%Y/%-m/%-d".to_string()
}

fn default_timestamp_format() -> String {
    "%Y/%-m/%-d %-H:%M:%S".to_string()
}

fn default_recent_count() -> usize {
    3
}

fn default_max_markers() -> usize {
    DEFAULT_MAX_MARKERS
}

fn default_validate_weight() -> bool {
    true
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            timestamp_format: default_timestamp_format(),
            recent_count: default_recent_count(),
            max_markers: default_max_markers(),
            validate_weight_on_entry: default_validate_weight(),
        }
    }
}

impl DiaryConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            validate_weight_on_entry: self.validate_weight_on_entry,
        }
    }
}

/// Walk tracking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WalkConfig {
    /// Base URL for walking-directions deep links
    #[serde(default = "default_map_url")]
    pub map_url: String,
}

fn default_map_url() -> String {
    DEFAULT_MAP_URL.to_string()
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            map_url: default_map_url(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber. `RUST_LOG` wins over `level`.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("pawdiary={}", self.level)));

        let registry = tracing_subscriber::registry().with(filter);
        let result = if self.format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
        } else {
            registry.with(tracing_subscriber::fmt::layer()).try_init()
        };

        if let Err(e) = result {
            eprintln!("Logging already initialised: {}", e);
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("pawdiary").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Diary overrides
        if let Some(format) = var("PAWDIARY_DATE_FORMAT") {
            self.diary.date_format = format;
        }
        if let Some(max) = var("PAWDIARY_MAX_MARKERS") {
            if let Ok(m) = max.parse() {
                self.diary.max_markers = m;
            }
        }

        // Walk overrides
        if let Some(url) = var("PAWDIARY_MAP_URL") {
            self.walk.map_url = url;
        }

        // Logging overrides
        if let Some(level) = var("PAWDIARY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("PAWDIARY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Pawdiary Configuration
#
# Environment variables override these settings:
# - PAWDIARY_DATE_FORMAT
# - PAWDIARY_MAX_MARKERS
# - PAWDIARY_MAP_URL
# - PAWDIARY_LOG_LEVEL
# - PAWDIARY_LOG_FORMAT

[diary]
# chrono format for calendar days (2024/1/5)
date_format = "%Y/%-m/%-d"

# chrono format for record timestamps (2024/1/5 9:03:07)
timestamp_format = "%Y/%-m/%-d %-H:%M:%S"

# Records shown in the recent list
recent_count = 3

# Markers drawn per calendar day
max_markers = 3

# Reject weight entries that are not numbers
validate_weight_on_entry = true

[walk]
# Base URL for walking directions
map_url = "https://www.google.com/maps/dir/"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
