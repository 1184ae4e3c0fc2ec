//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub bustime: BusTimeConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub ratelimit: RateLimitConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Web server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// BusTime feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BusTimeConfig {
    /// API key issued by the transit agency
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_data_feed")]
    pub data_feed: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_predictions")]
    pub max_predictions: u32,
}

fn default_base_url() -> String {
    "https://riderts.app/bustime/api/v3/getpredictions".to_string()
}

fn default_data_feed() -> String {
    "bustime".to_string()
}

fn default_request_timeout() -> u64 {
    5000
}

fn default_max_predictions() -> u32 {
    99
}

impl Default for BusTimeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            data_feed: default_data_feed(),
            request_timeout_ms: default_request_timeout(),
            max_predictions: default_max_predictions(),
        }
    }
}

/// Chat behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Reply language code: "en" or "es"
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

/// SMS rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_message_limit")]
    pub message_limit: u32,

    #[serde(default = "default_window_minutes")]
    pub window_minutes: i64,

    /// Sender IDs exempt from limiting
    #[serde(default)]
    pub allowlist: Vec<String>,
}

fn default_message_limit() -> u32 {
    8
}

fn default_window_minutes() -> i64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            message_limit: default_message_limit(),
            window_minutes: default_window_minutes(),
            allowlist: Vec::new(),
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
            dirs::config_dir().map(|p| p.join("buschat").join("config.toml")),
            Some(PathBuf::from("/etc/buschat/config.toml")),
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

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(host) = std::env::var("BUSCHAT_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("BUSCHAT_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // BusTime overrides (the key name matches the original deployment)
        if let Ok(key) = std::env::var("BUS_API_KEY") {
            self.bustime.api_key = key;
        }
        if let Ok(feed) = std::env::var("RTPIDATAFEED") {
            self.bustime.data_feed = feed;
        }
        if let Ok(url) = std::env::var("BUSCHAT_BUSTIME_URL") {
            self.bustime.base_url = url;
        }

        // Chat overrides
        if let Ok(lang) = std::env::var("BUSCHAT_LANG") {
            self.chat.language = lang;
        }

        // Rate limit overrides
        if let Ok(limit) = std::env::var("MESSAGE_LIMIT") {
            if let Ok(l) = limit.parse() {
                self.ratelimit.message_limit = l;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("BUSCHAT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("BUSCHAT_LOG_FORMAT") {
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
    r#"# BusChat Configuration
#
# Environment variables override these settings:
# - BUSCHAT_HOST
# - BUSCHAT_PORT
# - BUS_API_KEY
# - RTPIDATAFEED
# - BUSCHAT_LANG
# - MESSAGE_LIMIT
# - BUSCHAT_LOG_LEVEL
# - BUSCHAT_LOG_FORMAT

[server]
# Web server host
host = "0.0.0.0"

# Web server port
port = 5000

[bustime]
# API key issued by the transit agency
api_key = ""

# Prediction endpoint
base_url = "https://riderts.app/bustime/api/v3/getpredictions"

# Data feed name
data_feed = "bustime"

# Upstream request timeout (ms)
request_timeout_ms = 5000

# Maximum predictions to request per stop
max_predictions = 99

[chat]
# Reply language: "en" or "es"
language = "en"

[ratelimit]
# SMS interactions allowed per sender per window
message_limit = 8

# Window length (minutes)
window_minutes = 60

# Sender IDs exempt from limiting
allowlist = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
