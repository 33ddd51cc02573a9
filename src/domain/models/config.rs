//! Runtime configuration.

use serde::{Deserialize, Serialize};

/// Main configuration structure for straitwatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Notification destinations
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Reasoning service configuration
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Monitored zone identifier in the traffic tables
    #[serde(default = "default_zone")]
    pub zone: String,
}

fn default_zone() -> String {
    "strait".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            notify: NotifyConfig::default(),
            analyzer: AnalyzerConfig::default(),
            zone: default_zone(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// `SQLite` database URL (e.g. "sqlite:straitwatch.db")
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite:straitwatch.db".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
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

/// Telegram notification configuration. An empty chat id list means the
/// evaluator short-circuits with a zero-work result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NotifyConfig {
    /// Bot token; usually supplied via STRAITWATCH_NOTIFY__BOT_TOKEN
    #[serde(default)]
    pub bot_token: String,

    /// Destination chat ids
    #[serde(default)]
    pub chat_ids: Vec<String>,

    /// Per-send timeout in seconds
    #[serde(default = "default_notify_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_notify_timeout_secs() -> u64 {
    10
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_ids: Vec::new(),
            timeout_secs: default_notify_timeout_secs(),
        }
    }
}

/// Reasoning service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalyzerConfig {
    /// API key; usually supplied via STRAITWATCH_ANALYZER__API_KEY
    #[serde(default)]
    pub api_key: String,

    /// Base URL for the messages endpoint (overridable for tests/proxies)
    #[serde(default = "default_analyzer_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_analyzer_model")]
    pub model: String,

    /// Maximum tokens per analysis response
    #[serde(default = "default_analyzer_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds; a timeout skips the cycle
    #[serde(default = "default_analyzer_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_analyzer_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_analyzer_model() -> String {
    "claude-sonnet-4-5".to_string()
}

const fn default_analyzer_max_tokens() -> u32 {
    4096
}

const fn default_analyzer_timeout_secs() -> u64 {
    25
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_analyzer_base_url(),
            model: default_analyzer_model(),
            max_tokens: default_analyzer_max_tokens(),
            timeout_secs: default_analyzer_timeout_secs(),
        }
    }
}
