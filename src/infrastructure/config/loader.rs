use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("database url cannot be empty")]
    EmptyDatabaseUrl,

    #[error("invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("notify timeout must be positive")]
    InvalidNotifyTimeout,

    #[error("analyzer timeout must be positive")]
    InvalidAnalyzerTimeout,

    #[error("chat ids configured but bot token is empty")]
    MissingBotToken,

    #[error("zone cannot be empty")]
    EmptyZone,
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. straitwatch.yaml in the working directory
    /// 3. Environment variables (STRAITWATCH_* prefix, `__` section split)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("straitwatch.yaml"))
            .merge(Env::prefixed("STRAITWATCH_").split("__"))
            .extract()
            .context("failed to extract configuration")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file (tests, alternate deploys).
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    ///
    /// Note: an empty chat id list is valid — the evaluator treats it as a
    /// zero-work short circuit, not an error.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.url.is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        match config.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(ConfigError::InvalidLogLevel(other.to_string())),
        }
        match config.logging.format.as_str() {
            "json" | "pretty" => {}
            other => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        }

        if config.notify.timeout_secs == 0 {
            return Err(ConfigError::InvalidNotifyTimeout);
        }
        if !config.notify.chat_ids.is_empty() && config.notify.bot_token.is_empty() {
            return Err(ConfigError::MissingBotToken);
        }

        if config.analyzer.timeout_secs == 0 {
            return Err(ConfigError::InvalidAnalyzerTimeout);
        }

        if config.zone.is_empty() {
            return Err(ConfigError::EmptyZone);
        }

        Ok(())
    }
}
