//! Configuration
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables such as `SIGNAL_PARSER_TELEGRAM__BOT_TOKEN`. A `.env` file in
//! the working directory is read first.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "SIGNAL_PARSER";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub processor: ProcessorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Only messages from this chat are processed; all chats when unset
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub include_channel_posts: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Capacity of the source -> processor channel
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Characters of the message included in parse-failure logs
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_channel_capacity() -> usize {
    100
}

fn default_preview_chars() -> usize {
    100
}

impl Config {
    /// Load config from `path` (may be missing) and the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    pub(crate) fn load_from(path: impl AsRef<Path>, env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(env.prefix_separator("_").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        tracing::debug!(
            telegram = config.telegram.is_some(),
            level = %config.logging.level,
            "Configuration loaded"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.processor.channel_capacity == 0 {
            return Err(config::ConfigError::Message(
                "processor.channel_capacity must be greater than 0".to_string(),
            )
            .into());
        }
        Ok(())
    }
}
