use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use validator::Validate;

use crate::services::chat_client::DEFAULT_CHAT_TITLE;
use crate::services::retry::RetryPolicy;

/// Process-wide client configuration, resolved once at start-up.
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct Config {
    /// Chat service base URL; also serves the ingestion scan
    #[validate(url)]
    pub api_url: String,

    /// Dataset catalog base URL
    #[validate(url)]
    pub dataset_api_url: String,

    /// Bearer credential for the dataset catalog
    #[validate(length(min = 1))]
    pub dataset_api_key: Option<String>,

    /// Title used when a chat is created without one
    #[validate(length(min = 1))]
    pub default_chat_title: String,

    /// Per-request timeout in seconds
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,

    /// Total attempts for idempotent calls; 1 disables retrying
    #[validate(range(min = 1, max = 10))]
    pub retry_max_attempts: u32,

    /// First backoff delay in milliseconds, doubled on each retry
    #[validate(range(max = 60000))]
    pub retry_base_delay_ms: u64,

    /// Log level (e.g., info, debug, trace)
    pub log_level: String,
}

impl Config {
    /// Defaults, then `~/.smlrag/config.*`, then environment (`SMLRAG__API_URL`, ...).
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(None)
    }

    /// Like [`Config::load`], with an explicit file layered over the home one.
    pub fn load_with(explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        let home = dirs::home_dir().unwrap_or_else(|| ".".into());

        let mut builder = Self::defaults()?.add_source(
            config::File::with_name(&home.join(".smlrag").join("config").to_string_lossy())
                .required(false),
        );
        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("SMLRAG").separator("__"))
            .build()?;
        Self::finish(settings)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("api_url", "http://localhost:5301/api")?
            .set_default("dataset_api_url", "http://localhost/v1")?
            .set_default("default_chat_title", DEFAULT_CHAT_TITLE)?
            .set_default("request_timeout_secs", 30u64)?
            .set_default("retry_max_attempts", 1u32)?
            .set_default("retry_base_delay_ms", 100u64)?
            .set_default("log_level", "info")
    }

    fn finish(settings: config::Config) -> Result<Self, config::ConfigError> {
        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        cfg.api_base_url()?;
        cfg.dataset_base_url()?;
        Ok(cfg)
    }

    pub fn api_base_url(&self) -> Result<Url, config::ConfigError> {
        parse_base(&self.api_url)
    }

    pub fn dataset_base_url(&self) -> Result<Url, config::ConfigError> {
        parse_base(&self.dataset_api_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5301/api".to_string(),
            dataset_api_url: "http://localhost/v1".to_string(),
            dataset_api_key: None,
            default_chat_title: DEFAULT_CHAT_TITLE.to_string(),
            request_timeout_secs: 30,
            retry_max_attempts: 1,
            retry_base_delay_ms: 100,
            log_level: "info".to_string(),
        }
    }
}

fn parse_base(raw: &str) -> Result<Url, config::ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| config::ConfigError::Message(format!("invalid base URL {raw}: {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(config::ConfigError::Message(format!(
            "base URL must be http(s): {raw}"
        )));
    }
    Ok(url)
}
