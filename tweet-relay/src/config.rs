use crate::resolver::DEFAULT_DETAIL_API;
use crate::state::DEFAULT_STATE_FILE;
use crate::types::{FetchConfig, RelayError, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_HANDLE: &str = "SoJ_Global";
pub const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Everything the relay needs at runtime.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub webhook_url: String,
    pub handle: String,
    pub interval: Duration,
    /// Source URL templates in priority order; `{handle}` is substituted.
    /// Empty means the built-in chain.
    pub sources: Vec<String>,
    pub detail_api: String,
    pub state_file: PathBuf,
    pub post_delay: Duration,
    pub fetch: FetchConfig,
}

impl RelayConfig {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            handle: DEFAULT_HANDLE.to_string(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            sources: Vec::new(),
            detail_api: DEFAULT_DETAIL_API.to_string(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            post_delay: Duration::from_secs(2),
            fetch: FetchConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.webhook_url.trim().is_empty() {
            return Err(RelayError::Config(
                "DISCORD_WEBHOOK_URL is not set (use --webhook-url or the environment)".to_string(),
            ));
        }
        check_http_url("webhook URL", &self.webhook_url)?;
        check_http_url("detail API", &self.detail_api)?;

        if self.handle.trim().is_empty() {
            return Err(RelayError::Config("account handle must not be empty".to_string()));
        }
        if self.interval.is_zero() {
            return Err(RelayError::Config("polling interval must be positive".to_string()));
        }
        if self.sources.iter().any(|s| s.trim().is_empty()) {
            return Err(RelayError::Config("source URLs must not be empty".to_string()));
        }
        Ok(())
    }
}

fn check_http_url(what: &str, raw: &str) -> Result<()> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(RelayError::Config(format!("{} must be http(s), got {}", what, other))),
    }
}
