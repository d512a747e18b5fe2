use crate::config::{RelayConfig, DEFAULT_HANDLE, DEFAULT_INTERVAL_SECS};
use crate::resolver::DEFAULT_DETAIL_API;
use crate::state::DEFAULT_STATE_FILE;
use crate::types::FetchConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Relay new posts from an X/Twitter account to a Discord webhook.
#[derive(Debug, Parser)]
#[command(name = "tweet-relay", version, about)]
pub struct Cli {
    /// Discord webhook URL (required)
    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Account to follow, without the leading @
    #[arg(long, env = "RELAY_HANDLE", default_value = DEFAULT_HANDLE)]
    pub handle: String,

    /// Seconds between polling cycles
    #[arg(long = "interval", env = "RELAY_INTERVAL_SECS", default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval_secs: u64,

    /// Source URL, tried in the order given; `{handle}` is substituted.
    /// Defaults to the syndication timeline followed by several Nitter mirrors.
    #[arg(long = "source", env = "RELAY_SOURCES", value_delimiter = ',')]
    pub sources: Vec<String>,

    /// Base URL of the FxTwitter-compatible detail API
    #[arg(long, env = "RELAY_DETAIL_API", default_value = DEFAULT_DETAIL_API)]
    pub detail_api: String,

    /// Where seen post ids are stored
    #[arg(long, env = "RELAY_STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    pub state_file: PathBuf,

    /// Pause between two webhook posts, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub post_delay_ms: u64,

    /// HTTP timeout in seconds
    #[arg(long = "timeout", default_value_t = 15)]
    pub timeout_secs: u64,

    /// Retries for connection failures and timeouts
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Send the latest N posts labelled as tests, without touching the state file
    #[arg(long, value_name = "N", conflicts_with = "once")]
    pub test_latest: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn to_config(&self) -> RelayConfig {
        RelayConfig {
            webhook_url: self.webhook_url.clone().unwrap_or_default(),
            handle: self.handle.trim_start_matches('@').to_string(),
            interval: Duration::from_secs(self.interval_secs),
            sources: self
                .sources
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            detail_api: self.detail_api.clone(),
            state_file: self.state_file.clone(),
            post_delay: Duration::from_millis(self.post_delay_ms),
            fetch: FetchConfig {
                timeout_seconds: self.timeout_secs,
                max_retries: self.retries,
                ..FetchConfig::default()
            },
        }
    }
}
