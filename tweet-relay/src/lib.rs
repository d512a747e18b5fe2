pub mod types;
pub mod traits;
pub mod fetcher;
pub mod parser;
pub mod sources;
pub mod chain;
pub mod resolver;
pub mod formatter;
pub mod webhook;
pub mod state;
pub mod pipeline;
pub mod config;
pub mod cli;

pub use types::*;
pub use traits::{DetailResolver, HttpClient, PostSource, WebhookSender};
pub use fetcher::Fetcher;
pub use parser::{extract_post_ids, SourceFormat};
pub use chain::{ChainHit, ProviderChain};
pub use resolver::FxTwitterResolver;
pub use formatter::{DeliveryBatch, DeliveryFormatter, Embed};
pub use webhook::DiscordWebhook;
pub use state::SeenSet;
pub use pipeline::{CycleOutcome, CycleReport, RelayPipeline};
pub use config::RelayConfig;
pub use cli::Cli;
