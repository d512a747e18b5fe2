use crate::chain::ProviderChain;
use crate::config::RelayConfig;
use crate::fetcher::Fetcher;
use crate::formatter::DeliveryFormatter;
use crate::resolver::FxTwitterResolver;
use crate::sources;
use crate::state::SeenSet;
use crate::traits::{DetailResolver, HttpClient, WebhookSender};
use crate::types::{PostId, PostSummary, Result};
use crate::webhook::DiscordWebhook;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Spacing between webhook calls inside one cycle.
pub const DEFAULT_POST_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No source produced anything, or the cycle failed.
    NoCandidates,
    /// First run: existing posts were recorded without being sent.
    Bootstrapped { acknowledged: usize },
    /// New posts were processed.
    Delivered { delivered: usize, failed: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub source: Option<String>,
    pub fetched: usize,
    pub new: usize,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    fn empty() -> Self {
        Self {
            source: None,
            fetched: 0,
            new: 0,
            outcome: CycleOutcome::NoCandidates,
        }
    }

    pub fn delivered(&self) -> usize {
        match self.outcome {
            CycleOutcome::Delivered { delivered, .. } => delivered,
            _ => 0,
        }
    }
}

/// Drives polling cycles: fetch, diff against the seen set, deliver, record.
pub struct RelayPipeline {
    chain: ProviderChain,
    resolver: Box<dyn DetailResolver>,
    formatter: DeliveryFormatter,
    sender: Box<dyn WebhookSender>,
    seen: SeenSet,
    bootstrap_pending: bool,
    post_delay: Duration,
}

impl RelayPipeline {
    /// A seen set that is empty now means the first successful fetch only
    /// acknowledges existing posts instead of sending them.
    pub fn new(
        chain: ProviderChain,
        resolver: Box<dyn DetailResolver>,
        sender: Box<dyn WebhookSender>,
        seen: SeenSet,
    ) -> Self {
        let bootstrap_pending = seen.is_empty();
        Self {
            chain,
            resolver,
            formatter: DeliveryFormatter::default(),
            sender,
            seen,
            bootstrap_pending,
            post_delay: DEFAULT_POST_DELAY,
        }
    }

    /// Wires the production pipeline: reqwest client, configured or default
    /// sources, FxTwitter resolver, Discord webhook and the on-disk seen set.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        config.validate()?;

        let client: Arc<dyn HttpClient> = Arc::new(Fetcher::new(config.fetch.clone())?);
        let source_list = if config.sources.is_empty() {
            sources::default_chain(&config.handle, client.clone())
        } else {
            sources::from_templates(&config.sources, &config.handle, client.clone())
        };
        let chain = ProviderChain::new(source_list);
        info!("Source order: {}", chain.source_names().join(" -> "));

        let resolver = FxTwitterResolver::new(client.clone(), config.detail_api.clone(), config.handle.clone());
        let sender = DiscordWebhook::new(client, config.webhook_url.clone());
        let seen = SeenSet::load(&config.state_file)?;

        Ok(Self::new(chain, Box::new(resolver), Box::new(sender), seen).with_post_delay(config.post_delay))
    }

    pub fn with_post_delay(mut self, post_delay: Duration) -> Self {
        self.post_delay = post_delay;
        self
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn bootstrap_pending(&self) -> bool {
        self.bootstrap_pending
    }

    /// Runs one cycle, never failing: errors are logged and reported as an empty cycle.
    pub async fn tick(&mut self) -> CycleReport {
        match self.run_one_cycle().await {
            Ok(report) => report,
            Err(e) => {
                error!("Cycle aborted: {}", e);
                CycleReport::empty()
            }
        }
    }

    /// Polls forever, one cycle per `interval`.
    pub async fn run_forever(&mut self, interval: Duration) {
        info!(
            "Polling {} source(s) every {:?}",
            self.chain.len(),
            interval
        );
        loop {
            let report = self.tick().await;
            debug!("Cycle finished: {:?}", report);
            sleep(interval).await;
        }
    }

    pub async fn run_one_cycle(&mut self) -> Result<CycleReport> {
        let Some(hit) = self.chain.fetch_recent_post_ids().await else {
            info!("No posts available from any source this cycle");
            return Ok(CycleReport::empty());
        };

        let fetched = hit.posts.len();
        let fresh: Vec<PostSummary> = hit
            .posts
            .into_iter()
            .filter(|summary| !self.seen.contains(&summary.id))
            .collect();
        let new = fresh.len();

        let outcome = if self.bootstrap_pending {
            self.bootstrap(fresh)
        } else {
            self.deliver(fresh).await
        };

        Ok(CycleReport {
            source: Some(hit.source),
            fetched,
            new,
            outcome,
        })
    }

    fn bootstrap(&mut self, fresh: Vec<PostSummary>) -> CycleOutcome {
        let acknowledged = self.seen.insert_all(fresh.into_iter().map(|s| s.id));
        self.bootstrap_pending = false;
        info!(
            "First run: recorded {} existing post(s) without sending them",
            acknowledged
        );
        CycleOutcome::Bootstrapped { acknowledged }
    }

    async fn deliver(&mut self, fresh: Vec<PostSummary>) -> CycleOutcome {
        if fresh.is_empty() {
            info!("No new posts");
            return CycleOutcome::Delivered {
                delivered: 0,
                failed: 0,
            };
        }

        let mut delivered = 0;
        let mut failed = 0;
        let mut sent_any = false;
        let total = fresh.len();

        // Sources list newest first; send oldest first.
        for summary in fresh.into_iter().rev() {
            match self.relay_post(&summary.id, None, &mut sent_any).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!("Post {} not relayed, marking it seen anyway: {}", summary.id, e);
                    failed += 1;
                }
            }
            self.seen.insert(summary.id);
        }

        info!("Processed {} new post(s): {} delivered, {} failed", total, delivered, failed);
        CycleOutcome::Delivered { delivered, failed }
    }

    /// Resolves, formats and sends one post. The post delay is applied only
    /// when an earlier send in the same batch already went out.
    async fn relay_post(
        &self,
        id: &PostId,
        sequence_label: Option<&str>,
        sent_any: &mut bool,
    ) -> Result<()> {
        let post = self.resolver.resolve(id).await?;
        let batch = self.formatter.format(&post, sequence_label);

        if *sent_any && !self.post_delay.is_zero() {
            sleep(self.post_delay).await;
        }
        *sent_any = true;
        self.sender.send(&batch).await
    }

    /// Sends the newest `count` posts labelled `TEST #n`, ignoring and not
    /// touching the seen set. Returns how many were delivered.
    pub async fn send_latest(&self, count: usize) -> usize {
        let Some(hit) = self.chain.fetch_recent_post_ids().await else {
            warn!("Could not get any post ids");
            return 0;
        };

        let mut sent = 0;
        let mut sent_any = false;
        for (index, summary) in hit.posts.iter().take(count).enumerate() {
            let label = format!("TEST #{}", index + 1);
            match self.relay_post(&summary.id, Some(&label), &mut sent_any).await {
                Ok(()) => sent += 1,
                Err(e) => warn!("{} ({}) failed: {}", label, summary.id, e),
            }
        }

        info!("Sent {}/{} test post(s)", sent, count.min(hit.posts.len()));
        sent
    }
}
