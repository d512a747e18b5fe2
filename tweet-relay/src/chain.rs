use crate::traits::PostSource;
use crate::types::PostSummary;
use tracing::{debug, info, warn};

/// Posts returned by the first source that produced any.
#[derive(Debug, Clone)]
pub struct ChainHit {
    pub source: String,
    pub posts: Vec<PostSummary>,
}

/// Ordered first-success list of post sources.
///
/// Every call starts again at the first source; nothing about earlier
/// failures is remembered between calls.
pub struct ProviderChain {
    sources: Vec<Box<dyn PostSource>>,
}

impl ProviderChain {
    pub fn new(sources: Vec<Box<dyn PostSource>>) -> Self {
        Self { sources }
    }

    pub fn push(&mut self, source: Box<dyn PostSource>) {
        debug!("Adding source to chain: {}", source.source_name());
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.source_name()).collect()
    }

    /// Returns `None` when every source failed or came back empty.
    pub async fn fetch_recent_post_ids(&self) -> Option<ChainHit> {
        for source in &self.sources {
            let name = source.source_name();
            match source.fetch_recent().await {
                Ok(posts) if !posts.is_empty() => {
                    info!("Using {} post(s) from {}", posts.len(), name);
                    return Some(ChainHit { source: name, posts });
                }
                Ok(_) => {
                    warn!("{} returned no posts, trying next source", name);
                }
                Err(e) => {
                    warn!("{} failed: {}, trying next source", name, e);
                }
            }
        }

        warn!("All {} sources failed", self.sources.len());
        None
    }
}
