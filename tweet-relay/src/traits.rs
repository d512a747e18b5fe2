use crate::formatter::DeliveryBatch;
use crate::types::{HttpResponse, PostId, PostSummary, ResolvedPost, Result};
use async_trait::async_trait;

/// Minimal HTTP capability shared by providers, the resolver and the webhook.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse>;
}

/// One upstream listing of recent posts (an RSS mirror, a JSON timeline, ...)
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Human-readable name used in logs
    fn source_name(&self) -> String;

    /// Fetch the most recent page of posts, newest first.
    /// An empty vector means the source had nothing usable.
    async fn fetch_recent(&self) -> Result<Vec<PostSummary>>;
}

/// Looks up the full record for a single post.
#[async_trait]
pub trait DetailResolver: Send + Sync {
    /// Every failure is reported as `RelayError::NotFound`.
    async fn resolve(&self, id: &PostId) -> Result<ResolvedPost>;
}

#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn send(&self, batch: &DeliveryBatch) -> Result<()>;
}
