use crate::parser::SourceFormat;
use crate::sources::ListingSource;
use crate::traits::{HttpClient, PostSource};
use crate::types::{PostSummary, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Public Nitter mirrors, most dependable first.
pub const DEFAULT_MIRRORS: [&str; 5] = [
    "nitter.poast.org",
    "nitter.net",
    "nitter.privacydev.net",
    "xcancel.com",
    "nitter.mutant.tech",
];

/// RSS feed of one account on one Nitter mirror.
pub struct NitterSource {
    host: String,
    inner: ListingSource,
}

impl NitterSource {
    pub fn new(host: &str, handle: &str, client: Arc<dyn HttpClient>) -> Self {
        let url = Self::feed_url(host, handle);
        Self {
            host: host.to_string(),
            inner: ListingSource::new(url, SourceFormat::Feed, client),
        }
    }

    pub fn feed_url(host: &str, handle: &str) -> String {
        format!("https://{}/{}/rss", host, handle)
    }

    /// One source per mirror, in the given order.
    pub fn mirrors(hosts: &[&str], handle: &str, client: Arc<dyn HttpClient>) -> Vec<Self> {
        hosts
            .iter()
            .map(|host| Self::new(host, handle, client.clone()))
            .collect()
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }
}

#[async_trait]
impl PostSource for NitterSource {
    fn source_name(&self) -> String {
        format!("Nitter ({})", self.host)
    }

    async fn fetch_recent(&self) -> Result<Vec<PostSummary>> {
        self.inner.fetch_recent().await
    }
}
