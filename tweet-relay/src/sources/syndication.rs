use crate::parser::SourceFormat;
use crate::sources::ListingSource;
use crate::traits::{HttpClient, PostSource};
use crate::types::{PostSummary, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub const SYNDICATION_TIMELINE_URL: &str = "https://cdn.syndication.twimg.com/timeline/profile";

/// JSON profile timeline served by the platform's embed CDN.
pub struct SyndicationSource {
    inner: ListingSource,
}

impl SyndicationSource {
    pub fn new(handle: &str, client: Arc<dyn HttpClient>) -> Self {
        Self {
            inner: ListingSource::new(Self::timeline_url(handle), SourceFormat::Json, client),
        }
    }

    pub fn timeline_url(handle: &str) -> String {
        format!("{}?screen_name={}&limit=20", SYNDICATION_TIMELINE_URL, handle)
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }
}

#[async_trait]
impl PostSource for SyndicationSource {
    fn source_name(&self) -> String {
        "Syndication timeline".to_string()
    }

    async fn fetch_recent(&self) -> Result<Vec<PostSummary>> {
        self.inner.fetch_recent().await
    }
}
