use crate::parser::{extract_post_ids, SourceFormat};
use crate::traits::{HttpClient, PostSource};
use crate::types::{PostSummary, RelayError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// A single upstream endpoint that lists recent posts in a known format.
pub struct ListingSource {
    pub url: String,
    pub format: SourceFormat,
    pub name: Option<String>,
    client: Arc<dyn HttpClient>,
}

impl ListingSource {
    pub fn new(url: String, format: SourceFormat, client: Arc<dyn HttpClient>) -> Self {
        Self {
            url,
            format,
            name: None,
            client,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[async_trait]
impl PostSource for ListingSource {
    fn source_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            let kind = match self.format {
                SourceFormat::Feed => "RSS",
                SourceFormat::Json => "JSON",
            };
            match url::Url::parse(&self.url).ok().and_then(|u| u.host_str().map(str::to_string)) {
                Some(host) => format!("{} ({})", kind, host),
                None => kind.to_string(),
            }
        })
    }

    async fn fetch_recent(&self) -> Result<Vec<PostSummary>> {
        let response = self.client.get(&self.url).await?;

        if response.status != 200 {
            warn!("{} answered HTTP {}", self.source_name(), response.status);
            return Err(RelayError::Status {
                url: self.url.clone(),
                status: response.status,
            });
        }

        let summaries = extract_post_ids(&response.body, self.format);
        info!("{} listed {} post(s)", self.source_name(), summaries.len());
        Ok(summaries)
    }
}
