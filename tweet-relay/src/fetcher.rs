use crate::traits::HttpClient;
use crate::types::{FetchConfig, HttpResponse, Result};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::{Client, RequestBuilder};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// reqwest-backed `HttpClient`.
///
/// Only transport failures (connect, timeout, truncated body) are retried.
/// Any HTTP status, including 5xx, is handed back to the caller untouched so
/// the provider chain can fall through to the next source immediately.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn retry_backoff(&self) -> ExponentialBackoff<backoff::SystemClock> {
        let base = Duration::from_secs(self.config.retry_delay_seconds);
        ExponentialBackoff {
            current_interval: base,
            initial_interval: base,
            max_interval: base * 8,
            multiplier: 2.0,
            max_elapsed_time: Some(base * 30),
            ..Default::default()
        }
    }

    async fn execute<F>(&self, url: &str, build: F) -> Result<HttpResponse>
    where
        F: Fn() -> RequestBuilder,
    {
        let start_time = Instant::now();
        let mut backoff = self.retry_backoff();
        let mut attempt = 0;

        loop {
            match Self::send_once(build()).await {
                Ok(response) => {
                    debug!(
                        "{} -> HTTP {} ({} bytes, {}ms)",
                        url,
                        response.status,
                        response.body.len(),
                        start_time.elapsed().as_millis()
                    );
                    return Ok(response);
                }
                Err(e) => {
                    if attempt < self.config.max_retries {
                        if let Some(delay) = backoff.next_backoff() {
                            attempt += 1;
                            warn!("Attempt {} failed for {}, retrying in {:?}: {}", attempt, url, delay, e);
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                    }
                    error!("Request to {} failed after {} attempt(s): {}", url, attempt + 1, e);
                    return Err(e);
                }
            }
        }
    }

    async fn send_once(request: RequestBuilder) -> Result<HttpResponse> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClient for Fetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.execute(url, || self.client.get(url)).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        self.execute(url, || self.client.post(url).json(body)).await
    }
}
