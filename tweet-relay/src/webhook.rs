use crate::formatter::DeliveryBatch;
use crate::traits::{HttpClient, WebhookSender};
use crate::types::{RelayError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Posts delivery batches to a Discord-compatible webhook.
pub struct DiscordWebhook {
    client: Arc<dyn HttpClient>,
    url: String,
}

impl DiscordWebhook {
    pub fn new(client: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl WebhookSender for DiscordWebhook {
    async fn send(&self, batch: &DeliveryBatch) -> Result<()> {
        let payload = batch.to_json()?;
        debug!("Posting {} embed(s) to webhook", batch.embeds.len());

        let response = self.client.post_json(&self.url, &payload).await?;
        if !response.is_success() {
            return Err(RelayError::Delivery {
                status: response.status,
                body: response.body.chars().take(200).collect(),
            });
        }

        let link = batch
            .embeds
            .first()
            .and_then(|embed| embed.url.as_deref())
            .unwrap_or_default();
        info!("Delivered {} to webhook", link);
        Ok(())
    }
}
