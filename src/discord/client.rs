use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::types::WebhookPayload;
use crate::config::WEBHOOK_ENV;
use crate::errors::ChannelError;

/// Seconds to wait when a 429 carries no usable `retry-after` header
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Destination for outbound notifications
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    fn enabled(&self) -> bool;

    async fn send(&self, payload: &WebhookPayload) -> Result<(), ChannelError>;
}

/// Posts payloads to a Discord webhook URL
pub struct DiscordWebhook {
    client: Client,
    webhook_url: Option<String>,
}

impl DiscordWebhook {
    /// A channel with no URL is still usable: every send fails with
    /// [`ChannelError::NotConfigured`].
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }
}

#[async_trait]
impl NotifyChannel for DiscordWebhook {
    fn name(&self) -> &'static str {
        "discord"
    }

    fn enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    async fn send(&self, payload: &WebhookPayload) -> Result<(), ChannelError> {
        let webhook_url = self
            .webhook_url
            .as_ref()
            .ok_or_else(|| ChannelError::NotConfigured(WEBHOOK_ENV.to_string()))?;

        let response = self.client.post(webhook_url).json(payload).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<f64>().ok())
                .map(|secs| secs.ceil() as u64)
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            log::warn!("Rate limited by Discord, retry after {retry_after_secs}s");
            return Err(ChannelError::RateLimited { retry_after_secs });
        }

        let body = response.text().await.unwrap_or_default();
        Err(ChannelError::Rejected { status, body })
    }
}
