//! Slack incoming-webhook channel.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use super::{Delivery, NotifyChannel};
use crate::error::ChannelError;
use crate::message::SlackMessage;

/// Posts Block Kit documents to one Slack webhook URL.
pub struct SlackChannel {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackChannel {
    /// Create a channel for `webhook_url` that reuses an existing client.
    #[must_use]
    pub fn new(client: reqwest::Client, webhook_url: String) -> Self {
        Self {
            webhook_url,
            client,
        }
    }
}

#[async_trait]
impl NotifyChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, message: &SlackMessage) -> Result<Delivery, ChannelError> {
        let body = serde_json::to_vec(message)?;

        debug!(channel = "slack", bytes = body.len(), "Sending notification");

        let response = self
            .client
            .post(&self.webhook_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            debug!(channel = "slack", status = %status, "Notification sent successfully");
        } else {
            warn!(
                channel = "slack",
                status = %status,
                body = %body,
                "Slack webhook returned non-success status"
            );
        }

        Ok(Delivery {
            status: status.as_u16(),
            body,
        })
    }
}
