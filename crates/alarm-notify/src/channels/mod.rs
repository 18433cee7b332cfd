//! Notification channel implementations.

pub mod slack;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::message::SlackMessage;

/// Outcome of a delivery as reported by the remote end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub status: u16,
    pub body: String,
}

/// Trait for notification channels.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Send a rendered message. The remote status is passed through, not judged.
    async fn send(&self, message: &SlackMessage) -> Result<Delivery, ChannelError>;
}
