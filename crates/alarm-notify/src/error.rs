//! Error types for the alarm forwarder.

use thiserror::Error;

/// Errors that abort a single forwarding invocation.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Secret store unreachable or access denied
    #[error("Failed to read secret {secret_id}: {message}")]
    SecretAccess { secret_id: String, message: String },

    /// Secret has no string value, is not JSON, or lacks the webhook key
    #[error("Invalid secret format: {0}")]
    SecretFormat(String),

    /// Notification payload is missing required data
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// Webhook delivery failed at the transport level
    #[error("Delivery failed: {0}")]
    Delivery(#[from] ChannelError),

    /// Delivery report could not be encoded for the response body
    #[error("Response encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors that can occur when sending to a notification channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
