//! Webhook URL retrieval from AWS Secrets Manager.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::ForwarderConfig;
use crate::error::ForwardError;

/// Key inside the secret JSON that holds the webhook URL.
pub const WEBHOOK_URL_KEY: &str = "webhook_url";

/// Source of the Slack webhook URL.
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Fetch the webhook URL. Called once per invocation, never retried.
    async fn webhook_url(&self) -> Result<String, ForwardError>;
}

/// Reads the webhook secret from Secrets Manager.
pub struct SecretsManagerSource {
    client: aws_sdk_secretsmanager::Client,
    secret_id: String,
}

impl SecretsManagerSource {
    /// Build a client pinned to the configured secret region.
    pub async fn from_config(config: &ForwarderConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.secret_region.clone()))
            .load()
            .await;

        Self {
            client: aws_sdk_secretsmanager::Client::new(&sdk_config),
            secret_id: config.secret_id.clone(),
        }
    }
}

#[async_trait]
impl SecretSource for SecretsManagerSource {
    async fn webhook_url(&self) -> Result<String, ForwardError> {
        debug!(secret_id = %self.secret_id, "Fetching webhook secret");

        let output = self
            .client
            .get_secret_value()
            .secret_id(&self.secret_id)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!(secret_id = %self.secret_id, error = %message, "Error getting secret");
                ForwardError::SecretAccess {
                    secret_id: self.secret_id.clone(),
                    message,
                }
            })?;

        webhook_url_from_secret(output.secret_string())
    }
}

/// Extract the webhook URL from a secret's `SecretString`.
///
/// Binary secrets carry no string value and are rejected as malformed.
fn webhook_url_from_secret(secret_string: Option<&str>) -> Result<String, ForwardError> {
    let raw = secret_string.ok_or_else(|| {
        error!("Secret has no string value");
        ForwardError::SecretFormat("secret has no string value".to_string())
    })?;

    parse_webhook_secret(raw)
}

/// Extract the webhook URL from a secret's JSON string.
pub fn parse_webhook_secret(raw: &str) -> Result<String, ForwardError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        error!("Secret value is not valid JSON");
        ForwardError::SecretFormat(format!("secret value is not valid JSON: {e}"))
    })?;

    value
        .get(WEBHOOK_URL_KEY)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            error!("Secret value doesn't contain '{WEBHOOK_URL_KEY}' key");
            ForwardError::SecretFormat(format!(
                "secret value doesn't contain '{WEBHOOK_URL_KEY}' key"
            ))
        })
}
