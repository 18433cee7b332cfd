//! Runtime configuration for the forwarder.

use tracing::debug;

/// Environment variable overriding the webhook secret id.
const ENV_SECRET_ID: &str = "WEBHOOK_SECRET_ID";

/// Environment variable overriding the region the secret lives in.
const ENV_SECRET_REGION: &str = "WEBHOOK_SECRET_REGION";

/// Secret holding the Slack webhook URL.
pub const DEFAULT_SECRET_ID: &str = "prod/slack/webhook-url";

/// Region of the webhook secret.
pub const DEFAULT_SECRET_REGION: &str = "eu-west-2";

/// Where the forwarder finds its webhook secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwarderConfig {
    pub secret_id: String,
    pub secret_region: String,
}

impl ForwarderConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or empty variables fall back to the production defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let config = Self {
            secret_id: env_or(ENV_SECRET_ID, DEFAULT_SECRET_ID),
            secret_region: env_or(ENV_SECRET_REGION, DEFAULT_SECRET_REGION),
        };

        debug!(
            secret_id = %config.secret_id,
            secret_region = %config.secret_region,
            "Loaded forwarder configuration"
        );

        config
    }
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            secret_id: DEFAULT_SECRET_ID.to_string(),
            secret_region: DEFAULT_SECRET_REGION.to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
