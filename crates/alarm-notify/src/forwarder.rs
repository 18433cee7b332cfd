//! Per-invocation pipeline: secret, parse, classify, render, deliver.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::channels::slack::SlackChannel;
use crate::channels::{Delivery, NotifyChannel};
use crate::error::ForwardError;
use crate::events::AlarmEvent;
use crate::message::{AlarmMessage, SlackMessage};
use crate::secrets::SecretSource;

/// Body returned when a transition is logged but not forwarded.
pub const SKIPPED_BODY: &str = "State transition logged";

/// Result of one successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// State was neither `ALARM` nor `OK`; nothing was sent
    Skipped { transition: String },
    /// Message posted; remote status passed through
    Delivered {
        message: SlackMessage,
        delivery: Delivery,
    },
}

/// Response handed back to the Lambda runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    /// 500 response carrying the error text.
    #[must_use]
    pub fn failure(err: &ForwardError) -> Self {
        Self {
            status_code: 500,
            body: json!({ "error": err.to_string() }).to_string(),
        }
    }
}

#[derive(Serialize)]
struct DeliveryReport<'a> {
    message: &'a SlackMessage,
    status_code: u16,
    response: &'a str,
}

impl TryFrom<ForwardOutcome> for HandlerResponse {
    type Error = ForwardError;

    fn try_from(outcome: ForwardOutcome) -> Result<Self, Self::Error> {
        match outcome {
            ForwardOutcome::Skipped { .. } => Ok(Self {
                status_code: 200,
                body: SKIPPED_BODY.to_string(),
            }),
            ForwardOutcome::Delivered { message, delivery } => {
                let body = serde_json::to_string(&DeliveryReport {
                    message: &message,
                    status_code: delivery.status,
                    response: &delivery.body,
                })?;

                Ok(Self {
                    status_code: delivery.status,
                    body,
                })
            }
        }
    }
}

/// Forwards CloudWatch alarm notifications to Slack.
///
/// Holds the process-wide HTTP client and secret source; both are built
/// once at cold start and only read afterwards.
pub struct AlarmForwarder<S> {
    secrets: S,
    client: reqwest::Client,
}

impl<S: SecretSource> AlarmForwarder<S> {
    #[must_use]
    pub fn new(secrets: S, client: reqwest::Client) -> Self {
        Self { secrets, client }
    }

    /// Run one invocation, converting any error into a 500 response.
    pub async fn handle(&self, payload: &Value) -> HandlerResponse {
        match self
            .forward(payload)
            .await
            .and_then(HandlerResponse::try_from)
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Error in lambda execution");
                HandlerResponse::failure(&e)
            }
        }
    }

    /// Run one invocation, propagating errors.
    pub async fn forward(&self, payload: &Value) -> Result<ForwardOutcome, ForwardError> {
        let webhook_url = self.secrets.webhook_url().await?;

        let event = AlarmEvent::from_sns_payload(payload)?;
        let transition = event.transition();

        info!(
            alarm = %event.name,
            transition = %transition,
            instance_id = %event.instance_id,
            account_id = event.account_id.as_deref().unwrap_or_default(),
            changed_at = ?event.state_change_time,
            "State transition"
        );

        let Some(message) = AlarmMessage::classify(&event)? else {
            warn!(alarm = %event.name, transition = %transition, "Unhandled state transition");
            return Ok(ForwardOutcome::Skipped { transition });
        };

        let document = message.render();
        let channel = SlackChannel::new(self.client.clone(), webhook_url);
        let delivery = channel.send(&document).await?;

        info!(
            alarm = %event.name,
            kind = message.kind(),
            channel = channel.name(),
            status = delivery.status,
            response = %delivery.body,
            "Alarm notification delivered"
        );

        Ok(ForwardOutcome::Delivered {
            message: document,
            delivery,
        })
    }
}
