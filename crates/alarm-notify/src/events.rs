//! CloudWatch alarm notifications as delivered through SNS.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::error::ForwardError;

/// Placeholder used when the alarm carries no instance dimension.
pub const INSTANCE_ID_UNAVAILABLE: &str = "N/A";

/// CloudWatch timestamp layout, e.g. `2024-05-01T12:34:56.789+0000`.
const STATE_CHANGE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// State of a CloudWatch alarm.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AlarmState {
    /// Threshold breached
    Alarm,
    /// Metric within threshold
    Ok,
    /// Any other value, e.g. `INSUFFICIENT_DATA`
    Other(String),
}

impl AlarmState {
    /// Wire representation of this state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Alarm => "ALARM",
            Self::Ok => "OK",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for AlarmState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ALARM" => Self::Alarm,
            "OK" => Self::Ok,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alarm attributes extracted from one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmEvent {
    pub name: String,
    /// `None` when the alarm was created without a description.
    pub description: Option<String>,
    pub reason: String,
    pub region: String,
    pub state: AlarmState,
    pub previous_state: AlarmState,
    /// First trigger dimension value, or [`INSTANCE_ID_UNAVAILABLE`].
    pub instance_id: String,
    pub account_id: Option<String>,
    pub state_change_time: Option<DateTime<Utc>>,
}

impl AlarmEvent {
    /// Extract the alarm from a raw SNS Lambda event.
    ///
    /// Only the first record is used; SNS delivers one record per invocation.
    pub fn from_sns_payload(payload: &Value) -> Result<Self, ForwardError> {
        let envelope = SnsEnvelope::deserialize(payload)
            .map_err(|e| ForwardError::MalformedEvent(format!("invalid SNS envelope: {e}")))?;

        if envelope.records.len() > 1 {
            warn!(
                records = envelope.records.len(),
                "Notification carries multiple records, forwarding only the first"
            );
        }

        let record = envelope
            .records
            .into_iter()
            .next()
            .ok_or_else(|| ForwardError::MalformedEvent("notification has no records".to_string()))?;

        Self::from_message(&record.sns.message)
    }

    /// Extract the alarm from the JSON text of an SNS message.
    pub fn from_message(message: &str) -> Result<Self, ForwardError> {
        let raw: AlarmNotification = serde_json::from_str(message)
            .map_err(|e| ForwardError::MalformedEvent(format!("invalid alarm message: {e}")))?;

        Ok(Self {
            instance_id: instance_id(raw.trigger.as_ref())
                .unwrap_or_else(|| INSTANCE_ID_UNAVAILABLE.to_string()),
            state_change_time: raw
                .state_change_time
                .as_deref()
                .and_then(parse_state_change_time),
            name: raw.alarm_name,
            description: raw.alarm_description,
            reason: raw.new_state_reason,
            region: raw.region,
            state: raw.new_state_value,
            previous_state: raw.old_state_value,
            account_id: raw.aws_account_id,
        })
    }

    /// Human-readable transition, e.g. `OK -> ALARM`.
    #[must_use]
    pub fn transition(&self) -> String {
        format!("{} -> {}", self.previous_state, self.state)
    }
}

/// Value of the first trigger dimension, if the trigger has one.
fn instance_id(trigger: Option<&Value>) -> Option<String> {
    trigger?
        .pointer("/Dimensions/0/value")?
        .as_str()
        .map(str::to_string)
}

fn parse_state_change_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, STATE_CHANGE_TIME_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Key must be present, value may be null.
fn nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer)
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct SnsEnvelope {
    #[serde(rename = "Records")]
    records: Vec<SnsRecord>,
}

#[derive(Debug, Deserialize)]
struct SnsRecord {
    #[serde(rename = "Sns")]
    sns: SnsMessage,
}

#[derive(Debug, Deserialize)]
struct SnsMessage {
    #[serde(rename = "Message")]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AlarmNotification {
    alarm_name: String,
    #[serde(deserialize_with = "nullable")]
    alarm_description: Option<String>,
    new_state_reason: String,
    region: String,
    new_state_value: AlarmState,
    old_state_value: AlarmState,
    #[serde(rename = "AWSAccountId", default)]
    aws_account_id: Option<String>,
    #[serde(default)]
    state_change_time: Option<String>,
    #[serde(default)]
    trigger: Option<Value>,
}
