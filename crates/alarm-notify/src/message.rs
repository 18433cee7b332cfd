//! Alarm transition classification and Slack Block Kit rendering.

use serde::{Deserialize, Serialize};

use crate::error::ForwardError;
use crate::events::{AlarmEvent, AlarmState};

/// Message variant chosen for an alarm transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmMessage {
    /// Alarm reached `OK` without having been in `ALARM`
    Registered {
        name: String,
        description: String,
        region: String,
    },
    /// Alarm entered `ALARM`
    Activated {
        name: String,
        reason: String,
        region: String,
    },
    /// Alarm went from `ALARM` back to `OK`
    Resolved {
        name: String,
        reason: String,
        region: String,
    },
}

impl AlarmMessage {
    /// Choose the message for an alarm transition.
    ///
    /// Returns `None` for states other than `ALARM` and `OK`; those are
    /// logged by the caller and never delivered. Fails only when the
    /// registered message is chosen and the alarm has no description.
    pub fn classify(event: &AlarmEvent) -> Result<Option<Self>, ForwardError> {
        let message = match (&event.state, &event.previous_state) {
            (AlarmState::Alarm, _) => Some(Self::Activated {
                name: event.name.clone(),
                reason: event.reason.clone(),
                region: event.region.clone(),
            }),
            (AlarmState::Ok, AlarmState::Alarm) => Some(Self::Resolved {
                name: event.name.clone(),
                reason: event.reason.clone(),
                region: event.region.clone(),
            }),
            (AlarmState::Ok, _) => {
                let description = event.description.clone().ok_or_else(|| {
                    ForwardError::MalformedEvent(format!(
                        "alarm {} has no AlarmDescription for the registered message",
                        event.name
                    ))
                })?;

                Some(Self::Registered {
                    name: event.name.clone(),
                    description,
                    region: event.region.clone(),
                })
            }
            (AlarmState::Other(_), _) => None,
        };

        Ok(message)
    }

    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Registered { .. } => "registered",
            Self::Activated { .. } => "activated",
            Self::Resolved { .. } => "resolved",
        }
    }

    /// Header line with icon and alarm name.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::Registered { name, .. } => format!(":warning: {name} alarm was registered"),
            Self::Activated { name, .. } => format!(":red_circle: Alarm: {name}"),
            Self::Resolved { name, .. } => {
                format!(":large_green_circle: Alarm: {name} was resolved")
            }
        }
    }

    /// Render the Block Kit document posted to the webhook.
    #[must_use]
    pub fn render(&self) -> SlackMessage {
        let (body, region) = match self {
            Self::Registered {
                description,
                region,
                ..
            } => (description, region),
            Self::Activated { reason, region, .. } | Self::Resolved { reason, region, .. } => {
                (reason, region)
            }
        };

        SlackMessage {
            kind: "home".to_string(),
            blocks: vec![
                Block::Header {
                    text: TextObject::PlainText { text: self.title() },
                },
                Block::Divider,
                Block::Section {
                    text: TextObject::Mrkdwn {
                        text: format!("_{body}_"),
                    },
                    block_id: SECTION_BLOCK_ID.to_string(),
                },
                Block::Divider,
                Block::Context {
                    elements: vec![TextObject::Mrkdwn {
                        text: format!("Region: *{region}*"),
                    }],
                },
            ],
        }
    }
}

/// Block id of the body section.
const SECTION_BLOCK_ID: &str = "text1";

// =============================================================================
// Slack Block Kit types
// =============================================================================

/// Webhook payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Divider,
    Section {
        text: TextObject,
        block_id: String,
    },
    Context {
        elements: Vec<TextObject>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::PlainText { text } | Self::Mrkdwn { text } => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(state: &str, previous: &str) -> AlarmEvent {
        AlarmEvent {
            name: "api-5xx".to_string(),
            description: Some("5xx rate on the public API".to_string()),
            reason: "Threshold Crossed: 3 datapoints were greater than 10.0".to_string(),
            region: "EU (London)".to_string(),
            state: AlarmState::from(state.to_string()),
            previous_state: AlarmState::from(previous.to_string()),
            instance_id: "N/A".to_string(),
            account_id: None,
            state_change_time: None,
        }
    }

    #[test]
    fn test_classification_table() {
        let states = ["ALARM", "OK", "INSUFFICIENT_DATA", "UNKNOWN"];

        for new in states {
            for previous in states {
                let kind = AlarmMessage::classify(&event(new, previous))
                    .unwrap()
                    .map(|m| m.kind());
                let expected = match (new, previous) {
                    ("ALARM", _) => Some("activated"),
                    ("OK", "ALARM") => Some("resolved"),
                    ("OK", _) => Some("registered"),
                    _ => None,
                };
                assert_eq!(kind, expected, "{previous} -> {new}");
            }
        }
    }

    #[test]
    fn test_activated_message() {
        let message = AlarmMessage::classify(&event("ALARM", "OK")).unwrap().unwrap();
        let doc = message.render();

        assert_eq!(doc.kind, "home");
        let Block::Header { text } = &doc.blocks[0] else {
            panic!("expected header block");
        };
        assert_eq!(text.text(), ":red_circle: Alarm: api-5xx");
        let Block::Section { text, block_id } = &doc.blocks[2] else {
            panic!("expected section block");
        };
        assert_eq!(
            text.text(),
            "_Threshold Crossed: 3 datapoints were greater than 10.0_"
        );
        assert_eq!(block_id, "text1");
    }

    #[test]
    fn test_resolved_message() {
        let message = AlarmMessage::classify(&event("OK", "ALARM")).unwrap().unwrap();
        assert_eq!(message.title(), ":large_green_circle: Alarm: api-5xx was resolved");
    }

    #[test]
    fn test_registered_uses_description() {
        let message = AlarmMessage::classify(&event("OK", "INSUFFICIENT_DATA")).unwrap().unwrap();
        let doc = message.render();

        assert_eq!(message.title(), ":warning: api-5xx alarm was registered");
        let Block::Section { text, .. } = &doc.blocks[2] else {
            panic!("expected section block");
        };
        assert_eq!(text.text(), "_5xx rate on the public API_");
    }

    #[test]
    fn test_missing_description_only_blocks_registration() {
        let without_description = |new: &str, previous: &str| AlarmEvent {
            description: None,
            ..event(new, previous)
        };

        let activated = AlarmMessage::classify(&without_description("ALARM", "OK")).unwrap();
        assert_eq!(activated.map(|m| m.kind()), Some("activated"));

        let resolved = AlarmMessage::classify(&without_description("OK", "ALARM")).unwrap();
        assert_eq!(resolved.map(|m| m.kind()), Some("resolved"));

        let skipped =
            AlarmMessage::classify(&without_description("INSUFFICIENT_DATA", "OK")).unwrap();
        assert!(skipped.is_none());

        let err = AlarmMessage::classify(&without_description("OK", "INSUFFICIENT_DATA"))
            .unwrap_err();
        assert!(matches!(err, ForwardError::MalformedEvent(_)));
        assert!(err.to_string().contains("AlarmDescription"));
    }

    #[test]
    fn test_wire_format() {
        let doc = AlarmMessage::classify(&event("ALARM", "OK")).unwrap().unwrap().render();

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "type": "home",
                "blocks": [
                    {
                        "type": "header",
                        "text": { "type": "plain_text", "text": ":red_circle: Alarm: api-5xx" }
                    },
                    { "type": "divider" },
                    {
                        "type": "section",
                        "text": {
                            "type": "mrkdwn",
                            "text": "_Threshold Crossed: 3 datapoints were greater than 10.0_"
                        },
                        "block_id": "text1"
                    },
                    { "type": "divider" },
                    {
                        "type": "context",
                        "elements": [{ "type": "mrkdwn", "text": "Region: *EU (London)*" }]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_reparsed_document_keeps_text_verbatim() {
        let mut alarm = event("ALARM", "OK");
        alarm.name = "db \"primary\" <latency>".to_string();
        alarm.reason = "p99 > 250ms & rising\nsee runbook: *db*".to_string();

        let doc = AlarmMessage::classify(&alarm).unwrap().unwrap().render();
        let encoded = serde_json::to_string(&doc).unwrap();
        let decoded: SlackMessage = serde_json::from_str(&encoded).unwrap();

        let Block::Header { text } = &decoded.blocks[0] else {
            panic!("expected header block");
        };
        assert!(text.text().contains(&alarm.name));

        let Block::Section { text, .. } = &decoded.blocks[2] else {
            panic!("expected section block");
        };
        let body = text
            .text()
            .strip_prefix('_')
            .and_then(|t| t.strip_suffix('_'))
            .unwrap();
        assert_eq!(body, alarm.reason);
    }
}
