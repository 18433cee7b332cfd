//! CloudWatch alarm forwarding to Slack.
//!
//! This crate receives CloudWatch alarm state-change notifications delivered
//! through SNS to AWS Lambda and posts a Block Kit message to a Slack
//! incoming webhook whose URL is kept in AWS Secrets Manager.
//!
//! # Usage
//!
//! ```no_run
//! use alarm_notify::{AlarmForwarder, ForwarderConfig, SecretsManagerSource};
//!
//! # async fn run(payload: serde_json::Value) {
//! let config = ForwarderConfig::from_env();
//! let secrets = SecretsManagerSource::from_config(&config).await;
//! let forwarder = AlarmForwarder::new(secrets, reqwest::Client::new());
//!
//! let response = forwarder.handle(&payload).await;
//! println!("{}", response.status_code);
//! # }
//! ```
//!
//! # Transitions
//!
//! | New state | Previous state | Message    |
//! |-----------|----------------|------------|
//! | `ALARM`   | any            | activated  |
//! | `OK`      | `ALARM`        | resolved   |
//! | `OK`      | anything else  | registered |
//! | other     | any            | none       |
//!
//! # Configuration
//!
//! - `WEBHOOK_SECRET_ID`: secret holding `{"webhook_url": "..."}`
//!   (default `prod/slack/webhook-url`)
//! - `WEBHOOK_SECRET_REGION`: region of that secret (default `eu-west-2`)

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod channels;
pub mod config;
pub mod error;
pub mod events;
pub mod forwarder;
pub mod message;
pub mod secrets;

pub use channels::slack::SlackChannel;
pub use channels::{Delivery, NotifyChannel};
pub use config::ForwarderConfig;
pub use error::{ChannelError, ForwardError};
pub use events::{AlarmEvent, AlarmState, INSTANCE_ID_UNAVAILABLE};
pub use forwarder::{AlarmForwarder, ForwardOutcome, HandlerResponse};
pub use message::{AlarmMessage, SlackMessage};
pub use secrets::{SecretSource, SecretsManagerSource};
