use alarm_notify::{AlarmForwarder, ForwarderConfig, HandlerResponse, SecretsManagerSource};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // CloudWatch Logs adds its own timestamp
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let config = ForwarderConfig::from_env();
    let secrets = SecretsManagerSource::from_config(&config).await;
    let forwarder = AlarmForwarder::new(secrets, reqwest::Client::new());
    let forwarder = &forwarder;

    info!(secret_id = %config.secret_id, "cold start complete, starting Lambda runtime");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<HandlerResponse, Error>(forwarder.handle(&event.payload).await)
    }))
    .await
}
