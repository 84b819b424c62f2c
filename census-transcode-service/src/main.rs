use census_transcode::audit::S3AuditLog;
use census_transcode::config::Config;
use census_transcode::dto::GatewayEvent;
use census_transcode::gateway::Gateway;
use census_transcode::response::make_response_payload;
use census_transcode::scoring::ScoringClient;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .without_time()
        .init();

    let config = Config::from_env()?;
    let gateway = Gateway::new(ScoringClient::new(&config)?, S3AuditLog::from_config(&config));
    let gateway = &gateway;
    run(service_fn(move |event| process(gateway, event))).await?;
    Ok(())
}

async fn process(
    gateway: &Gateway<S3AuditLog>,
    event: LambdaEvent<GatewayEvent>,
) -> Result<Value, Error> {
    let (request, _context) = event.into_parts();
    let result = gateway.transcode(request).await;
    make_response_payload(result)
}
