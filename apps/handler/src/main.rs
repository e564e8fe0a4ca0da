//! set-variable Lambda
//!
//! Serves API Gateway proxy requests with the set-variable Function. The
//! management API client is built once at startup from `ACCOUNT_SID` /
//! `AUTH_TOKEN`; the Function configuration is read from the environment on
//! every invocation.

use std::sync::Arc;

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use runtime_helpers::{ClientConfig, Context, ServerlessApi, TwilioServerlessClient};
use runtime_helpers_handler::handle_request;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn function_handler(
    event: LambdaEvent<ApiGatewayProxyRequest>,
    client: Arc<dyn ServerlessApi>,
) -> Result<ApiGatewayProxyResponse, Error> {
    info!(
        "Processing {} {} ({})",
        event.payload.http_method,
        event.payload.path.as_deref().unwrap_or("/"),
        event.context.request_id
    );

    let ctx = Context::from_env(client);
    Ok(handle_request(&ctx, &event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // CloudWatch adds timestamps
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    let config = ClientConfig::from_env()?;
    info!("set-variable handler starting (API: {})", config.base_url);

    let client: Arc<dyn ServerlessApi> = Arc::new(TwilioServerlessClient::from(config));

    run(service_fn(|event: LambdaEvent<ApiGatewayProxyRequest>| {
        function_handler(event, client.clone())
    }))
    .await
}
