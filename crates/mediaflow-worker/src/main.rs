//! Lambda entry point
//!
//! Cold start loads the settings document and the collaborators once; every
//! invocation returns the success message or fails with the error description.

use anyhow::Context;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;

use mediaflow_core::Config;
use mediaflow_infra::{init_telemetry, LogFormat, TelemetrySettings};
use mediaflow_worker::{Dispatcher, HandlerContext};

async fn function_handler(event: LambdaEvent<Value>, dispatcher: &Dispatcher) -> Result<String, Error> {
    let (payload, context) = event.into_parts();
    tracing::debug!(request_id = %context.request_id, "Invocation received");

    dispatcher
        .handle(&payload)
        .await
        .into_result()
        .map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let telemetry = TelemetrySettings::from_env("mediaflow-lambda", LogFormat::Json)?;
    init_telemetry(&telemetry)?;

    let config = Arc::new(Config::from_env().context("Failed to load config")?);
    let context = HandlerContext::from_env(&config).await?;
    let dispatcher = Dispatcher::new(context, config);

    tracing::info!("Lambda runtime starting");
    run(service_fn(|event| function_handler(event, &dispatcher))).await
}
