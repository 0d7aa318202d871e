use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "mediaflow=info";

/// Environment variable selecting the output format
pub const LOG_FORMAT_ENV: &str = "MEDIAFLOW_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "plain" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow!("Invalid log format: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    pub format: LogFormat,
    pub service_name: String,
}

impl TelemetrySettings {
    /// Read `MEDIAFLOW_LOG_FORMAT`, falling back to `default_format` when unset.
    pub fn from_env(service_name: impl Into<String>, default_format: LogFormat) -> Result<Self> {
        let format = match env::var(LOG_FORMAT_ENV) {
            Ok(value) => value.parse()?,
            Err(_) => default_format,
        };

        Ok(Self {
            format,
            service_name: service_name.into(),
        })
    }
}

/// Initialize tracing with an `EnvFilter` (`RUST_LOG`, default `mediaflow=info`)
pub fn init_telemetry(settings: &TelemetrySettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match settings.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    }
    .map_err(|e| anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::debug!(
        service = %settings.service_name,
        format = ?settings.format,
        "Tracing initialized"
    );
    Ok(())
}
