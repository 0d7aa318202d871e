//! Mediaflow CLI: run the dispatcher outside Lambda.
//!
//! Uses the same environment as the Lambda binary (`MEDIAFLOW_CONFIG`,
//! `MEDIAFLOW_STORAGE`, `AWS_REGION`, ...). A `.env` file is honoured.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use mediaflow_cli::{config_summary, load_config, print_json, read_event};
use mediaflow_core::{ArchiveStep, TerminalResult, UploadRecord};
use mediaflow_infra::{init_telemetry, LogFormat, TelemetrySettings};
use mediaflow_worker::{Dispatcher, HandlerContext};

#[derive(Parser)]
#[command(name = "mediaflow", about = "Mediaflow upload router CLI")]
struct Cli {
    /// Settings document (default: $MEDIAFLOW_CONFIG or ./config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle an upload notification saved as JSON
    Handle {
        /// Path to the event file
        event: PathBuf,
    },
    /// Resume a partially archived video, reusing its job id
    ResumeVideo {
        /// Bucket of the original upload
        #[arg(long)]
        bucket: String,
        /// Key of the original upload
        #[arg(long)]
        key: String,
        /// Job id from the failed attempt
        #[arg(long)]
        job_id: String,
        /// Step to resume at: copy, delete or transcode
        #[arg(long)]
        from: ArchiveStep,
    },
    /// Validate the settings document
    CheckConfig,
}

async fn dispatcher(config: mediaflow_core::Config) -> anyhow::Result<Dispatcher> {
    let context = HandlerContext::from_env(&config).await?;
    Ok(Dispatcher::new(context, Arc::new(config)))
}

fn report(result: TerminalResult) -> anyhow::Result<ExitCode> {
    print_json(&result)?;
    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let telemetry = TelemetrySettings::from_env("mediaflow-cli", LogFormat::Pretty)?;
    init_telemetry(&telemetry)?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Handle { event } => {
            let payload = read_event(&event)?;
            let result = dispatcher(config).await?.handle(&payload).await;
            report(result)
        }
        Commands::ResumeVideo {
            bucket,
            key,
            job_id,
            from,
        } => {
            let record = UploadRecord::new(bucket, key).context("Invalid upload location")?;
            let result = dispatcher(config)
                .await?
                .resume_video(&record, &job_id, from)
                .await;
            report(result)
        }
        Commands::CheckConfig => {
            print_json(&config_summary(&config))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
