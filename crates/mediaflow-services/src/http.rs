//! HTTP transcode backend
//!
//! `POST {endpoint}` with the JSON [`TranscodeSpec`]. The job id is also sent as
//! the `Idempotency-Key` header so the endpoint can drop resubmissions.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use mediaflow_core::{TranscodeBackend, TranscodeSpec};
use mediaflow_processing::{SubmittedJob, TranscodeError, TranscodeService};

/// Optional acknowledgement body
#[derive(Debug, Default, Deserialize)]
struct SubmitResponse {
    #[serde(default, alias = "jobId")]
    id: Option<String>,
}

pub struct HttpTranscoder {
    http_client: Client,
    endpoint: String,
}

impl Debug for HttpTranscoder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HttpTranscoder")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl HttpTranscoder {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client for transcode endpoint")?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TranscodeService for HttpTranscoder {
    async fn submit_job(&self, spec: &TranscodeSpec) -> Result<SubmittedJob, TranscodeError> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Idempotency-Key", &spec.job_id)
            .json(spec)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    job_id = %spec.job_id,
                    endpoint = %self.endpoint,
                    error = %e,
                    "Transcode endpoint unreachable"
                );
                TranscodeError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                job_id = %spec.job_id,
                status = %status,
                "Transcode job rejected"
            );
            return Err(TranscodeError::Rejected(format!(
                "{} - {}",
                status, error_text
            )));
        }

        // An empty or non-JSON acknowledgement is still an accepted job
        let body = response.text().await.unwrap_or_default();
        let ack: SubmitResponse = serde_json::from_str(&body).unwrap_or_default();

        tracing::info!(
            job_id = %spec.job_id,
            remote_id = ?ack.id,
            endpoint = %self.endpoint,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Transcode job submitted"
        );

        Ok(SubmittedJob { remote_id: ack.id })
    }

    fn backend(&self) -> TranscodeBackend {
        TranscodeBackend::Http
    }
}
