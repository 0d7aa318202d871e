//! AWS Elemental MediaConvert transcode backend

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_mediaconvert::error::{DisplayErrorContext, SdkError};
use aws_sdk_mediaconvert::types::{Input, JobSettings};
use aws_sdk_mediaconvert::Client as MediaConvertClient;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use mediaflow_core::{TranscodeBackend, TranscodeConfig, TranscodeSpec};
use mediaflow_processing::{SubmittedJob, TranscodeError, TranscodeService};

/// Submits `CreateJob` requests built from a job template.
///
/// Output groups come from the template untouched; the job only sets the input
/// file. The destination prefix travels as user metadata. The job id is sent as
/// the client request token, so a resubmission with the same id does not create
/// a second job.
pub struct MediaConvertTranscoder {
    client: MediaConvertClient,
}

impl Debug for MediaConvertTranscoder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaConvertTranscoder").finish()
    }
}

impl MediaConvertTranscoder {
    /// Create a client from `transcode.region` and `transcode.endpoint`.
    pub async fn new(config: &TranscodeConfig) -> Self {
        let region_provider =
            RegionProviderChain::first_try(config.region.clone().map(aws_config::Region::new))
                .or_default_provider();

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        let client = match &config.endpoint {
            // Account-specific endpoint
            Some(endpoint) => {
                let mc_config = aws_sdk_mediaconvert::config::Builder::from(&sdk_config)
                    .endpoint_url(endpoint)
                    .build();
                MediaConvertClient::from_conf(mc_config)
            }
            None => MediaConvertClient::new(&sdk_config),
        };

        tracing::debug!(endpoint = ?config.endpoint, "MediaConvert client initialized");

        Self::from_client(client)
    }

    pub fn from_client(client: MediaConvertClient) -> Self {
        Self { client }
    }

    fn job_settings(spec: &TranscodeSpec) -> JobSettings {
        // Output groups are arrays; sending any would replace the template's
        JobSettings::builder()
            .inputs(Input::builder().file_input(spec.input_uri()).build())
            .build()
    }

    fn user_metadata(spec: &TranscodeSpec) -> Vec<(&'static str, String)> {
        let mut metadata = vec![
            ("job-id", spec.job_id.clone()),
            ("source", spec.input_uri()),
            ("destination", format!("{}/", spec.destination_uri())),
        ];
        if let Some(preview) = &spec.preview {
            metadata.push(("preview-key", preview.key.clone()));
            metadata.push(("preview-dimensions", preview.dimensions.to_string()));
        }
        metadata
    }
}

#[async_trait]
impl TranscodeService for MediaConvertTranscoder {
    async fn submit_job(&self, spec: &TranscodeSpec) -> Result<SubmittedJob, TranscodeError> {
        if spec.job_template.is_empty() || spec.role.is_empty() {
            return Err(TranscodeError::InvalidSpec(
                "job template and role are required".to_string(),
            ));
        }

        let start = std::time::Instant::now();

        let mut request = self
            .client
            .create_job()
            .job_template(&spec.job_template)
            .role(&spec.role)
            .client_request_token(&spec.job_id)
            .settings(Self::job_settings(spec));

        for (key, value) in Self::user_metadata(spec) {
            request = request.user_metadata(key, value);
        }
        if let Some(queue) = &spec.queue {
            request = request.queue(queue);
        }

        let response = request.send().await.map_err(|e| {
            let detail = DisplayErrorContext(&e).to_string();
            tracing::error!(
                job_id = %spec.job_id,
                error = %detail,
                "MediaConvert CreateJob failed"
            );
            match e {
                SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
                    TranscodeError::Unavailable(detail)
                }
                _ => TranscodeError::Rejected(detail),
            }
        })?;

        let remote_id = response
            .job()
            .and_then(|job| job.id())
            .map(|id| id.to_string());

        tracing::info!(
            job_id = %spec.job_id,
            remote_id = ?remote_id,
            input = %spec.input_uri(),
            destination = %spec.destination_uri(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "MediaConvert job created"
        );

        Ok(SubmittedJob { remote_id })
    }

    fn backend(&self) -> TranscodeBackend {
        TranscodeBackend::MediaConvert
    }
}
