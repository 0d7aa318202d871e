#[cfg(feature = "transcode-http")]
use crate::HttpTranscoder;
#[cfg(feature = "transcode-mediaconvert")]
use crate::MediaConvertTranscoder;
use anyhow::Result;
use mediaflow_core::{TranscodeBackend, TranscodeConfig};
use mediaflow_processing::TranscodeService;
use std::sync::Arc;

/// Create the transcode backend selected by `transcode.backend`
pub async fn create_transcoder(config: &TranscodeConfig) -> Result<Arc<dyn TranscodeService>> {
    match config.backend {
        #[cfg(feature = "transcode-mediaconvert")]
        TranscodeBackend::MediaConvert => {
            Ok(Arc::new(MediaConvertTranscoder::new(config).await))
        }

        #[cfg(not(feature = "transcode-mediaconvert"))]
        TranscodeBackend::MediaConvert => Err(anyhow::anyhow!(
            "MediaConvert backend not available (transcode-mediaconvert feature not enabled)"
        )),

        #[cfg(feature = "transcode-http")]
        TranscodeBackend::Http => {
            let endpoint = config
                .endpoint
                .as_deref()
                .filter(|e| !e.is_empty())
                .ok_or_else(|| anyhow::anyhow!("transcode.endpoint not configured"))?;
            Ok(Arc::new(HttpTranscoder::new(endpoint)?))
        }

        #[cfg(not(feature = "transcode-http"))]
        TranscodeBackend::Http => Err(anyhow::anyhow!(
            "HTTP transcode backend not available (transcode-http feature not enabled)"
        )),
    }
}
