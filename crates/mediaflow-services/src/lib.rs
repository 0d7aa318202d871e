//! Mediaflow Services Library
//!
//! Transcode backends implementing [`TranscodeService`]:
//!
//! - **mediaconvert**: AWS Elemental MediaConvert `CreateJob` from a job template
//! - **http**: JSON job submission to an HTTP endpoint
//!
//! [`create_transcoder`] picks one from `transcode.backend`.

pub mod factory;
#[cfg(feature = "transcode-http")]
pub mod http;
#[cfg(feature = "transcode-mediaconvert")]
pub mod mediaconvert;

pub use factory::create_transcoder;
#[cfg(feature = "transcode-http")]
pub use http::HttpTranscoder;
#[cfg(feature = "transcode-mediaconvert")]
pub use mediaconvert::MediaConvertTranscoder;

pub use mediaflow_processing::{SubmittedJob, TranscodeError, TranscodeService};
