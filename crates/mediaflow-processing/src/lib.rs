//! Mediaflow Processing Library
//!
//! The two pipelines an upload can be routed to:
//!
//! - **image**: generate resized variants per the configured resize definitions
//! - **video**: archive the original (copy, then delete) and submit a transcode job
//!
//! Collaborators are reached through the traits in [`traits`] so the pipelines can
//! be driven against any storage or transcode backend.

#[cfg(feature = "image")]
pub mod compression;
#[cfg(feature = "image")]
pub mod image;
pub mod traits;
#[cfg(feature = "video")]
pub mod video;

#[cfg(feature = "image")]
pub use crate::image::{VariantProcessor, PROCESSED_MARKER};
pub use traits::{
    ImageProcessingError, ImageProcessor, SubmittedJob, TranscodeError, TranscodeService,
};
#[cfg(feature = "video")]
pub use crate::video::{ArchiveReport, ArchiveState, VideoArchiver};
