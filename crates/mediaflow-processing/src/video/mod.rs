//! Video archival module
//!
//! Moves an uploaded video into the archival directory (copy, then delete the
//! original) and submits a transcode job for the archived copy.

pub mod archiver;

pub use archiver::{ArchiveReport, ArchiveState, VideoArchiver};
