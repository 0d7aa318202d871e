//! Data models for the application
//!
//! Values derived from a single upload notification. None of them are persisted;
//! each lives for exactly one invocation.

mod outcome;
mod upload;
mod video_job;

pub use outcome::*;
pub use upload::*;
pub use video_job::*;
