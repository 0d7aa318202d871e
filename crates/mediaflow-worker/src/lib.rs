//! Mediaflow Worker Library
//!
//! Entry point for upload notifications: the [`Dispatcher`] parses the
//! notification, loads the settings document and routes the upload to the
//! image or the video pipeline, producing one [`TerminalResult`] per invocation.
//!
//! [`TerminalResult`]: mediaflow_core::TerminalResult

pub mod context;
pub mod dispatcher;

pub use context::{ConfigSource, HandlerContext};
pub use dispatcher::Dispatcher;
