//! Image processing module
//!
//! - Bounding-box resize (resize)
//! - Variant generation against object storage (processor)

pub mod processor;
pub mod resize;

pub use processor::{VariantProcessor, PROCESSED_MARKER};
pub use resize::ImageResize;
