//! Variant generation: fetch the original, resize per definition, write variants.

use async_trait::async_trait;
use bytes::Bytes;
use image::ImageReader;
use mediaflow_core::{Config, ResizeDefinition, UploadRecord};
use mediaflow_storage::{ObjectStorage, StoredObject};
use std::io::Cursor;
use std::sync::Arc;

use crate::compression::ImageCompressor;
use crate::image::resize::ImageResize;
use crate::traits::{ImageProcessingError, ImageProcessor};

/// User metadata key set on every variant. An upload carrying it is not processed again.
pub const PROCESSED_MARKER: &str = "img-processed";

/// Default [`ImageProcessor`]: writes one variant per resize definition into the
/// target bucket at `{prefix}{key without extension}.{format extension}`.
pub struct VariantProcessor {
    storage: Arc<dyn ObjectStorage>,
}

impl VariantProcessor {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    pub fn variant_key(record: &UploadRecord, resize: &ResizeDefinition) -> String {
        format!(
            "{}{}.{}",
            resize.prefix,
            record.key_stem(),
            resize.format.extension()
        )
    }

    /// Decode once, then resize and encode every definition. CPU-bound.
    fn render(
        data: Bytes,
        resizes: Vec<ResizeDefinition>,
    ) -> Result<Vec<(ResizeDefinition, Bytes)>, ImageProcessingError> {
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|_| ImageProcessingError::EmptyOrBroken)?
            .decode()
            .map_err(|_| ImageProcessingError::EmptyOrBroken)?;

        resizes
            .into_iter()
            .map(|resize| {
                let resized = ImageResize::fit(&img, resize.dimensions);
                let encoded = ImageCompressor::encode(&resized, resize.format, resize.quality)
                    .map_err(|e| ImageProcessingError::Encode(e.to_string()))?;
                Ok((resize, encoded))
            })
            .collect()
    }
}

#[async_trait]
impl ImageProcessor for VariantProcessor {
    async fn run(
        &self,
        record: &UploadRecord,
        config: &Config,
    ) -> Result<usize, ImageProcessingError> {
        if record.is_directory() {
            return Err(ImageProcessingError::EmptyOrBroken);
        }

        let original = self
            .storage
            .get(record.bucket_name(), record.object_key())
            .await?;

        if original.metadata_value(PROCESSED_MARKER) == Some("true") {
            return Err(ImageProcessingError::AlreadyProcessed);
        }
        if original.is_empty() {
            return Err(ImageProcessingError::EmptyOrBroken);
        }

        let resizes = config.resizes().to_vec();
        // Image decode is CPU-bound; run off the async pool to avoid blocking other tasks.
        let variants =
            tokio::task::spawn_blocking(move || Self::render(original.data, resizes))
                .await
                .map_err(|e| ImageProcessingError::Task(e.to_string()))??;

        let bucket = config.target_bucket();
        let mut written = 0;
        for (resize, data) in variants {
            let key = Self::variant_key(record, &resize);
            let size = data.len();
            let object = StoredObject::new(data, resize.format.mime_type())
                .with_metadata(PROCESSED_MARKER, "true");

            self.storage.put(bucket, &key, object).await?;
            written += 1;

            tracing::debug!(
                bucket = %bucket,
                key = %key,
                dimensions = %resize.dimensions,
                size_bytes = size,
                "Variant written"
            );
        }

        Ok(written)
    }
}
