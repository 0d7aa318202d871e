//! Variant encoding

use anyhow::Result;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use mediaflow_core::{QualityPreset, VariantFormat};
use std::io::Cursor;

/// Encodes decoded images into variant formats
pub struct ImageCompressor;

impl ImageCompressor {
    pub fn image_format(format: VariantFormat) -> ImageFormat {
        match format {
            VariantFormat::Jpeg => ImageFormat::Jpeg,
            VariantFormat::Png => ImageFormat::Png,
            VariantFormat::WebP => ImageFormat::WebP,
            VariantFormat::Gif => ImageFormat::Gif,
        }
    }

    pub fn encode(img: &DynamicImage, format: VariantFormat, quality: QualityPreset) -> Result<Bytes> {
        let (width, height) = (img.width(), img.height());
        let mut buffer = Vec::with_capacity((width * height * 3) as usize / 4);

        match format {
            VariantFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = img.to_rgb8();
                let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.jpeg_quality());
                encoder.encode_image(&rgb)?;
            }
            VariantFormat::Png => {
                img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
            }
            // The WebP and GIF encoders only accept 8-bit RGBA
            VariantFormat::WebP | VariantFormat::Gif => {
                let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
                rgba.write_to(&mut Cursor::new(&mut buffer), Self::image_format(format))?;
            }
        }

        Ok(Bytes::from(buffer))
    }
}
