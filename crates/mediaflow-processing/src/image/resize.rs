use image::imageops::FilterType;
use image::DynamicImage;
use mediaflow_core::Dimensions;

pub struct ImageResize;

impl ImageResize {
    /// Fit inside `bounds`, preserving aspect ratio. Never upscales.
    pub fn fit(img: &DynamicImage, bounds: Dimensions) -> DynamicImage {
        if img.width() <= bounds.width && img.height() <= bounds.height {
            return img.clone();
        }
        img.resize(bounds.width, bounds.height, FilterType::Lanczos3)
    }
}
