use super::error::OcrError;
use crate::models::config::PreprocessingConfig;
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageBuffer, Luma};

/// Upper bound on pixels a resize may grow an image to (about 8000x5000)
pub const MAX_OUTPUT_PIXELS: u64 = 40_000_000;

/// Image preprocessing service for OCR optimization
pub struct PreprocessingService {
    config: PreprocessingConfig,
}

impl PreprocessingService {
    /// Create a new preprocessing service with custom configuration
    pub fn new(config: PreprocessingConfig) -> Self {
        Self { config }
    }

    /// Full preprocessing pipeline: resize → grayscale → threshold
    pub fn preprocess(&self, image: &DynamicImage) -> Result<DynamicImage, OcrError> {
        let mut current = match self.config.resize_width {
            Some(width) if width > 0 => self.resize_to_width(image, width)?,
            _ => image.clone(),
        };

        if self.config.threshold {
            current = self.threshold(&current);
        } else if self.config.grayscale {
            current = self.to_grayscale(&current);
        }

        Ok(current)
    }

    /// Resize to `width`, height follows the aspect ratio
    ///
    /// Shrinking always succeeds. Growing past [`MAX_OUTPUT_PIXELS`] is
    /// refused before anything is allocated.
    pub fn resize_to_width(&self, image: &DynamicImage, width: u32) -> Result<DynamicImage, OcrError> {
        let (w, h) = image.dimensions();
        if w == width || w == 0 {
            return Ok(image.clone());
        }

        let height = (h as f64 * width as f64 / w as f64).round().max(1.0);
        let pixels = width as f64 * height;
        let grows = pixels > w as f64 * h as f64;
        if grows && (pixels > MAX_OUTPUT_PIXELS as f64 || height > u32::MAX as f64) {
            return Err(OcrError::TooLarge {
                width: width as u64,
                height: height as u64,
                limit: MAX_OUTPUT_PIXELS,
            });
        }

        Ok(image.resize_exact(width, height as u32, FilterType::Lanczos3))
    }

    /// Convert image to grayscale
    pub fn to_grayscale(&self, image: &DynamicImage) -> DynamicImage {
        DynamicImage::ImageLuma8(image.to_luma8())
    }

    /// Apply binary thresholding (Otsu's method)
    pub fn threshold(&self, image: &DynamicImage) -> DynamicImage {
        use imageproc::contrast::otsu_level;

        let gray_img = image.to_luma8();
        let threshold_value = otsu_level(&gray_img);

        let binary = ImageBuffer::from_fn(gray_img.width(), gray_img.height(), |x, y| {
            if gray_img.get_pixel(x, y)[0] > threshold_value {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });

        DynamicImage::ImageLuma8(binary)
    }
}
