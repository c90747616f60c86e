use super::error::OcrError;
use crate::models::config::DEFAULT_LANGUAGE;
use image::DynamicImage;

/// OCR Engine trait - abstraction over the external recognizer
pub trait OcrEngine: Send + Sync {
    /// Recognize text from image with default language (English)
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        self.recognize_with_lang(image, DEFAULT_LANGUAGE)
    }

    /// Recognize text with specific language
    fn recognize_with_lang(&self, image: &DynamicImage, lang: &str) -> Result<String, OcrError>;

    /// Languages the engine has model data for
    fn languages(&self) -> Result<Vec<String>, OcrError>;

    /// Check if the OCR engine is available
    fn is_available() -> bool
    where
        Self: Sized;
}
