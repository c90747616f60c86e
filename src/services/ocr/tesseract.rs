use super::engine::OcrEngine;
use super::error::OcrError;
use crate::models::config::OcrConfig;
use image::{DynamicImage, ImageFormat};
use rusty_tesseract::{Args, Image};
use std::collections::HashMap;

/// Tesseract OCR engine implementation
///
/// Drives the `tesseract` executable. Each call encodes the image to a
/// scratch PNG that is removed when the call returns.
pub struct TesseractEngine {
    config: OcrConfig,
}

impl TesseractEngine {
    /// Create a new Tesseract engine instance
    pub fn new(config: OcrConfig) -> Result<Self, OcrError> {
        let version = rusty_tesseract::get_tesseract_version()
            .map_err(|e| OcrError::EngineUnavailable(e.to_string()))?;
        tracing::debug!(version = %version.trim(), "tesseract detected");

        Ok(Self { config })
    }

    /// Build command line arguments for one call
    fn args(&self, lang: &str) -> Args {
        let config_variables: HashMap<String, String> = self
            .config
            .config_variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Args {
            lang: lang.to_string(),
            config_variables,
            dpi: self.config.dpi,
            psm: self.config.psm,
            oem: self.config.oem,
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize_with_lang(&self, image: &DynamicImage, lang: &str) -> Result<String, OcrError> {
        let scratch = tempfile::Builder::new()
            .prefix("image-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Engine(format!("Failed to create scratch file: {}", e)))?;

        image
            .save_with_format(scratch.path(), ImageFormat::Png)
            .map_err(|e| OcrError::Engine(format!("Failed to encode image: {}", e)))?;

        let scratch_path = scratch
            .path()
            .to_str()
            .ok_or_else(|| OcrError::Engine("Scratch path is not valid UTF-8".to_string()))?;
        let input = Image::from_path(scratch_path)
            .map_err(|e| OcrError::Engine(format!("Failed to hand image to tesseract: {}", e)))?;

        rusty_tesseract::image_to_string(&input, &self.args(lang))
            .map_err(|e| OcrError::Engine(e.to_string()))
    }

    fn languages(&self) -> Result<Vec<String>, OcrError> {
        rusty_tesseract::get_tesseract_langs().map_err(|e| OcrError::Engine(e.to_string()))
    }

    fn is_available() -> bool {
        rusty_tesseract::get_tesseract_version().is_ok()
    }
}
