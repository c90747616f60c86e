use super::engine::OcrEngine;
use super::error::OcrError;
use super::pdf::{self, PdfRasterizer};
use super::preprocessing::PreprocessingService;
use super::tesseract::TesseractEngine;
use crate::models::config::OcrConfig;
use crate::models::ocr_result::OcrRequest;
use image::{DynamicImage, ImageError, ImageReader};
use std::path::Path;
use std::sync::Arc;

/// Opens an image and hands it to the OCR engine
///
/// Stateless apart from the engine handle; every call decodes its own
/// image and drops it before returning, on success and on failure alike.
/// PDF input is rasterised to its first page first.
#[derive(Clone)]
pub struct OcrInvoker {
    engine: Arc<dyn OcrEngine>,
    pdf: PdfRasterizer,
}

impl OcrInvoker {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            engine,
            pdf: PdfRasterizer::default(),
        }
    }

    pub fn with_pdf_rasterizer(mut self, pdf: PdfRasterizer) -> Self {
        self.pdf = pdf;
        self
    }

    /// Invoker backed by the system Tesseract installation
    pub fn tesseract(config: OcrConfig) -> Result<Self, OcrError> {
        Ok(Self::new(Arc::new(TesseractEngine::new(config)?)))
    }

    pub fn engine(&self) -> &Arc<dyn OcrEngine> {
        &self.engine
    }

    /// Recognize text in the image at `path`
    pub fn recognize(&self, path: impl AsRef<Path>, language: &str) -> Result<String, OcrError> {
        self.run(&OcrRequest::new(path).with_language(language))
    }

    /// Same as [`recognize`](Self::recognize), failures folded into `"Error: ..."`
    pub fn recognize_to_string(&self, path: impl AsRef<Path>, language: &str) -> String {
        self.recognize(path, language)
            .unwrap_or_else(|e| e.to_legacy_string())
    }

    /// Execute a full request: decode, optional preprocessing, recognition
    #[tracing::instrument(
        name = "ocr",
        level = "debug",
        skip_all,
        fields(path = %request.path.display(), lang = %request.language)
    )]
    pub fn run(&self, request: &OcrRequest) -> Result<String, OcrError> {
        let result = self.decode_and_recognize(request);

        match &result {
            Ok(text) => tracing::debug!(chars = text.chars().count(), "recognized"),
            Err(e) => tracing::warn!(kind = ?e.kind(), error = %e, "recognition failed"),
        }

        result
    }

    fn decode_and_recognize(&self, request: &OcrRequest) -> Result<String, OcrError> {
        let image = if pdf::is_pdf(&request.path) {
            self.decode_pdf(&request.path)?
        } else {
            decode(&request.path)?
        };

        let image = match &request.preprocessing {
            Some(config) => PreprocessingService::new(config.clone()).preprocess(&image)?,
            None => image,
        };

        self.engine.recognize_with_lang(&image, &request.language)
    }

    /// First page of a PDF, rendered into a scratch dir dropped on return
    fn decode_pdf(&self, path: &Path) -> Result<DynamicImage, OcrError> {
        let scratch = tempfile::Builder::new()
            .prefix("image-ocr-pdf-")
            .tempdir()
            .map_err(|e| OcrError::Engine(format!("Failed to create scratch dir: {}", e)))?;

        let page = self.pdf.rasterize_first_page(path, scratch.path())?;
        decode(&page)
    }
}

/// Decode by content, falling back to the extension
fn decode(path: &Path) -> Result<DynamicImage, OcrError> {
    let to_decode_error = |source: ImageError| OcrError::Decode {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| to_decode_error(ImageError::IoError(e)))?
        .decode()
        .map_err(to_decode_error)
}
