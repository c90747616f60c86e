pub mod engine;
pub mod error;
pub mod invoker;
pub mod pdf;
pub mod preprocessing;
pub mod tesseract;

// Re-export main types
pub use engine::OcrEngine;
pub use error::{OcrError, OcrErrorKind, LEGACY_ERROR_PREFIX};
pub use invoker::OcrInvoker;
pub use pdf::PdfRasterizer;
pub use preprocessing::{PreprocessingService, MAX_OUTPUT_PIXELS};
pub use tesseract::TesseractEngine;
