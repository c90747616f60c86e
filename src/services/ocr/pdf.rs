use super::error::OcrError;
use crate::models::config::PdfConfig;
use image::error::{DecodingError, ImageFormatHint};
use image::ImageError;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// True when the file starts with the PDF header, whatever its extension
pub fn is_pdf(path: &Path) -> bool {
    let mut head = [0u8; 5];
    File::open(path)
        .and_then(|mut file| file.read_exact(&mut head))
        .map(|_| head == PDF_MAGIC)
        .unwrap_or(false)
}

/// Renders the first page of a PDF to PNG through poppler's `pdftoppm`
#[derive(Debug, Clone, Default)]
pub struct PdfRasterizer {
    config: PdfConfig,
}

impl PdfRasterizer {
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }

    /// Rasterise page 1 of `pdf` into `out_dir`, returning the PNG path
    pub fn rasterize_first_page(&self, pdf: &Path, out_dir: &Path) -> Result<PathBuf, OcrError> {
        let prefix = out_dir.join("page");
        let program = &self.config.program;

        let output = Command::new(program)
            .args(["-f", "1", "-l", "1", "-png", "-singlefile", "-r"])
            .arg(self.config.dpi.to_string())
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => OcrError::EngineUnavailable(format!(
                    "{} not found, install poppler to read PDF files",
                    program
                )),
                _ => OcrError::EngineUnavailable(format!("cannot run {}: {}", program, e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("{} exited with {}", program, output.status),
                message => message.to_string(),
            };
            return Err(OcrError::Decode {
                path: pdf.to_path_buf(),
                source: ImageError::Decoding(DecodingError::new(
                    ImageFormatHint::Name("PDF".to_string()),
                    reason,
                )),
            });
        }

        tracing::debug!(pdf = %pdf.display(), dpi = self.config.dpi, "rasterised first page");
        Ok(prefix.with_extension("png"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ocr::OcrErrorKind;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn test_detects_pdf_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let renamed = dir.path().join("scan.bin");
        std::fs::copy(fixture("one_page.pdf"), &renamed).unwrap();

        assert!(is_pdf(&fixture("one_page.pdf")));
        assert!(is_pdf(&renamed));
        assert!(!is_pdf(&fixture("hello.png")));
        assert!(!is_pdf(&fixture("does_not_exist.pdf")));

        let short = dir.path().join("short.pdf");
        std::fs::write(&short, b"%PD").unwrap();
        assert!(!is_pdf(&short));
    }

    #[test]
    fn test_missing_program_is_engine_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = PdfRasterizer::new(PdfConfig {
            program: "image-ocr-missing-pdftoppm".to_string(),
            ..PdfConfig::default()
        });

        let err = rasterizer
            .rasterize_first_page(&fixture("one_page.pdf"), dir.path())
            .unwrap_err();
        assert_eq!(err.kind(), OcrErrorKind::EngineUnavailable);
        assert!(err.to_string().contains("poppler"), "got: {}", err);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_render_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = PdfRasterizer::new(PdfConfig {
            program: "false".to_string(),
            ..PdfConfig::default()
        });

        let err = rasterizer
            .rasterize_first_page(&fixture("one_page.pdf"), dir.path())
            .unwrap_err();
        assert_eq!(err.kind(), OcrErrorKind::Decode);
        assert!(err.to_string().contains("one_page.pdf"), "got: {}", err);
    }

    #[test]
    #[ignore] // needs poppler installed
    fn test_pdftoppm_renders_first_page() {
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = PdfRasterizer::new(PdfConfig {
            dpi: 72,
            ..PdfConfig::default()
        });

        let page = rasterizer
            .rasterize_first_page(&fixture("one_page.pdf"), dir.path())
            .unwrap();
        let image = image::open(&page).unwrap();
        assert_eq!((image.width(), image.height()), (200, 100));
    }
}
