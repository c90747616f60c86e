use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Prefix of the plain-text failure line printed by the CLI
pub const LEGACY_ERROR_PREFIX: &str = "Error: ";

/// Failure of the decode -> recognize pipeline
#[derive(Debug, Error)]
pub enum OcrError {
    /// The image could not be read or decoded (missing, corrupt, unsupported format)
    #[error("cannot open image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Preprocessing would produce an image above the pixel limit
    #[error("resized image would be {width}x{height}, above the {limit} pixel limit")]
    TooLarge { width: u64, height: u64, limit: u64 },

    /// The OCR engine is not installed or cannot be started
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine ran and failed (missing language data, internal error)
    #[error("OCR engine failed: {0}")]
    Engine(String),
}

/// Coarse failure category, stable for machine-readable output
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OcrErrorKind {
    Decode,
    TooLarge,
    EngineUnavailable,
    Engine,
}

impl OcrError {
    pub fn kind(&self) -> OcrErrorKind {
        match self {
            OcrError::Decode { .. } => OcrErrorKind::Decode,
            OcrError::TooLarge { .. } => OcrErrorKind::TooLarge,
            OcrError::EngineUnavailable(_) => OcrErrorKind::EngineUnavailable,
            OcrError::Engine(_) => OcrErrorKind::Engine,
        }
    }

    /// Collapse into the `"Error: <description>"` line
    pub fn to_legacy_string(&self) -> String {
        format!("{}{}", LEGACY_ERROR_PREFIX, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_decode_error_mentions_path() {
        let err = OcrError::Decode {
            path: PathBuf::from("missing.png"),
            source: image::ImageError::IoError(io::Error::new(io::ErrorKind::NotFound, "gone")),
        };

        assert_eq!(err.kind(), OcrErrorKind::Decode);
        let message = err.to_string();
        assert!(message.contains("missing.png"), "got: {}", message);
        assert!(message.contains("gone"));
    }

    #[test]
    fn test_legacy_string_prefix() {
        let err = OcrError::EngineUnavailable("tesseract not found".to_string());
        let line = err.to_legacy_string();

        assert!(line.starts_with("Error: "));
        assert!(line.ends_with("tesseract not found"));
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&OcrErrorKind::EngineUnavailable).unwrap(),
            "\"engine_unavailable\""
        );
        assert_eq!(serde_json::to_string(&OcrErrorKind::Decode).unwrap(), "\"decode\"");
        assert_eq!(serde_json::to_string(&OcrErrorKind::TooLarge).unwrap(), "\"too_large\"");
    }
}
