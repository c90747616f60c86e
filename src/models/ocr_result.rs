use crate::models::config::{PreprocessingConfig, DEFAULT_LANGUAGE};
use crate::services::ocr::{OcrError, OcrErrorKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Parameters of a single recognition call
#[derive(Debug, Clone, PartialEq)]
pub struct OcrRequest {
    pub path: PathBuf,
    pub language: String,
    pub preprocessing: Option<PreprocessingConfig>,
}

impl OcrRequest {
    /// Request for `path` in the default language, no preprocessing
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            language: DEFAULT_LANGUAGE.to_string(),
            preprocessing: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_preprocessing(mut self, preprocessing: PreprocessingConfig) -> Self {
        self.preprocessing = Some(preprocessing).filter(PreprocessingConfig::is_enabled);
        self
    }
}

/// Tagged recognition outcome for machine-readable output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RecognitionReport {
    Ok {
        language: String,
        text: String,
    },
    Error {
        kind: OcrErrorKind,
        message: String,
    },
}

impl RecognitionReport {
    /// Build a report from the invoker result
    pub fn from_result(language: &str, result: &Result<String, OcrError>) -> Self {
        match result {
            Ok(text) => Self::Ok {
                language: language.to_string(),
                text: text.clone(),
            },
            Err(e) => Self::Error {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}
