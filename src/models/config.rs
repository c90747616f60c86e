use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Language used when the caller does not name one
pub const DEFAULT_LANGUAGE: &str = "eng";

/// OCR engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OcrConfig {
    pub default_language: String,
    /// Tesseract page segmentation mode (`--psm`)
    pub psm: Option<i32>,
    /// Tesseract engine mode (`--oem`)
    pub oem: Option<i32>,
    pub dpi: Option<i32>,
    /// Extra `-c name=value` variables, e.g. `tessedit_char_whitelist`
    pub config_variables: BTreeMap<String, String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            psm: None,
            oem: None,
            dpi: None,
            config_variables: BTreeMap::new(),
        }
    }
}

/// Image preprocessing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Resize to this width (aspect ratio kept) before recognition
    pub resize_width: Option<u32>,
    pub grayscale: bool,
    /// Otsu binary threshold, implies grayscale
    pub threshold: bool,
}

impl PreprocessingConfig {
    /// True when at least one step would touch the image
    pub fn is_enabled(&self) -> bool {
        self.resize_width.is_some_and(|w| w > 0) || self.grayscale || self.threshold
    }
}

/// PDF input: the first page is rasterised with poppler's `pdftoppm`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PdfConfig {
    /// Program name or path of `pdftoppm`
    pub program: String,
    pub dpi: u32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            program: "pdftoppm".to_string(),
            dpi: 300,
        }
    }
}

/// Upload server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub preprocessing: PreprocessingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            upload_dir: "uploads".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            preprocessing: PreprocessingConfig {
                resize_width: Some(800),
                ..PreprocessingConfig::default()
            },
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub ocr: OcrConfig,
    pub preprocessing: PreprocessingConfig,
    pub pdf: PdfConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}
