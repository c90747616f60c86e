pub mod cli;
pub mod commands;
pub mod models;
pub mod services;

use clap::Parser;
use cli::{Cli, Command};
use services::config::ConfigManager;
use services::logging::init_logging;
use std::process::ExitCode;

pub use models::config::{AppConfig, DEFAULT_LANGUAGE};
pub use models::ocr_result::{OcrRequest, RecognitionReport};
pub use services::ocr::{OcrEngine, OcrError, OcrErrorKind, OcrInvoker, PdfRasterizer, TesseractEngine};

/// Parse arguments, load configuration and dispatch
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new().map_err(anyhow::Error::msg)?,
    };
    let mut config = manager.load().map_err(anyhow::Error::msg)?;

    if let Some(format) = cli.log_format {
        config.logging.format = format.into();
    }
    init_logging(&config.logging, cli.verbose, cli.quiet);
    tracing::debug!(config = %manager.config_file_path().display(), "configuration loaded");

    let outcome = match cli.command {
        None => commands::ocr::recognize(&cli.recognize, &config),
        Some(Command::Langs) => commands::ocr::list_languages(&config),
        Some(Command::Config { action }) => commands::config::run(&action, &manager),
        Some(Command::Serve { host, port }) => commands::server::serve(&config, host, port),
    };

    outcome.map_err(anyhow::Error::msg)
}
