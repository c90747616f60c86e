use crate::models::config::AppConfig;
use crate::services::ocr::{OcrInvoker, PdfRasterizer};
use crate::services::server::{start_server, ServerState};
use std::process::ExitCode;

/// `image-ocr serve [--host] [--port]`
pub fn serve(config: &AppConfig, host: Option<String>, port: Option<u16>) -> Result<ExitCode, String> {
    let invoker = OcrInvoker::tesseract(config.ocr.clone())
        .map_err(|e| e.to_string())?
        .with_pdf_rasterizer(PdfRasterizer::new(config.pdf.clone()));

    let server = &config.server;
    let host = host.unwrap_or_else(|| server.host.clone());
    let port = port.unwrap_or(server.port);

    let state = ServerState::new(
        invoker,
        config.ocr.default_language.clone(),
        &server.upload_dir,
        server.preprocessing.clone(),
        server.max_upload_bytes,
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start async runtime: {}", e))?;
    rt.block_on(start_server(&host, port, state))?;

    Ok(ExitCode::SUCCESS)
}
