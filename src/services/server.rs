use crate::models::config::PreprocessingConfig;
use crate::models::ocr_result::OcrRequest;
use crate::services::ocr::{OcrError, OcrInvoker};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Shared state of the upload server
#[derive(Clone)]
pub struct ServerState {
    invoker: OcrInvoker,
    default_language: String,
    upload_dir: PathBuf,
    preprocessing: PreprocessingConfig,
    max_upload_bytes: usize,
}

impl ServerState {
    pub fn new(
        invoker: OcrInvoker,
        default_language: impl Into<String>,
        upload_dir: impl AsRef<Path>,
        preprocessing: PreprocessingConfig,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            invoker,
            default_language: default_language.into(),
            upload_dir: upload_dir.as_ref().to_path_buf(),
            preprocessing,
            max_upload_bytes,
        }
    }

    fn language_or_default(&self, lang: Option<String>) -> String {
        lang.map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.default_language.clone())
    }
}

/// JSON body for `POST /ocr/base64`
#[derive(Deserialize)]
struct ImageRequest {
    image_base64: String,
    #[serde(default)]
    lang: Option<String>,
}

/// Uploaded image on disk, deleted when dropped
struct UploadedFile {
    path: PathBuf,
}

impl UploadedFile {
    /// Store as `<unix-millis>-<seq>-<name>` under `dir`
    fn store(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<Self, String> {
        static SEQ: AtomicU64 = AtomicU64::new(0);

        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        let file_name = format!(
            "{}-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            seq,
            sanitize_file_name(original_name)
        );
        let path = dir.join(file_name);

        fs::write(&path, bytes).map_err(|e| format!("Failed to store upload: {}", e))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "upload stored");

        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UploadedFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove upload");
        }
    }
}

/// Keep the last path component, replace anything outside `[A-Za-z0-9._-]`
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn ocr_failure_response(error: &OcrError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Failed to process the file",
            "kind": error.kind(),
            "detail": error.to_string(),
        })),
    )
        .into_response()
}

/// Store the upload, recognize it, delete it; runs on the blocking pool
fn store_and_recognize(
    invoker: &OcrInvoker,
    upload_dir: &Path,
    name: &str,
    bytes: &[u8],
    request: impl FnOnce(&Path) -> OcrRequest,
) -> Result<Result<String, OcrError>, String> {
    let upload = UploadedFile::store(upload_dir, name, bytes)?;
    Ok(invoker.run(&request(upload.path())))
}

/// Hand the upload to the blocking pool and map the outcome to a response
async fn recognize_bytes(state: &ServerState, name: String, bytes: Bytes, lang: String) -> Response {
    let invoker = state.invoker.clone();
    let upload_dir = state.upload_dir.clone();
    let preprocessing = state.preprocessing.clone();

    let result = tokio::task::spawn_blocking(move || {
        store_and_recognize(&invoker, &upload_dir, &name, &bytes, |path| {
            OcrRequest::new(path)
                .with_language(lang)
                .with_preprocessing(preprocessing)
        })
    })
    .await;

    match result {
        Ok(Ok(Ok(text))) => (StatusCode::OK, Json(json!({ "text": text }))).into_response(),
        Ok(Ok(Err(e))) => ocr_failure_response(&e),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "upload could not be stored");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
        Err(e) => {
            tracing::error!(error = %e, "OCR task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process the file")
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// `POST /ocr` multipart form: `file` (required) and `lang` (optional)
async fn ocr_upload(State(state): State<ServerState>, mut multipart: Multipart) -> Response {
    let mut file: Option<(String, Bytes)> = None;
    let mut lang: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((file_name, bytes)),
                    Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
                }
            }
            Some("lang") => match field.text().await {
                Ok(text) => lang = Some(text),
                Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
            },
            _ => {}
        }
    }

    let Some((file_name, bytes)) = file else {
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
    };

    let lang = state.language_or_default(lang);
    tracing::info!(file = %file_name, bytes = bytes.len(), lang = %lang, "OCR upload");

    recognize_bytes(&state, file_name, bytes, lang).await
}

/// `POST /ocr/base64` JSON body `{ "image_base64": "...", "lang": "..." }`
async fn ocr_base64(State(state): State<ServerState>, Json(body): Json<ImageRequest>) -> Response {
    let bytes = match general_purpose::STANDARD.decode(body.image_base64.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid base64 image: {}", e))
        }
    };

    let lang = state.language_or_default(body.lang);
    tracing::info!(bytes = bytes.len(), lang = %lang, "OCR base64 request");

    recognize_bytes(&state, "image".to_string(), Bytes::from(bytes), lang).await
}

/// Build the application router
pub fn router(state: ServerState) -> Router {
    let limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/ocr", post(ocr_upload))
        .route("/ocr/base64", post(ocr_base64))
        .layer(DefaultBodyLimit::max(limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: ServerState,
    shutdown: F,
) -> Result<(), String>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    fs::create_dir_all(&state.upload_dir)
        .map_err(|e| format!("Failed to create upload directory: {}", e))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to read local address: {}", e))?;
    tracing::info!(%addr, upload_dir = %state.upload_dir.display(), "OCR server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

/// Bind `host:port` and serve until Ctrl-C
pub async fn start_server(host: &str, port: u16, state: ServerState) -> Result<(), String> {
    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|e| format!("Failed to bind {}:{}: {}", host, port, e))?;

    // Print the address for humans; logs may be filtered
    println!("Server is running on http://{}", listener.local_addr().map_err(|e| e.to_string())?);

    serve_with_shutdown(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown requested");
    })
    .await
}
