use crate::cli::RecognizeArgs;
use crate::models::config::{AppConfig, PreprocessingConfig};
use crate::models::ocr_result::{OcrRequest, RecognitionReport};
use crate::services::ocr::{OcrEngine, OcrError, OcrInvoker, PdfRasterizer, TesseractEngine};
use std::process::ExitCode;

/// Build the request from positional arguments and config defaults
pub fn build_request(args: &RecognizeArgs, config: &AppConfig) -> Option<OcrRequest> {
    let image = args.image.as_ref()?;
    let language = args
        .language
        .clone()
        .unwrap_or_else(|| config.ocr.default_language.clone());

    // CLI flags layer on top of the configured preprocessing
    let mut preprocessing: PreprocessingConfig = config.preprocessing.clone();
    if args.resize_width.is_some() {
        preprocessing.resize_width = args.resize_width;
    }
    preprocessing.grayscale |= args.grayscale;
    preprocessing.threshold |= args.threshold;

    Some(
        OcrRequest::new(image)
            .with_language(language)
            .with_preprocessing(preprocessing),
    )
}

/// Text printed on stdout for a finished recognition
pub fn render_outcome(language: &str, result: &Result<String, OcrError>, json: bool) -> String {
    if json {
        let report = RecognitionReport::from_result(language, result);
        return match serde_json::to_string_pretty(&report) {
            Ok(json) => json,
            Err(e) => format!("Error: failed to serialize report: {}", e),
        };
    }

    match result {
        Ok(text) => text.clone(),
        Err(e) => e.to_legacy_string(),
    }
}

/// Failures only change the exit status in strict mode
pub fn exit_status(failed: bool, strict: bool) -> u8 {
    if failed && strict {
        1
    } else {
        0
    }
}

/// `image-ocr <image_path> [<language_code>]`
pub fn recognize(args: &RecognizeArgs, config: &AppConfig) -> Result<ExitCode, String> {
    let request = build_request(args, config).ok_or("Missing image path")?;

    let result = OcrInvoker::tesseract(config.ocr.clone()).and_then(|invoker| {
        invoker
            .with_pdf_rasterizer(PdfRasterizer::new(config.pdf.clone()))
            .run(&request)
    });

    println!("{}", render_outcome(&request.language, &result, args.json));

    Ok(ExitCode::from(exit_status(result.is_err(), args.strict)))
}

/// `image-ocr langs`
pub fn list_languages(config: &AppConfig) -> Result<ExitCode, String> {
    let engine = TesseractEngine::new(config.ocr.clone()).map_err(|e| e.to_string())?;
    let languages = engine.languages().map_err(|e| e.to_string())?;

    for language in languages {
        println!("{}", language);
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> RecognizeArgs {
        let mut argv = vec!["image-ocr"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().recognize
    }

    #[test]
    fn test_language_defaults_from_config() {
        let mut config = AppConfig::default();
        let request = build_request(&parse(&["scan.png"]), &config).unwrap();
        assert_eq!(request.language, "eng");
        assert_eq!(request.path, PathBuf::from("scan.png"));

        config.ocr.default_language = "jpn".to_string();
        let request = build_request(&parse(&["scan.png"]), &config).unwrap();
        assert_eq!(request.language, "jpn");

        let request = build_request(&parse(&["scan.png", "kor"]), &config).unwrap();
        assert_eq!(request.language, "kor");
    }

    #[test]
    fn test_preprocessing_flags_override_config() {
        let mut config = AppConfig::default();
        config.preprocessing.resize_width = Some(1200);

        let request = build_request(&parse(&["scan.png"]), &config).unwrap();
        assert_eq!(request.preprocessing.unwrap().resize_width, Some(1200));

        let request =
            build_request(&parse(&["scan.png", "--resize-width", "640", "--grayscale"]), &config)
                .unwrap();
        let preprocessing = request.preprocessing.unwrap();
        assert_eq!(preprocessing.resize_width, Some(640));
        assert!(preprocessing.grayscale);
        assert!(!preprocessing.threshold);
    }

    #[test]
    fn test_no_preprocessing_by_default() {
        let request = build_request(&parse(&["scan.png"]), &AppConfig::default()).unwrap();
        assert!(request.preprocessing.is_none());
    }

    #[test]
    fn test_render_plain() {
        assert_eq!(render_outcome("eng", &Ok("Hello\n".to_string()), false), "Hello\n");

        let err = OcrError::EngineUnavailable("tesseract is not installed".to_string());
        assert_eq!(
            render_outcome("eng", &Err(err), false),
            "Error: OCR engine unavailable: tesseract is not installed"
        );
    }

    #[test]
    fn test_render_json_distinguishes_literal_error_text() {
        let rendered = render_outcome("eng", &Ok("Error: printed on the page".to_string()), true);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["status"], "ok");
        assert_eq!(value["text"], "Error: printed on the page");
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(false, false), 0);
        assert_eq!(exit_status(true, false), 0);
        assert_eq!(exit_status(false, true), 0);
        assert_eq!(exit_status(true, true), 1);
    }
}
