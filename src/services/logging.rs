use crate::models::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Shift the configured level by `-v` / `-q` counts
pub fn effective_level(configured: &str, verbose: u8, quiet: u8) -> String {
    let base = LEVELS
        .iter()
        .position(|l| l.eq_ignore_ascii_case(configured.trim()));

    match base {
        Some(index) => {
            let shifted = (index + verbose as usize).saturating_sub(quiet as usize);
            LEVELS[shifted.min(LEVELS.len() - 1)].to_string()
        }
        // Directive strings like "image_ocr_lib=debug" pass through untouched
        None => configured.to_string(),
    }
}

/// Install the global subscriber; logs go to stderr so stdout stays the OCR result.
/// `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig, verbose: u8, quiet: u8) {
    let level = effective_level(&config.level, verbose, quiet);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let layer = match config.format {
        LogFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_level_shifts() {
        assert_eq!(effective_level("warn", 0, 0), "warn");
        assert_eq!(effective_level("warn", 1, 0), "info");
        assert_eq!(effective_level("warn", 2, 0), "debug");
        assert_eq!(effective_level("warn", 9, 0), "trace");
        assert_eq!(effective_level("warn", 0, 1), "error");
        assert_eq!(effective_level("warn", 0, 5), "error");
        assert_eq!(effective_level("INFO", 1, 1), "info");
    }

    #[test]
    fn test_effective_level_keeps_directives() {
        assert_eq!(
            effective_level("image_ocr_lib=debug", 2, 0),
            "image_ocr_lib=debug"
        );
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        let config = LoggingConfig::default();
        init_logging(&config, 0, 0);
        init_logging(&config, 1, 0);
    }
}
