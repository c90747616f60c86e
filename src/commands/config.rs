use crate::cli::ConfigAction;
use crate::models::config::AppConfig;
use crate::services::config::ConfigManager;
use std::process::ExitCode;

/// Dispatch `image-ocr config <action>`
pub fn run(action: &ConfigAction, manager: &ConfigManager) -> Result<ExitCode, String> {
    match action {
        ConfigAction::Show => {
            println!("{}", show_config(manager)?);
        }
        ConfigAction::Path => {
            println!("{}", manager.config_file_path().display());
        }
        ConfigAction::Init { force } => {
            init_config(manager, *force)?;
            println!("Wrote {}", manager.config_file_path().display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Effective configuration (file merged over defaults) as pretty JSON
pub fn show_config(manager: &ConfigManager) -> Result<String, String> {
    let config = manager.load()?;
    serde_json::to_string_pretty(&config).map_err(|e| format!("Failed to serialize config: {}", e))
}

/// Write the default configuration, refusing to clobber unless `force`
pub fn init_config(manager: &ConfigManager, force: bool) -> Result<(), String> {
    if manager.config_exists() && !force {
        return Err(format!(
            "Config file already exists: {} (use --force to overwrite)",
            manager.config_file_path().display()
        ));
    }

    manager.save(&AppConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_init_then_refuse_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.json"));

        init_config(&manager, false).unwrap();
        assert!(manager.config_exists());

        let err = init_config(&manager, false).unwrap_err();
        assert!(err.contains("--force"), "got: {}", err);

        fs::write(manager.config_file_path(), r#"{ "server": { "port": 9000 } }"#).unwrap();
        init_config(&manager, true).unwrap();
        assert_eq!(manager.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_show_merges_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.json"));
        fs::write(manager.config_file_path(), r#"{ "ocr": { "psm": 6 } }"#).unwrap();

        let shown: serde_json::Value = serde_json::from_str(&show_config(&manager).unwrap()).unwrap();
        assert_eq!(shown["ocr"]["psm"], 6);
        assert_eq!(shown["ocr"]["default_language"], "eng");
        assert_eq!(shown["server"]["port"], 3000);
    }
}
