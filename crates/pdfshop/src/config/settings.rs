use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::request::Quality;
use crate::error::ConfigError;

/// Last-used preferences persisted between runs. The batch engine never reads
/// these for correctness; they only pre-fill whatever front end wraps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub input_dir: String,
    pub output_dir: String,
    pub pdftotext_path: String,
    pub gs_path: String,
    pub qpdf_path: String,
    pub compression_quality: Quality,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: ".".to_string(),
            output_dir: ".".to_string(),
            pdftotext_path: "/usr/bin/pdftotext".to_string(),
            gs_path: "/usr/bin/gs".to_string(),
            qpdf_path: "/usr/bin/qpdf".to_string(),
            compression_quality: Quality::Ebook,
        }
    }
}

/// Loads settings from a JSON file, falling back to defaults when the file
/// does not exist yet.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => {
            return Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let settings: Settings = serde_json::from_str(&content)?;
    Ok(settings)
}

impl Settings {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = load_settings(temp_dir.path().join("config.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.compression_quality, Quality::Ebook);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut settings = Settings::default();
        settings.input_dir = "/data/in".to_string();
        settings.compression_quality = Quality::Screen;
        settings.save(&path).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_settings(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseJson(_)));
    }

    #[test]
    fn test_unknown_quality_in_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"input_dir":".","output_dir":".","pdftotext_path":"p","gs_path":"g","qpdf_path":"q","compression_quality":"maximum"}"#,
        )
        .unwrap();

        assert!(load_settings(&path).is_err());
    }
}
