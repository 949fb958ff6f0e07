//! User settings stored as settings.json in the app data directory

use crate::constants::{API_URL_ENV, DEFAULT_API_BASE_URL};
use crate::types::DiseaseType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Prediction service
    pub api_base_url: String,

    // Last used tabs
    pub manual_disease: DiseaseType,
    pub upload_disease: DiseaseType,
    pub results_disease: DiseaseType,

    // Paths
    pub upload_dir: Option<String>,

    // Results screen
    pub history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            manual_disease: DiseaseType::Diabetes,
            upload_disease: DiseaseType::Diabetes,
            results_disease: DiseaseType::Diabetes,
            upload_dir: None,
            history_limit: 200,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    /// Base URL for this session: HRP_API_URL wins over the saved value
    pub fn effective_api_url(&self) -> String {
        Self::api_url_for(&self.api_base_url)
    }

    /// Same as `effective_api_url` for a URL that is not saved yet
    pub fn api_url_for(saved: &str) -> String {
        Self::resolve_api_url(std::env::var(API_URL_ENV).ok(), saved)
    }

    fn resolve_api_url(env: Option<String>, saved: &str) -> String {
        if let Some(url) = env.filter(|u| !u.trim().is_empty()) {
            info!(url = %url, "Using API URL from environment");
            return url.trim().to_string();
        }
        if saved.trim().is_empty() {
            DEFAULT_API_BASE_URL.to_string()
        } else {
            saved.trim().to_string()
        }
    }

    /// Last upload folder, else Documents, else home
    pub fn upload_dir_for(saved: Option<&str>) -> PathBuf {
        saved
            .map(PathBuf::from)
            .or_else(dirs::document_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            api_base_url: "https://predict.example.org".into(),
            upload_disease: DiseaseType::Thyroid,
            history_limit: 50,
            window_w: Some(1200.0),
            ..Settings::default()
        };
        settings.save(dir.path());
        assert_eq!(Settings::load(dir.path()), settings);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"api_base_url":"http://10.0.0.5:5000","results_disease":"heart"}"#,
        )
        .unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.api_base_url, "http://10.0.0.5:5000");
        assert_eq!(settings.results_disease, DiseaseType::Heart);
        assert_eq!(settings.history_limit, 200);
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn saved_upload_dir_wins() {
        assert_eq!(Settings::upload_dir_for(Some("/data/uploads")), PathBuf::from("/data/uploads"));
    }

    #[test]
    fn env_url_overrides_saved() {
        assert_eq!(
            Settings::resolve_api_url(Some(" http://env:9000 ".into()), "http://saved"),
            "http://env:9000"
        );
        assert_eq!(Settings::resolve_api_url(Some("  ".into()), "http://saved"), "http://saved");
        assert_eq!(Settings::resolve_api_url(None, ""), DEFAULT_API_BASE_URL);
    }
}
