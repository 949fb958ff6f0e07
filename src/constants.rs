//! Application constants and configuration

pub const APP_NAME: &str = "Health Risk Predictor";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL used when settings.json has none and HRP_API_URL is unset
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const API_URL_ENV: &str = "HRP_API_URL";

pub const HEALTH_PATH: &str = "/api/health";
pub const PREDICT_PATH: &str = "/api/predict";
pub const UPLOAD_PATH: &str = "/api/upload";
pub const FEATURES_PATH: &str = "/api/features";

/// Extensions the batch endpoint accepts
pub const UPLOAD_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

// Fallback messages shown when the server gives no usable error payload
pub const PREDICT_FALLBACK: &str = "An error occurred during prediction";
pub const UPLOAD_FALLBACK: &str = "An error occurred during file upload";
pub const SERVICE_FALLBACK: &str = "Unable to reach the prediction service";
