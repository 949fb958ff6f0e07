//! Prediction API error types

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Message taken from the server's `{"error": ...}` payload
    #[error("{0}")]
    Server(String),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    UnexpectedShape(String),

    /// Rejected before any request was sent
    #[error("{0}")]
    InvalidInput(String),

    #[error("failed to read {}: {source}", .path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ApiError {
    /// Collapse to the single string shown to the user. Only server and
    /// input messages are meaningful to them; everything else gets `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Server(msg) | ApiError::InvalidInput(msg) => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Build the error for a non-success response body
    pub fn from_body(status: StatusCode, body: &[u8]) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorPayload {
            error: Option<String>,
        }

        match serde_json::from_slice::<ErrorPayload>(body) {
            Ok(ErrorPayload { error: Some(msg) }) if !msg.trim().is_empty() => ApiError::Server(msg),
            _ => ApiError::Status(status),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_payload_becomes_message() {
        let err = ApiError::from_body(StatusCode::BAD_REQUEST, br#"{"error":"No data provided"}"#);
        assert!(matches!(err, ApiError::Server(_)));
        assert_eq!(err.user_message("fallback"), "No data provided");
    }

    #[test]
    fn html_error_page_falls_back() {
        let err = ApiError::from_body(StatusCode::BAD_GATEWAY, b"<html>Bad Gateway</html>");
        assert!(matches!(err, ApiError::Status(s) if s == StatusCode::BAD_GATEWAY));
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[test]
    fn blank_or_missing_error_field_falls_back() {
        let bodies: [&[u8]; 4] = [br#"{"error":"  "}"#, br#"{"detail":"x"}"#, br#"{"error":null}"#, b""];
        for body in bodies {
            let err = ApiError::from_body(StatusCode::INTERNAL_SERVER_ERROR, body);
            assert_eq!(err.user_message("fallback"), "fallback");
        }
    }

    #[test]
    fn unexpected_shape_hides_detail_from_user() {
        let err = ApiError::UnexpectedShape("probability 3 outside [0, 1]".into());
        assert_eq!(err.user_message("fallback"), "fallback");
        assert!(err.to_string().contains("probability 3"));
    }

    #[test]
    fn input_errors_are_shown_verbatim() {
        let err = ApiError::InvalidInput("Invalid file type".into());
        assert_eq!(err.user_message("fallback"), "Invalid file type");
    }

    #[test]
    fn file_error_display_names_path() {
        let err = ApiError::File {
            path: PathBuf::from("/tmp/missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("missing.csv"));
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiError>();
    }
}
