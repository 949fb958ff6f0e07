//! Client for the remote prediction API
//!
//! One request per call, no caching or retries. Every 2xx body is checked
//! against the response invariants before it is handed back.

mod error;

pub use error::{ApiError, Result};

use crate::constants::*;
use crate::types::*;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictionClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http(base_url, reqwest::Client::new())
    }

    pub fn with_http(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.url(HEALTH_PATH);
        debug!(url = %url, "Health check");
        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }

    /// Required input columns for a disease model
    pub async fn features(&self, disease: DiseaseType) -> Result<FeatureList> {
        let url = format!("{}/{}", self.url(FEATURES_PATH), disease.as_str());
        debug!(url = %url, "Fetching feature list");
        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }

    pub async fn predict(
        &self,
        disease: DiseaseType,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse> {
        if request.is_empty() {
            return Err(ApiError::InvalidInput("No data provided".to_string()));
        }

        let url = format!("{}/{}", self.url(PREDICT_PATH), disease.as_str());
        debug!(url = %url, fields = request.len(), "Sending prediction request");

        let response = self.http.post(&url).json(request).send().await?;
        let prediction: PredictionResponse = read_json(response).await?;
        prediction.validate().map_err(ApiError::UnexpectedShape)?;

        info!(
            disease = %disease,
            risk = %prediction.risk_level,
            probability = prediction.probability,
            "Prediction received"
        );
        Ok(prediction)
    }

    /// Upload a CSV/Excel file for batch scoring
    pub async fn upload(&self, path: &Path, disease: DiseaseType) -> Result<BatchUploadResponse> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mime = upload_mime(path)
            .ok_or_else(|| ApiError::InvalidInput("Invalid file type".to_string()))?;

        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
            path: path.to_path_buf(),
            source,
        })?;

        let url = self.url(UPLOAD_PATH);
        debug!(url = %url, file = %file_name, bytes = bytes.len(), disease = %disease, "Uploading batch file");

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("disease_type", disease.as_str());

        let response = self.http.post(&url).multipart(form).send().await?;
        let batch: BatchUploadResponse = read_json(response).await?;
        batch.validate().map_err(ApiError::UnexpectedShape)?;

        info!(
            disease = %disease,
            total = batch.summary.total_records,
            high = batch.summary.high_risk_count,
            low = batch.summary.low_risk_count,
            "Batch prediction received"
        );
        Ok(batch)
    }
}

/// Mime type for an accepted upload, None if the extension is not allowed
pub fn upload_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !UPLOAD_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(match ext.as_str() {
        "csv" => "text/csv",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/vnd.ms-excel",
    })
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let err = ApiError::from_body(status, &body);
        warn!(status = %status, error = %err, "Prediction API returned an error");
        return Err(err);
    }

    serde_json::from_slice(&body).map_err(|e| ApiError::UnexpectedShape(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one connection, answer it with a canned response and hand back
    /// the raw request bytes.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if request_complete(&buf) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn request_complete(buf: &[u8]) -> bool {
        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        buf.len() >= header_end + 4 + content_length
    }

    fn client(base: &str) -> PredictionClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        PredictionClient::with_http(base, http)
    }

    /// Base URL of a port that nothing listens on
    async fn unreachable_base() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn heart_request() -> PredictionRequest {
        let mut req = PredictionRequest::new();
        req.insert_number("age", 54.0);
        req.insert_str("sex", "male");
        req.insert_bool("exercise_angina", false);
        req
    }

    #[test]
    fn base_url_is_normalized() {
        let c = PredictionClient::new(" http://localhost:5000/ ");
        assert_eq!(c.base_url(), "http://localhost:5000");
        assert_eq!(c.url(HEALTH_PATH), "http://localhost:5000/api/health");
    }

    #[test]
    fn upload_extensions() {
        assert_eq!(upload_mime(Path::new("a.csv")), Some("text/csv"));
        assert!(upload_mime(Path::new("a.XLSX")).is_some());
        assert!(upload_mime(Path::new("a.xls")).is_some());
        assert_eq!(upload_mime(Path::new("a.txt")), None);
        assert_eq!(upload_mime(Path::new("csv")), None);
    }

    #[tokio::test]
    async fn predict_posts_fields_to_disease_endpoint() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"prediction":1,"probability":0.82,"risk_level":"High","message":"High risk of heart disease detected"}"#,
        )
        .await;

        let resp = client(&base)
            .predict(DiseaseType::Heart, &heart_request())
            .await
            .unwrap();
        assert_eq!(resp.risk_level, RiskLevel::High);
        assert!((resp.probability - 0.82).abs() < 1e-9);
        assert_eq!(resp.message, "High risk of heart disease detected");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/predict/heart "));
        assert!(request.contains(r#""sex":"male""#));
    }

    #[tokio::test]
    async fn predict_surfaces_server_error_message() {
        let (base, server) = serve_once("400 BAD REQUEST", r#"{"error":"No data provided"}"#).await;

        let err = client(&base)
            .predict(DiseaseType::Diabetes, &heart_request())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(PREDICT_FALLBACK), "No data provided");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn predict_rejects_probability_outside_unit_interval() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"probability":1.7,"risk_level":"Low","message":"Low risk"}"#,
        )
        .await;

        let err = client(&base)
            .predict(DiseaseType::Thyroid, &heart_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedShape(_)));
        assert_eq!(err.user_message(PREDICT_FALLBACK), PREDICT_FALLBACK);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn predict_rejects_unknown_risk_label() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"probability":0.5,"risk_level":"Medium","message":""}"#,
        )
        .await;

        let err = client(&base)
            .predict(DiseaseType::Heart, &heart_request())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(PREDICT_FALLBACK), PREDICT_FALLBACK);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn predict_with_empty_request_is_not_sent() {
        let err = client(&unreachable_base().await)
            .predict(DiseaseType::Heart, &PredictionRequest::new())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(PREDICT_FALLBACK), "No data provided");
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_fallback() {
        let c = client(&unreachable_base().await);

        let err = c.predict(DiseaseType::Heart, &heart_request()).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.user_message(PREDICT_FALLBACK), PREDICT_FALLBACK);

        let err = c.health().await.unwrap_err();
        assert_eq!(err.user_message(SERVICE_FALLBACK), SERVICE_FALLBACK);
    }

    #[tokio::test]
    async fn upload_sends_multipart_file_and_disease() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.csv");
        std::fs::write(&path, "age,sex\n63,male\n41,female\n").unwrap();

        let (base, server) = serve_once(
            "200 OK",
            r#"{
                "message": "Prediction successful. Columns were auto-mapped.",
                "results": [
                    {"row": 1, "prediction": 1, "probability": 0.93, "risk_level": "High"},
                    {"row": 2, "prediction": 0, "probability": 0.71, "risk_level": "Low"}
                ],
                "summary": {"total_records": 2, "high_risk_count": 1, "low_risk_count": 1},
                "mapping": {"age": "age", "sex": "sex"}
            }"#,
        )
        .await;

        let batch = client(&base).upload(&path, DiseaseType::Heart).await.unwrap();
        assert_eq!(batch.summary.total_records, 2);
        assert_eq!(
            batch.summary.high_risk_count + batch.summary.low_risk_count,
            batch.results.len()
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/upload "));
        assert!(request.contains("multipart/form-data"));
        assert!(request.contains(r#"name="disease_type""#));
        assert!(request.contains(r#"filename="patients.csv""#));
        assert!(request.contains("63,male"));
    }

    #[tokio::test]
    async fn upload_rejects_inconsistent_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.csv");
        std::fs::write(&path, "age\n30\n").unwrap();

        let (base, server) = serve_once(
            "200 OK",
            r#"{
                "results": [{"row": 1, "prediction": 0, "probability": 0.6, "risk_level": "Low"}],
                "summary": {"total_records": 1, "high_risk_count": 1, "low_risk_count": 1}
            }"#,
        )
        .await;

        let err = client(&base).upload(&path, DiseaseType::Diabetes).await.unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedShape(_)));
        assert_eq!(err.user_message(UPLOAD_FALLBACK), UPLOAD_FALLBACK);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn upload_rejects_unsupported_extension_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let err = client(&unreachable_base().await)
            .upload(&path, DiseaseType::Heart)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(UPLOAD_FALLBACK), "Invalid file type");
    }

    #[tokio::test]
    async fn upload_missing_file_is_a_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.csv");

        let err = client(&unreachable_base().await)
            .upload(&path, DiseaseType::Heart)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::File { .. }));
        assert_eq!(err.user_message(UPLOAD_FALLBACK), UPLOAD_FALLBACK);
    }

    #[tokio::test]
    async fn upload_to_unreachable_endpoint_yields_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.xlsx");
        std::fs::write(&path, [0u8; 16]).unwrap();

        let err = client(&unreachable_base().await)
            .upload(&path, DiseaseType::Thyroid)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(UPLOAD_FALLBACK), UPLOAD_FALLBACK);
    }

    #[tokio::test]
    async fn features_lists_required_columns() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"disease_type":"heart","features":["age","sex","chest_pain_type"]}"#,
        )
        .await;

        let list = client(&base).features(DiseaseType::Heart).await.unwrap();
        assert_eq!(list.disease_type, "heart");
        assert_eq!(list.features, ["age", "sex", "chest_pain_type"]);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/features/heart "));
    }

    #[tokio::test]
    async fn health_reports_status() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"status":"healthy","message":"AI Healthcare Prediction API is running"}"#,
        )
        .await;

        let health = client(&base).health().await.unwrap();
        assert_eq!(health.status, "healthy");
        server.await.unwrap();
    }
}
