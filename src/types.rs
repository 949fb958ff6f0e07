//! Common types and data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Disease model served by the prediction API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseType {
    Diabetes,
    Heart,
    Thyroid,
}

impl DiseaseType {
    pub const ALL: [DiseaseType; 3] = [DiseaseType::Diabetes, DiseaseType::Heart, DiseaseType::Thyroid];

    /// Wire name, also used in endpoint paths and the history table
    pub fn as_str(self) -> &'static str {
        match self {
            DiseaseType::Diabetes => "diabetes",
            DiseaseType::Heart => "heart",
            DiseaseType::Thyroid => "thyroid",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DiseaseType::Diabetes => "Diabetes",
            DiseaseType::Heart => "Heart Disease",
            DiseaseType::Thyroid => "Thyroid Issues",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DiseaseType::Diabetes => "Predict diabetes risk based on symptoms and health parameters",
            DiseaseType::Heart => "Assess heart disease risk using cardiovascular indicators",
            DiseaseType::Thyroid => "Detect thyroid disorders through hormone levels and symptoms",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            DiseaseType::Diabetes => egui_phosphor::regular::FIRST_AID_KIT,
            DiseaseType::Heart => egui_phosphor::regular::HEARTBEAT,
            DiseaseType::Thyroid => egui_phosphor::regular::BRAIN,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "diabetes" => Some(DiseaseType::Diabetes),
            "heart" => Some(DiseaseType::Heart),
            "thyroid" => Some(DiseaseType::Thyroid),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            DiseaseType::Diabetes => 0,
            DiseaseType::Heart => 1,
            DiseaseType::Thyroid => 2,
        }
    }
}

impl fmt::Display for DiseaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary classification label returned by the remote model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "High" => Some(RiskLevel::High),
            "Low" => Some(RiskLevel::Low),
            _ => None,
        }
    }

    /// Model output class for this label (1 = positive)
    pub fn prediction(self) -> u8 {
        match self {
            RiskLevel::High => 1,
            RiskLevel::Low => 0,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat field mapping for one disease form, sent as the JSON request body
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PredictionRequest {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl PredictionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_number(&mut self, field: &str, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null);
        self.fields.insert(field.to_string(), value);
    }

    pub fn insert_bool(&mut self, field: &str, value: bool) {
        self.fields.insert(field.to_string(), serde_json::Value::Bool(value));
    }

    pub fn insert_str(&mut self, field: &str, value: &str) {
        self.fields
            .insert(field.to_string(), serde_json::Value::String(value.to_string()));
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Single prediction result from /api/predict/<disease>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub risk_level: RiskLevel,
    pub probability: f64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<u8>,
}

impl PredictionResponse {
    pub fn validate(&self) -> Result<(), String> {
        validate_probability(self.probability)?;
        if let Some(pred) = self.prediction {
            validate_prediction(pred, self.risk_level)?;
        }
        Ok(())
    }
}

/// Aggregate counts for a batch upload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_records: usize,
    pub high_risk_count: usize,
    pub low_risk_count: usize,
}

impl BatchSummary {
    /// Recompute the summary from result rows
    pub fn from_rows(rows: &[BatchRow]) -> Self {
        let high_risk_count = rows.iter().filter(|r| r.prediction == 1).count();
        Self {
            total_records: rows.len(),
            high_risk_count,
            low_risk_count: rows.len() - high_risk_count,
        }
    }
}

/// One scored row of an uploaded file (rows are 1-based)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    pub row: u32,
    pub prediction: u8,
    pub risk_level: RiskLevel,
    pub probability: f64,
}

/// Batch prediction result from /api/upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUploadResponse {
    pub summary: BatchSummary,
    pub results: Vec<BatchRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Uploaded column name -> standard feature name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mapping: BTreeMap<String, String>,
}

impl BatchUploadResponse {
    pub fn validate(&self) -> Result<(), String> {
        for r in &self.results {
            validate_probability(r.probability).map_err(|e| format!("row {}: {}", r.row, e))?;
            validate_prediction(r.prediction, r.risk_level)
                .map_err(|e| format!("row {}: {}", r.row, e))?;
        }

        let s = &self.summary;
        if s.high_risk_count + s.low_risk_count != self.results.len() {
            return Err(format!(
                "summary counts {} + {} do not match {} result rows",
                s.high_risk_count,
                s.low_risk_count,
                self.results.len()
            ));
        }
        if s.total_records != self.results.len() {
            return Err(format!(
                "summary total {} does not match {} result rows",
                s.total_records,
                self.results.len()
            ));
        }
        if BatchSummary::from_rows(&self.results) != *s {
            return Err("summary counts disagree with row predictions".to_string());
        }
        Ok(())
    }
}

/// Required input columns for a disease model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeatureList {
    pub disease_type: String,
    pub features: Vec<String>,
}

/// Response of the health check endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Where a history entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionSource {
    Manual,
    Batch,
}

impl PredictionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PredictionSource::Manual => "manual",
            PredictionSource::Batch => "batch",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(PredictionSource::Manual),
            "batch" => Some(PredictionSource::Batch),
            _ => None,
        }
    }
}

/// Column to sort by in the results table
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SortColumn {
    Date,
    Risk,
    Probability,
}

/// Sort direction for the results table
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Risk filter for the results table
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RiskFilter {
    All,
    High,
    Low,
}

impl RiskFilter {
    pub fn matches(self, level: RiskLevel) -> bool {
        match self {
            RiskFilter::All => true,
            RiskFilter::High => level == RiskLevel::High,
            RiskFilter::Low => level == RiskLevel::Low,
        }
    }
}

fn validate_probability(p: f64) -> Result<(), String> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(format!("probability {} outside [0, 1]", p))
    }
}

fn validate_prediction(pred: u8, level: RiskLevel) -> Result<(), String> {
    if pred > 1 {
        return Err(format!("prediction {} is not 0 or 1", pred));
    }
    if pred != level.prediction() {
        return Err(format!("prediction {} contradicts risk level {}", pred, level));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(row: u32, level: RiskLevel, probability: f64) -> BatchRow {
        BatchRow {
            row,
            prediction: level.prediction(),
            risk_level: level,
            probability,
        }
    }

    #[test]
    fn prediction_response_parses_server_shape() {
        let body = r#"{"prediction":1,"probability":0.87,"risk_level":"High","message":"High risk of diabetes detected"}"#;
        let resp: PredictionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.risk_level, RiskLevel::High);
        assert_eq!(resp.prediction, Some(1));
        assert!(resp.validate().is_ok());
    }

    #[test]
    fn prediction_response_without_prediction_field() {
        let body = r#"{"probability":0.6,"risk_level":"Low","message":"Low risk of heart disease"}"#;
        let resp: PredictionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.prediction, None);
        assert!(resp.validate().is_ok());
    }

    #[test]
    fn risk_level_is_exact() {
        let body = r#"{"probability":0.6,"risk_level":"high","message":""}"#;
        assert!(serde_json::from_str::<PredictionResponse>(body).is_err());
        assert_eq!(RiskLevel::parse("Medium"), None);
    }

    #[test]
    fn probability_out_of_range_is_rejected() {
        for p in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let resp = PredictionResponse {
                risk_level: RiskLevel::Low,
                probability: p,
                message: String::new(),
                prediction: None,
            };
            assert!(resp.validate().is_err(), "accepted {}", p);
        }
    }

    #[test]
    fn probability_bounds_are_inclusive() {
        for p in [0.0, 1.0] {
            let resp = PredictionResponse {
                risk_level: RiskLevel::High,
                probability: p,
                message: String::new(),
                prediction: Some(1),
            };
            assert!(resp.validate().is_ok());
        }
    }

    #[test]
    fn contradicting_prediction_is_rejected() {
        let resp = PredictionResponse {
            risk_level: RiskLevel::Low,
            probability: 0.7,
            message: String::new(),
            prediction: Some(1),
        };
        assert!(resp.validate().is_err());
    }

    #[test]
    fn batch_summary_from_rows() {
        let rows = vec![
            row(1, RiskLevel::High, 0.9),
            row(2, RiskLevel::Low, 0.8),
            row(3, RiskLevel::Low, 0.7),
        ];
        let s = BatchSummary::from_rows(&rows);
        assert_eq!(s.total_records, 3);
        assert_eq!(s.high_risk_count, 1);
        assert_eq!(s.low_risk_count, 2);
        assert_eq!(s.high_risk_count + s.low_risk_count, rows.len());
    }

    #[test]
    fn batch_response_parses_with_mapping() {
        let body = r#"{
            "message": "Prediction successful. Columns were auto-mapped.",
            "results": [
                {"row": 1, "prediction": 1, "probability": 0.91, "risk_level": "High"},
                {"row": 2, "prediction": 0, "probability": 0.66, "risk_level": "Low"}
            ],
            "summary": {"total_records": 2, "high_risk_count": 1, "low_risk_count": 1},
            "mapping": {"Age": "age", "Gender": "gender"}
        }"#;
        let resp: BatchUploadResponse = serde_json::from_str(body).unwrap();
        assert!(resp.validate().is_ok());
        assert_eq!(resp.mapping.get("Age").map(String::as_str), Some("age"));
        assert_eq!(resp.results[0].row, 1);
    }

    #[test]
    fn batch_response_with_mismatched_counts_is_rejected() {
        let resp = BatchUploadResponse {
            summary: BatchSummary {
                total_records: 2,
                high_risk_count: 2,
                low_risk_count: 1,
            },
            results: vec![row(1, RiskLevel::High, 0.9), row(2, RiskLevel::Low, 0.8)],
            message: None,
            mapping: BTreeMap::new(),
        };
        let err = resp.validate().unwrap_err();
        assert!(err.contains("do not match"));
    }

    #[test]
    fn batch_response_with_swapped_counts_is_rejected() {
        let resp = BatchUploadResponse {
            summary: BatchSummary {
                total_records: 3,
                high_risk_count: 2,
                low_risk_count: 1,
            },
            results: vec![
                row(1, RiskLevel::High, 0.9),
                row(2, RiskLevel::Low, 0.8),
                row(3, RiskLevel::Low, 0.8),
            ],
            message: None,
            mapping: BTreeMap::new(),
        };
        assert!(resp.validate().is_err());
    }

    #[test]
    fn empty_batch_is_valid() {
        let resp = BatchUploadResponse {
            summary: BatchSummary::default(),
            results: Vec::new(),
            message: None,
            mapping: BTreeMap::new(),
        };
        assert!(resp.validate().is_ok());
    }

    #[test]
    fn request_serializes_flat() {
        let mut req = PredictionRequest::new();
        req.insert_number("age", 45.0);
        req.insert_str("gender", "male");
        req.insert_bool("polyuria", true);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["age"], serde_json::json!(45.0));
        assert_eq!(json["gender"], "male");
        assert_eq!(json["polyuria"], true);
        assert_eq!(req.len(), 3);
    }

    #[test]
    fn disease_wire_names_round_trip() {
        for d in DiseaseType::ALL {
            assert_eq!(DiseaseType::parse(d.as_str()), Some(d));
            assert_eq!(serde_json::to_value(d).unwrap(), d.as_str());
        }
        assert_eq!(DiseaseType::parse("kidney"), None);
    }
}
