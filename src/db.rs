//! Database module for Health Risk Predictor
//! Handles SQLite storage for the local prediction history

use crate::analytics::ResultsSummary;
use crate::types::{BatchUploadResponse, DiseaseType, PredictionResponse, PredictionSource, RiskLevel};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Result};
use std::path::Path;
use tracing::{debug, warn};

/// One completed prediction stored in the history table
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub disease: DiseaseType,
    pub source: PredictionSource,
    /// Row number within the uploaded file, batch entries only
    pub row: Option<u32>,
    pub risk_level: RiskLevel,
    pub probability: f64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        debug!(path = %path.display(), "Database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let db = Self { conn: Connection::open_in_memory()? };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                disease TEXT NOT NULL,
                source TEXT NOT NULL,
                row_number INTEGER,
                risk_level TEXT NOT NULL,
                probability REAL NOT NULL,
                message TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_predictions_disease ON predictions(disease);
            CREATE INDEX IF NOT EXISTS idx_predictions_created ON predictions(created_at);",
        )?;
        Ok(())
    }

    /// Record a manual-entry prediction, returns the new row id
    pub fn record_prediction(&self, disease: DiseaseType, prediction: &PredictionResponse) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO predictions (disease, source, row_number, risk_level, probability, message, created_at)
             VALUES (?1, ?2, NULL, ?3, ?4, ?5, ?6)",
            params![
                disease.as_str(),
                PredictionSource::Manual.as_str(),
                prediction.risk_level.as_str(),
                prediction.probability,
                prediction.message,
                timestamp(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Record every row of a batch result in one transaction
    pub fn record_batch(&mut self, disease: DiseaseType, batch: &BatchUploadResponse) -> Result<usize> {
        let now = timestamp();
        let message = batch.message.clone().unwrap_or_default();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO predictions (disease, source, row_number, risk_level, probability, message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for r in &batch.results {
                stmt.execute(params![
                    disease.as_str(),
                    PredictionSource::Batch.as_str(),
                    r.row,
                    r.risk_level.as_str(),
                    r.probability,
                    message,
                    now,
                ])?;
            }
        }
        tx.commit()?;
        debug!(disease = %disease, rows = batch.results.len(), "Batch recorded");
        Ok(batch.results.len())
    }

    /// History for one disease, newest first
    pub fn history(&self, disease: DiseaseType, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, disease, source, row_number, risk_level, probability, message, created_at
             FROM predictions WHERE disease = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![disease.as_str(), limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<u32>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, disease, source, row_number, risk, probability, message, created_at) = row?;
            // Rows written by another build may carry labels we don't know; skip them
            let parsed = (
                DiseaseType::parse(&disease),
                PredictionSource::parse(&source),
                RiskLevel::parse(&risk),
                DateTime::parse_from_rfc3339(&created_at).ok(),
            );
            match parsed {
                (Some(disease), Some(source), Some(risk_level), Some(ts)) => entries.push(HistoryEntry {
                    id,
                    disease,
                    source,
                    row: row_number,
                    risk_level,
                    probability,
                    message,
                    created_at: ts.with_timezone(&Utc),
                }),
                _ => warn!(id = id, "Skipping unreadable history row"),
            }
        }
        Ok(entries)
    }

    /// Number of readable predictions stored for a disease
    pub fn count(&self, disease: DiseaseType) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM predictions
             WHERE disease = ?1 AND risk_level IN ('High', 'Low')",
            params![disease.as_str()],
            |r| r.get(0),
        )?;
        Ok(count as usize)
    }

    /// Totals over every stored prediction for a disease, not just the
    /// rows a `history` call returns
    pub fn summary(&self, disease: DiseaseType) -> Result<ResultsSummary> {
        let (total, high, avg): (i64, i64, f64) = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(risk_level = 'High'), 0),
                    COALESCE(AVG(probability), 0.0) * 100.0
             FROM predictions
             WHERE disease = ?1 AND risk_level IN ('High', 'Low')",
            params![disease.as_str()],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )?;
        Ok(ResultsSummary {
            total: total as usize,
            high_risk: high as usize,
            low_risk: (total - high) as usize,
            average_confidence: avg,
        })
    }

    /// Delete history, for one disease or everything
    pub fn clear(&self, disease: Option<DiseaseType>) -> Result<usize> {
        let deleted = match disease {
            Some(d) => self
                .conn
                .execute("DELETE FROM predictions WHERE disease = ?1", params![d.as_str()])?,
            None => self.conn.execute("DELETE FROM predictions", [])?,
        };
        Ok(deleted)
    }
}

/// Fixed-width UTC timestamp so text ordering matches time ordering
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BatchRow, BatchSummary};
    use std::collections::BTreeMap;

    fn prediction(level: RiskLevel, probability: f64) -> PredictionResponse {
        PredictionResponse {
            risk_level: level,
            probability,
            message: format!("{} risk", level),
            prediction: Some(level.prediction()),
        }
    }

    fn batch(levels: &[RiskLevel]) -> BatchUploadResponse {
        let results: Vec<BatchRow> = levels
            .iter()
            .enumerate()
            .map(|(i, &level)| BatchRow {
                row: i as u32 + 1,
                prediction: level.prediction(),
                risk_level: level,
                probability: 0.75,
            })
            .collect();
        BatchUploadResponse {
            summary: BatchSummary::from_rows(&results),
            results,
            message: Some("Prediction successful. Columns were auto-mapped.".into()),
            mapping: BTreeMap::new(),
        }
    }

    #[test]
    fn manual_prediction_round_trips() {
        let db = Database::open_in_memory().unwrap();
        let id = db
            .record_prediction(DiseaseType::Heart, &prediction(RiskLevel::High, 0.88))
            .unwrap();

        let entries = db.history(DiseaseType::Heart, 10).unwrap();
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.id, id);
        assert_eq!(e.source, PredictionSource::Manual);
        assert_eq!(e.row, None);
        assert_eq!(e.risk_level, RiskLevel::High);
        assert!((e.probability - 0.88).abs() < 1e-9);
        assert_eq!(e.message, "High risk");
    }

    #[test]
    fn batch_rows_are_recorded_with_row_numbers() {
        let mut db = Database::open_in_memory().unwrap();
        let recorded = db
            .record_batch(
                DiseaseType::Diabetes,
                &batch(&[RiskLevel::High, RiskLevel::Low, RiskLevel::Low]),
            )
            .unwrap();
        assert_eq!(recorded, 3);
        assert_eq!(db.count(DiseaseType::Diabetes).unwrap(), 3);

        let mut rows: Vec<u32> = db
            .history(DiseaseType::Diabetes, 10)
            .unwrap()
            .iter()
            .filter_map(|e| e.row)
            .collect();
        rows.sort();
        assert_eq!(rows, [1, 2, 3]);
    }

    #[test]
    fn history_is_per_disease_newest_first_and_limited() {
        let db = Database::open_in_memory().unwrap();
        for p in [0.6, 0.7, 0.8] {
            db.record_prediction(DiseaseType::Thyroid, &prediction(RiskLevel::Low, p))
                .unwrap();
        }
        db.record_prediction(DiseaseType::Heart, &prediction(RiskLevel::High, 0.9))
            .unwrap();

        let entries = db.history(DiseaseType::Thyroid, 2).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].id > entries[1].id);
        assert!(entries.iter().all(|e| e.disease == DiseaseType::Thyroid));
    }

    #[test]
    fn clear_one_disease_keeps_others() {
        let mut db = Database::open_in_memory().unwrap();
        db.record_batch(DiseaseType::Heart, &batch(&[RiskLevel::High, RiskLevel::Low]))
            .unwrap();
        db.record_prediction(DiseaseType::Diabetes, &prediction(RiskLevel::Low, 0.6))
            .unwrap();

        assert_eq!(db.clear(Some(DiseaseType::Heart)).unwrap(), 2);
        assert_eq!(db.count(DiseaseType::Heart).unwrap(), 0);
        assert_eq!(db.count(DiseaseType::Diabetes).unwrap(), 1);
        assert_eq!(db.clear(None).unwrap(), 1);
    }

    #[test]
    fn unknown_labels_are_skipped() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO predictions (disease, source, risk_level, probability, created_at)
                 VALUES ('heart', 'manual', 'Medium', 0.5, '2024-01-01T00:00:00+00:00')",
                [],
            )
            .unwrap();
        db.record_prediction(DiseaseType::Heart, &prediction(RiskLevel::Low, 0.6))
            .unwrap();

        let entries = db.history(DiseaseType::Heart, 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].risk_level, RiskLevel::Low);
    }

    #[test]
    fn summary_covers_rows_beyond_the_history_limit() {
        let db = Database::open_in_memory().unwrap();
        for (level, p) in [
            (RiskLevel::High, 0.9),
            (RiskLevel::High, 0.8),
            (RiskLevel::Low, 0.7),
            (RiskLevel::Low, 0.6),
            (RiskLevel::Low, 0.5),
        ] {
            db.record_prediction(DiseaseType::Heart, &prediction(level, p))
                .unwrap();
        }
        db.record_prediction(DiseaseType::Thyroid, &prediction(RiskLevel::High, 0.99))
            .unwrap();

        assert_eq!(db.history(DiseaseType::Heart, 3).unwrap().len(), 3);
        let s = db.summary(DiseaseType::Heart).unwrap();
        assert_eq!(s.total, 5);
        assert_eq!(s.total, db.count(DiseaseType::Heart).unwrap());
        assert_eq!(s.high_risk, 2);
        assert_eq!(s.low_risk, 3);
        assert!((s.average_confidence - 70.0).abs() < 1e-9);
    }

    #[test]
    fn summary_of_empty_history_is_zero() {
        let db = Database::open_in_memory().unwrap();
        let s = db.summary(DiseaseType::Diabetes).unwrap();
        assert_eq!(s, ResultsSummary::default());
        assert_eq!(s.high_ratio(), 0.0);
    }

    #[test]
    fn summary_and_count_skip_unknown_labels() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO predictions (disease, source, risk_level, probability, created_at)
                 VALUES ('heart', 'manual', 'Medium', 0.5, '2024-01-01T00:00:00+00:00')",
                [],
            )
            .unwrap();
        db.record_prediction(DiseaseType::Heart, &prediction(RiskLevel::Low, 0.6))
            .unwrap();

        assert_eq!(db.count(DiseaseType::Heart).unwrap(), 1);
        assert_eq!(db.summary(DiseaseType::Heart).unwrap().total, 1);
    }

    #[test]
    fn database_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");
        {
            let db = Database::open(&path).unwrap();
            db.record_prediction(DiseaseType::Heart, &prediction(RiskLevel::High, 0.7))
                .unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.count(DiseaseType::Heart).unwrap(), 1);
    }
}
