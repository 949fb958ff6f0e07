//! Background requests against the prediction API
//!
//! Each request runs on the app's tokio runtime and drops its outcome into a
//! shared inbox. The frame loop drains the inbox once per frame.

use super::{App, Screen, ServiceStatus};
use crate::api::PredictionClient;
use crate::constants::*;
use crate::settings::Settings;
use crate::types::*;
use eframe::egui;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Finished request, already collapsed to a user-facing error string.
/// Health and feature replies carry the API generation they were sent under.
#[derive(Debug)]
pub(crate) enum Outcome {
    Health(u64, Result<HealthStatus, String>),
    Features(u64, DiseaseType, Result<FeatureList, String>),
    Predict(DiseaseType, Result<PredictionResponse, String>),
    Upload(DiseaseType, Result<BatchUploadResponse, String>),
}

#[derive(Clone, Default)]
pub(crate) struct Inbox(Arc<Mutex<Vec<Outcome>>>);

impl Inbox {
    fn push(&self, ctx: &egui::Context, outcome: Outcome) {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(outcome);
        ctx.request_repaint();
    }

    fn drain(&self) -> Vec<Outcome> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl App {
    pub(crate) fn check_health(&mut self, ctx: &egui::Context) {
        if self.service == ServiceStatus::Checking {
            return;
        }
        self.service = ServiceStatus::Checking;

        let generation = self.api_generation;
        let client = self.client.clone();
        let inbox = self.inbox.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = client.health().await.map_err(|e| {
                warn!(error = %e, "Health check failed");
                e.user_message(SERVICE_FALLBACK)
            });
            inbox.push(&ctx, Outcome::Health(generation, result));
        });
    }

    /// Ask for the column list again after a failed fetch
    pub(crate) fn retry_features(&mut self, ctx: &egui::Context, disease: DiseaseType) {
        self.features_error.remove(&disease);
        self.features_requested.remove(&disease);
        self.request_features(ctx, disease);
    }

    /// Fetch the expected upload columns for a disease, once per session
    pub(crate) fn request_features(&mut self, ctx: &egui::Context, disease: DiseaseType) {
        if !self.features_requested.insert(disease) {
            return;
        }

        let generation = self.api_generation;
        let client = self.client.clone();
        let inbox = self.inbox.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = client.features(disease).await.map_err(|e| {
                warn!(error = %e, disease = %disease, "Feature list request failed");
                e.user_message(SERVICE_FALLBACK)
            });
            inbox.push(&ctx, Outcome::Features(generation, disease, result));
        });
    }

    pub(crate) fn submit_prediction(&mut self, ctx: &egui::Context) {
        if self.busy {
            return;
        }
        let disease = self.manual_disease;
        let request = match self.forms[disease.index()].to_request() {
            Ok(request) => request,
            Err(msg) => {
                self.manual_error = Some(msg);
                return;
            }
        };

        self.busy = true;
        self.manual_error = None;
        self.manual_result = None;

        let client = self.client.clone();
        let inbox = self.inbox.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = client.predict(disease, &request).await.map_err(|e| {
                warn!(error = %e, disease = %disease, "Prediction failed");
                e.user_message(PREDICT_FALLBACK)
            });
            inbox.push(&ctx, Outcome::Predict(disease, result));
        });
    }

    pub(crate) fn submit_upload(&mut self, ctx: &egui::Context) {
        if self.busy {
            return;
        }
        let Some(path) = self.upload_path.clone() else {
            self.upload_error = Some("Please select a file to upload".to_string());
            return;
        };
        let disease = self.upload_disease;

        self.busy = true;
        self.upload_error = None;
        self.upload_result = None;

        let client = self.client.clone();
        let inbox = self.inbox.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = client.upload(&path, disease).await.map_err(|e| {
                warn!(error = %e, disease = %disease, file = %path.display(), "Upload failed");
                e.user_message(UPLOAD_FALLBACK)
            });
            inbox.push(&ctx, Outcome::Upload(disease, result));
        });
    }

    /// Apply finished requests to the app state
    pub(crate) fn poll_requests(&mut self) {
        for outcome in self.inbox.drain() {
            match outcome {
                Outcome::Health(generation, _) | Outcome::Features(generation, _, _)
                    if generation != self.api_generation =>
                {
                    debug!(generation, current = self.api_generation, "Dropping reply for a previous API URL");
                }
                Outcome::Health(_, result) => {
                    self.service = match result {
                        Ok(status) => ServiceStatus::Online(status),
                        Err(msg) => ServiceStatus::Offline(msg),
                    };
                }
                Outcome::Features(_, disease, result) => match result {
                    Ok(list) => {
                        self.features.insert(disease, list.features);
                    }
                    Err(msg) => {
                        self.features_error.insert(disease, msg);
                    }
                },
                Outcome::Predict(disease, result) => {
                    self.busy = false;
                    match result {
                        Ok(prediction) => {
                            self.record_prediction(disease, &prediction);
                            self.manual_result = Some((disease, prediction));
                        }
                        Err(msg) => self.manual_error = Some(msg),
                    }
                }
                Outcome::Upload(disease, result) => {
                    self.busy = false;
                    match result {
                        Ok(batch) => {
                            self.record_batch(disease, &batch);
                            self.upload_result = Some((disease, batch));
                        }
                        Err(msg) => self.upload_error = Some(msg),
                    }
                }
            }
        }
    }

    fn record_prediction(&mut self, disease: DiseaseType, prediction: &PredictionResponse) {
        match self.db.record_prediction(disease, prediction) {
            Ok(id) => {
                info!(id = id, disease = %disease, "Prediction saved to history");
                self.history_changed();
                self.show_toast("Prediction saved to history");
            }
            Err(e) => {
                warn!(error = %e, "Failed to save prediction");
                self.show_toast("Could not save prediction to history");
            }
        }
    }

    fn record_batch(&mut self, disease: DiseaseType, batch: &BatchUploadResponse) {
        match self.db.record_batch(disease, batch) {
            Ok(rows) => {
                info!(rows = rows, disease = %disease, "Batch saved to history");
                self.history_changed();
                self.show_toast(format!("{} predictions saved to history", rows));
            }
            Err(e) => {
                warn!(error = %e, "Failed to save batch");
                self.show_toast("Could not save batch to history");
            }
        }
    }

    /// Point the client at a new base URL and re-check the service
    pub(crate) fn apply_api_url(&mut self, ctx: &egui::Context) {
        let url = self.api_url_input.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            self.api_url_input = self.api_base_url.clone();
            return;
        }
        self.api_base_url = url;
        self.api_url_input = self.api_base_url.clone();
        self.save_settings();

        let effective = Settings::api_url_for(&self.api_base_url);
        info!(url = %effective, "Prediction API URL changed");
        self.client = PredictionClient::new(&effective);
        self.api_generation += 1;

        self.features.clear();
        self.features_requested.clear();
        self.features_error.clear();
        self.service = ServiceStatus::Unknown;
        self.check_health(ctx);
        if self.screen == Screen::Upload {
            self.request_features(ctx, self.upload_disease);
        }
        self.show_toast("Settings saved");
    }
}
