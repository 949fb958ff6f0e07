//! App module - contains the main application state and logic

mod dashboard;
mod manual;
mod modals;
mod requests;
mod results;
mod upload;
mod views;

use crate::analytics::{self, ResultsSummary};
use crate::api::PredictionClient;
use crate::db::{Database, HistoryEntry};
use crate::forms::DiseaseForm;
use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use eframe::egui;
use requests::Inbox;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Top-level screens reachable from the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Manual,
    Upload,
    Results,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Dashboard, Screen::Manual, Screen::Upload, Screen::Results];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Manual => "Manual Prediction",
            Screen::Upload => "File Upload",
            Screen::Results => "Results",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Screen::Dashboard => egui_phosphor::regular::SQUARES_FOUR,
            Screen::Manual => egui_phosphor::regular::NOTE_PENCIL,
            Screen::Upload => egui_phosphor::regular::UPLOAD_SIMPLE,
            Screen::Results => egui_phosphor::regular::CHART_BAR,
        }
    }
}

/// Server reachability as last reported by the health endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceStatus {
    Unknown,
    Checking,
    Online(HealthStatus),
    Offline(String),
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) db: Database,
    pub(crate) client: PredictionClient,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) inbox: Inbox,
    // Bumped when the base URL changes; older health and feature replies are dropped
    pub(crate) api_generation: u64,
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    pub(crate) screen: Screen,
    // One prediction or upload at a time
    pub(crate) busy: bool,
    pub(crate) service: ServiceStatus,
    pub(crate) health_check_started: bool,
    // Manual prediction
    pub(crate) manual_disease: DiseaseType,
    pub(crate) forms: [DiseaseForm; 3],
    pub(crate) manual_result: Option<(DiseaseType, PredictionResponse)>,
    pub(crate) manual_error: Option<String>,
    // File upload
    pub(crate) upload_disease: DiseaseType,
    pub(crate) upload_path: Option<PathBuf>,
    pub(crate) upload_dir: Option<String>,
    pub(crate) upload_result: Option<(DiseaseType, BatchUploadResponse)>,
    pub(crate) upload_error: Option<String>,
    pub(crate) features: HashMap<DiseaseType, Vec<String>>,
    pub(crate) features_requested: HashSet<DiseaseType>,
    pub(crate) features_error: HashMap<DiseaseType, String>,
    // Results
    pub(crate) results_disease: DiseaseType,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) history_summary: ResultsSummary,
    pub(crate) history_dirty: bool,
    pub(crate) history_limit: usize,
    pub(crate) risk_filter: RiskFilter,
    pub(crate) sort_column: SortColumn,
    pub(crate) sort_direction: SortDirection,
    pub(crate) show_clear_confirm: bool,
    // Dashboard history counts, indexed by DiseaseType::index
    pub(crate) stored_counts: [usize; 3],
    pub(crate) counts_dirty: bool,
    // Settings
    pub(crate) api_base_url: String,
    pub(crate) api_url_input: String,
    pub(crate) show_settings: bool,
    // Central panel rect for toast positioning
    pub(crate) central_panel_rect: Option<egui::Rect>,
    // Toast notification
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        db: Database,
        settings: Settings,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        Self::with_state(db, settings, data_dir, runtime)
    }

    /// Build the app state without touching the egui context
    pub(crate) fn with_state(
        db: Database,
        settings: Settings,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        let api_url = settings.effective_api_url();
        debug!(url = %api_url, "Prediction client configured");

        Self {
            db,
            client: PredictionClient::new(&api_url),
            runtime,
            inbox: Inbox::default(),
            api_generation: 0,
            logo_texture: None,
            screen: Screen::Dashboard,
            busy: false,
            service: ServiceStatus::Unknown,
            health_check_started: false,
            manual_disease: settings.manual_disease,
            forms: DiseaseType::ALL.map(DiseaseForm::new),
            manual_result: None,
            manual_error: None,
            upload_disease: settings.upload_disease,
            upload_path: None,
            upload_dir: settings.upload_dir.clone(),
            upload_result: None,
            upload_error: None,
            features: HashMap::new(),
            features_requested: HashSet::new(),
            features_error: HashMap::new(),
            results_disease: settings.results_disease,
            history: Vec::new(),
            history_summary: ResultsSummary::default(),
            history_dirty: true,
            history_limit: settings.history_limit.max(1),
            risk_filter: RiskFilter::All,
            sort_column: SortColumn::Date,
            sort_direction: SortDirection::Descending,
            show_clear_confirm: false,
            stored_counts: [0; 3],
            counts_dirty: true,
            api_url_input: settings.api_base_url.clone(),
            api_base_url: settings.api_base_url,
            show_settings: false,
            central_panel_rect: None,
            toast_message: None,
            toast_start: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            api_base_url: self.api_base_url.clone(),
            manual_disease: self.manual_disease,
            upload_disease: self.upload_disease,
            results_disease: self.results_disease,
            upload_dir: self.upload_dir.clone(),
            history_limit: self.history_limit,
        };
        settings.save(&self.data_dir);
    }

    pub(crate) fn form_mut(&mut self, disease: DiseaseType) -> &mut DiseaseForm {
        &mut self.forms[disease.index()]
    }

    pub(crate) fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_start = Some(std::time::Instant::now());
    }

    /// Mark cached history views stale after the store changed
    pub(crate) fn history_changed(&mut self) {
        self.history_dirty = true;
        self.counts_dirty = true;
    }

    /// Reload the results table from the history store when it is stale.
    /// The summary covers the whole disease; `history_limit` only caps the table.
    pub(crate) fn refresh_history(&mut self) {
        if !self.history_dirty {
            return;
        }
        self.history_dirty = false;
        let disease = self.results_disease;
        let loaded = self.db.summary(disease).and_then(|summary| {
            self.db
                .history(disease, self.history_limit)
                .map(|entries| (summary, entries))
        });
        match loaded {
            Ok((summary, entries)) => {
                self.history_summary = summary;
                self.history = entries;
            }
            Err(e) => {
                warn!(error = %e, disease = %self.results_disease, "Failed to load history");
                self.history.clear();
                self.history_summary = ResultsSummary::default();
                self.show_toast("Could not load prediction history");
            }
        }
    }

    /// Reload the dashboard counts when the store changed
    pub(crate) fn refresh_counts(&mut self) {
        if !self.counts_dirty {
            return;
        }
        self.counts_dirty = false;
        for disease in DiseaseType::ALL {
            self.stored_counts[disease.index()] = self.db.count(disease).unwrap_or_else(|e| {
                warn!(error = %e, disease = %disease, "Failed to count history");
                0
            });
        }
    }

    /// Indices into `history` for the current filter and sort
    pub(crate) fn visible_history(&self) -> Vec<usize> {
        analytics::filter_and_sort(&self.history, self.risk_filter, self.sort_column, self.sort_direction)
    }

    pub(crate) fn switch_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            debug!(from = ?self.screen, to = ?screen, "Switching screen");
            self.screen = screen;
            if screen == Screen::Results {
                self.history_dirty = true;
            }
        }
    }
}
