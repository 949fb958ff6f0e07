//! File upload screen: pick a CSV/Excel file, score it, show the batch

use super::App;
use crate::constants::UPLOAD_EXTENSIONS;
use crate::settings::Settings;
use crate::theme;
use crate::types::{BatchUploadResponse, DiseaseType};
use crate::ui::components;
use crate::utils::format_confidence;
use eframe::egui;
use std::path::PathBuf;
use tracing::debug;

impl App {
    pub(crate) fn select_upload_disease(&mut self, ctx: &egui::Context, disease: DiseaseType) {
        if self.upload_disease != disease {
            self.upload_disease = disease;
            self.upload_error = None;
        }
        self.request_features(ctx, disease);
    }

    fn pick_upload_file(&mut self) {
        let start_dir = Settings::upload_dir_for(self.upload_dir.as_deref());

        if let Some(path) = rfd::FileDialog::new()
            .set_directory(&start_dir)
            .add_filter("Spreadsheets", UPLOAD_EXTENSIONS)
            .pick_file()
        {
            debug!(path = %path.display(), "Upload file selected");
            self.upload_dir = path.parent().map(|p| p.to_string_lossy().to_string());
            self.upload_path = Some(path);
            self.upload_error = None;
            self.save_settings();
        }
    }

    pub(crate) fn render_upload(&mut self, ui: &mut egui::Ui) {
        Self::render_header(
            ui,
            "File Upload",
            "Score every patient in a CSV or Excel file at once",
        );

        let ctx = ui.ctx().clone();
        if let Some(disease) = Self::disease_tabs(ui, self.upload_disease, !self.busy) {
            self.select_upload_disease(&ctx, disease);
        }
        // Cheap after the first call per disease
        self.request_features(&ctx, self.upload_disease);
        ui.add_space(theme::SPACING_LG);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.render_upload_form(ui, &ctx);

                ui.add_space(theme::SPACING_LG);
                if let Some(err) = &self.upload_error {
                    components::error_banner(ui, err);
                } else if let Some((disease, batch)) = &self.upload_result {
                    Self::render_batch(ui, *disease, batch);
                }
            });
    }

    fn render_upload_form(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let enabled = !self.busy;
        theme::section_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            components::section_label(ui, "File");
            ui.add_space(theme::SPACING_SM);

            ui.horizontal(|ui| {
                let name = self
                    .upload_path
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string());
                let (text, color) = match &name {
                    Some(n) => (n.as_str(), theme::TEXT_PRIMARY),
                    None => ("No file selected", theme::TEXT_DIM),
                };
                ui.label(
                    egui::RichText::new(format!("{}  {}", egui_phosphor::regular::FILE_CSV, text))
                        .size(theme::FONT_BODY)
                        .color(color),
                );
                if ui
                    .add_enabled(
                        enabled,
                        theme::button(format!("{}  Browse", egui_phosphor::regular::FOLDER_OPEN)),
                    )
                    .clicked()
                {
                    self.pick_upload_file();
                }
            });

            // Accept files dropped onto the window
            let dropped: Option<PathBuf> = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
            if let Some(path) = dropped.filter(|_| enabled) {
                debug!(path = %path.display(), "File dropped");
                self.upload_dir = path.parent().map(|p| p.to_string_lossy().to_string());
                self.upload_path = Some(path);
                self.upload_error = None;
            }

            ui.add(
                egui::Label::new(
                    egui::RichText::new(format!(
                        "Accepted formats: {}. Drop a file here or browse.",
                        UPLOAD_EXTENSIONS
                            .iter()
                            .map(|e| format!(".{}", e))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );

            ui.add_space(theme::SPACING_MD);
            components::section_label(ui, "Expected columns");
            ui.add_space(theme::SPACING_SM);
            let disease = self.upload_disease;
            if let Some(columns) = self.features.get(&disease) {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(columns.join(", "))
                            .size(theme::FONT_LABEL)
                            .monospace()
                            .color(theme::TEXT_SECONDARY),
                    )
                    .wrap(),
                );
            } else if let Some(msg) = self.features_error.get(&disease) {
                let retry = ui
                    .horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(msg)
                                .size(theme::FONT_LABEL)
                                .color(theme::TEXT_DIM),
                        );
                        ui.add(theme::button("Retry")).clicked()
                    })
                    .inner;
                if retry {
                    self.retry_features(ctx, disease);
                }
            } else {
                components::busy_indicator(ui, "Loading column list...");
            }

            ui.add_space(theme::SPACING_LG);
            ui.horizontal(|ui| {
                let ready = enabled && self.upload_path.is_some();
                let upload = ui.add(theme::button_accent_enabled(
                    format!(
                        "{}  Upload and Predict {}",
                        egui_phosphor::regular::UPLOAD_SIMPLE,
                        self.upload_disease.display_name()
                    ),
                    ready,
                ));
                if upload.clicked() && ready {
                    self.submit_upload(ctx);
                }
                if self.busy {
                    components::busy_indicator(ui, "Processing file...");
                }
            });
        });
    }

    fn render_batch(ui: &mut egui::Ui, disease: DiseaseType, batch: &BatchUploadResponse) {
        if let Some(message) = &batch.message {
            ui.label(
                egui::RichText::new(format!("{}  {}", egui_phosphor::regular::INFO, message))
                    .size(theme::FONT_LABEL)
                    .color(theme::TEXT_MUTED),
            );
            ui.add_space(theme::SPACING_SM);
        }

        let s = &batch.summary;
        let spacing = theme::SPACING_LG;
        let card_w = ((ui.available_width() - spacing * 2.0) / 3.0 - theme::SPACING_LG * 2.0).max(120.0);
        let (_, high) = theme::risk_colors(crate::types::RiskLevel::High);
        let (_, low) = theme::risk_colors(crate::types::RiskLevel::Low);
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = spacing;
            components::stat_card(ui, card_w, "Total records", &s.total_records.to_string(), theme::TEXT_PRIMARY);
            components::stat_card(ui, card_w, "High risk", &s.high_risk_count.to_string(), high);
            components::stat_card(ui, card_w, "Low risk", &s.low_risk_count.to_string(), low);
        });

        if !batch.mapping.is_empty() {
            ui.add_space(theme::SPACING_MD);
            egui::CollapsingHeader::new(
                egui::RichText::new(format!("Column mapping ({})", batch.mapping.len()))
                    .size(theme::FONT_LABEL)
                    .color(theme::TEXT_MUTED),
            )
            .id_salt(("batch_mapping", disease.as_str()))
            .show(ui, |ui| {
                egui::Grid::new("batch_mapping_grid").striped(false).show(ui, |ui| {
                    for (uploaded, standard) in &batch.mapping {
                        ui.label(egui::RichText::new(uploaded).monospace().color(theme::TEXT_SECONDARY));
                        ui.label(egui::RichText::new(egui_phosphor::regular::ARROW_RIGHT).color(theme::TEXT_DIM));
                        ui.label(egui::RichText::new(standard).monospace().color(theme::TEXT_SECONDARY));
                        ui.end_row();
                    }
                });
            });
        }

        ui.add_space(theme::SPACING_MD);
        Self::render_batch_table(ui, batch);
    }

    fn render_batch_table(ui: &mut egui::Ui, batch: &BatchUploadResponse) {
        use egui_extras::{Column, TableBuilder};

        if batch.results.is_empty() {
            ui.label(
                egui::RichText::new("The file contained no rows")
                    .size(theme::FONT_LABEL)
                    .color(theme::TEXT_DIM),
            );
            return;
        }

        let header_height = 30.0;
        let part = ui.available_width() / 4.0;
        TableBuilder::new(ui)
            .id_salt("batch_results")
            .striped(true)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .min_scrolled_height(0.0)
            .max_scroll_height(400.0)
            .column(Column::exact(part))
            .column(Column::exact(part))
            .column(Column::exact(part))
            .column(Column::remainder())
            .header(header_height, |mut header| {
                for title in ["ROW", "PREDICTION", "RISK", "CONFIDENCE"] {
                    header.col(|ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(title)
                                    .size(theme::FONT_LABEL)
                                    .strong()
                                    .color(theme::TEXT_MUTED),
                            )
                            .selectable(false),
                        );
                    });
                }
            })
            .body(|body| {
                body.rows(theme::ROW_HEIGHT, batch.results.len(), |mut row| {
                    let r = &batch.results[row.index()];
                    row.col(|ui| {
                        ui.label(r.row.to_string());
                    });
                    row.col(|ui| {
                        ui.label(r.prediction.to_string());
                    });
                    row.col(|ui| {
                        components::risk_badge(ui, r.risk_level);
                    });
                    row.col(|ui| {
                        ui.label(format_confidence(r.probability));
                    });
                });
            });
    }
}
