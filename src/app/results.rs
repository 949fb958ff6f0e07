//! Results screen: summary cards, high/low ratio and the history table

use super::App;
use crate::theme;
use crate::types::*;
use crate::ui::components;
use crate::utils::{format_confidence, format_timestamp};
use eframe::egui;
use tracing::{info, warn};

impl App {
    pub(crate) fn select_results_disease(&mut self, disease: DiseaseType) {
        if self.results_disease != disease {
            self.results_disease = disease;
            self.history_dirty = true;
        }
    }

    pub(crate) fn clear_history(&mut self) {
        let disease = self.results_disease;
        match self.db.clear(Some(disease)) {
            Ok(deleted) => {
                info!(disease = %disease, deleted = deleted, "History cleared");
                self.history_changed();
                self.show_toast(format!("Deleted {} {} predictions", deleted, disease.display_name()));
            }
            Err(e) => {
                warn!(error = %e, "Failed to clear history");
                self.show_toast("Could not clear history");
            }
        }
    }

    pub(crate) fn render_results(&mut self, ui: &mut egui::Ui) {
        Self::render_header(
            ui,
            "Results",
            "Summary of predictions stored on this computer",
        );

        if let Some(disease) = Self::disease_tabs(ui, self.results_disease, true) {
            self.select_results_disease(disease);
        }
        self.refresh_history();
        ui.add_space(theme::SPACING_LG);

        let s = self.history_summary;
        let spacing = theme::SPACING_LG;
        let card_w = ((ui.available_width() - spacing * 3.0) / 4.0 - theme::SPACING_LG * 2.0).max(100.0);
        let (_, high) = theme::risk_colors(RiskLevel::High);
        let (_, low) = theme::risk_colors(RiskLevel::Low);
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = spacing;
            components::stat_card(ui, card_w, "Total predictions", &s.total.to_string(), theme::TEXT_PRIMARY);
            components::stat_card(ui, card_w, "High risk", &s.high_risk.to_string(), high);
            components::stat_card(ui, card_w, "Low risk", &s.low_risk.to_string(), low);
            let avg = if s.total == 0 {
                "-".to_string()
            } else {
                format!("{:.1}%", s.average_confidence)
            };
            components::stat_card(ui, card_w, "Average confidence", &avg, theme::ACCENT);
        });

        ui.add_space(theme::SPACING_LG);
        theme::section_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                components::section_label(ui, "Risk distribution");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let high_pct = s.high_ratio() * 100.0;
                    let text = if s.total == 0 {
                        "No data".to_string()
                    } else {
                        format!("{:.0}% high  /  {:.0}% low", high_pct, 100.0 - high_pct)
                    };
                    ui.label(
                        egui::RichText::new(text)
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_MUTED),
                    );
                });
            });
            ui.add_space(theme::SPACING_SM);
            if s.total == 0 {
                components::ratio_bar(ui, 0.0, 10.0);
            } else {
                components::ratio_bar(ui, s.high_ratio(), 10.0);
            }
        });

        ui.add_space(theme::SPACING_LG);
        self.render_history_toolbar(ui);
        ui.add_space(theme::SPACING_SM);
        self.render_history_table(ui);
    }

    fn render_history_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            components::section_label(ui, "History");
            ui.add_space(theme::SPACING_MD);
            for (filter, label) in [
                (RiskFilter::All, "All"),
                (RiskFilter::High, "High"),
                (RiskFilter::Low, "Low"),
            ] {
                if ui.selectable_label(self.risk_filter == filter, label).clicked() {
                    self.risk_filter = filter;
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let has_rows = !self.history.is_empty();
                if ui
                    .add_enabled(
                        has_rows,
                        theme::button_danger(format!("{}  Clear History", egui_phosphor::regular::TRASH)),
                    )
                    .clicked()
                {
                    self.show_clear_confirm = true;
                }
                if ui
                    .add(theme::button(format!("{}  Refresh", egui_phosphor::regular::ARROW_CLOCKWISE)))
                    .clicked()
                {
                    self.history_dirty = true;
                }
            });
        });
    }

    fn render_history_table(&mut self, ui: &mut egui::Ui) {
        use egui_extras::{Column, TableBuilder};

        if self.history.is_empty() {
            ui.add_space(theme::SPACING_XL);
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(egui_phosphor::regular::CHART_BAR)
                        .size(40.0)
                        .color(theme::TEXT_DIM),
                );
                ui.label(
                    egui::RichText::new("No predictions yet. Use Manual Prediction or File Upload to get started.")
                        .color(theme::TEXT_DIM),
                );
            });
            return;
        }

        let indices = self.visible_history();
        let header_height = 30.0;
        let part = ui.available_width() / 6.5;

        let mut sort_clicked: Option<SortColumn> = None;
        TableBuilder::new(ui)
            .id_salt("history_table")
            .striped(true)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .min_scrolled_height(0.0)
            .column(Column::exact(part * 1.5))
            .column(Column::exact(part))
            .column(Column::exact(part * 0.6))
            .column(Column::exact(part))
            .column(Column::exact(part))
            .column(Column::remainder().clip(true))
            .header(header_height, |mut header| {
                header.col(|ui| {
                    if self.sort_header(ui, "DATE", SortColumn::Date) {
                        sort_clicked = Some(SortColumn::Date);
                    }
                });
                header.col(|ui| {
                    Self::plain_header(ui, "SOURCE");
                });
                header.col(|ui| {
                    Self::plain_header(ui, "ROW");
                });
                header.col(|ui| {
                    if self.sort_header(ui, "RISK", SortColumn::Risk) {
                        sort_clicked = Some(SortColumn::Risk);
                    }
                });
                header.col(|ui| {
                    if self.sort_header(ui, "CONFIDENCE", SortColumn::Probability) {
                        sort_clicked = Some(SortColumn::Probability);
                    }
                });
                header.col(|ui| {
                    Self::plain_header(ui, "MESSAGE");
                });
            })
            .body(|body| {
                body.rows(theme::ROW_HEIGHT, indices.len(), |mut row| {
                    let e = &self.history[indices[row.index()]];
                    row.col(|ui| {
                        ui.label(format_timestamp(&e.created_at));
                    });
                    row.col(|ui| {
                        let (icon, text) = match e.source {
                            PredictionSource::Manual => (egui_phosphor::regular::NOTE_PENCIL, "Manual"),
                            PredictionSource::Batch => (egui_phosphor::regular::FILE_CSV, "Batch"),
                        };
                        ui.label(egui::RichText::new(format!("{}  {}", icon, text)).color(theme::TEXT_MUTED));
                    });
                    row.col(|ui| {
                        let text = e.row.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
                        ui.label(egui::RichText::new(text).color(theme::TEXT_MUTED));
                    });
                    row.col(|ui| {
                        components::risk_badge(ui, e.risk_level);
                    });
                    row.col(|ui| {
                        ui.label(format_confidence(e.probability));
                    });
                    row.col(|ui| {
                        ui.label(egui::RichText::new(&e.message).color(theme::TEXT_MUTED));
                    });
                });
            });

        if let Some(col) = sort_clicked {
            if self.sort_column == col {
                self.sort_direction = match self.sort_direction {
                    SortDirection::Ascending => SortDirection::Descending,
                    SortDirection::Descending => SortDirection::Ascending,
                };
            } else {
                self.sort_column = col;
                self.sort_direction = SortDirection::Descending;
            }
        }
    }

    /// Clickable column title with a caret. Returns true when clicked.
    fn sort_header(&self, ui: &mut egui::Ui, title: &str, col: SortColumn) -> bool {
        let is_sorted = self.sort_column == col;
        let icon = if is_sorted {
            match self.sort_direction {
                SortDirection::Ascending => egui_phosphor::regular::CARET_UP,
                SortDirection::Descending => egui_phosphor::regular::CARET_DOWN,
            }
        } else {
            egui_phosphor::regular::CARET_UP_DOWN
        };
        let color = if is_sorted { theme::TEXT_PRIMARY } else { theme::TEXT_MUTED };
        ui.add(
            egui::Label::new(
                egui::RichText::new(format!("{} {}", title, icon))
                    .size(theme::FONT_LABEL)
                    .strong()
                    .color(color),
            )
            .selectable(false)
            .sense(egui::Sense::click()),
        )
        .clicked()
    }

    fn plain_header(ui: &mut egui::Ui, title: &str) {
        ui.add(
            egui::Label::new(
                egui::RichText::new(title)
                    .size(theme::FONT_LABEL)
                    .strong()
                    .color(theme::TEXT_MUTED),
            )
            .selectable(false),
        );
    }
}
