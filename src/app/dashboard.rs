//! Dashboard: one card per disease model with shortcuts into the other screens

use super::{App, Screen, ServiceStatus};
use crate::theme;
use crate::types::DiseaseType;
use crate::ui::components;
use eframe::egui;

impl App {
    pub(crate) fn render_dashboard(&mut self, ui: &mut egui::Ui) {
        Self::render_header(
            ui,
            "Health Risk Predictor",
            "Assess disease risk from individual health parameters or whole patient files",
        );

        if let ServiceStatus::Offline(msg) = &self.service {
            components::error_banner(ui, &format!("{} ({})", msg, self.client.base_url()));
            ui.add_space(theme::SPACING_LG);
        }

        self.refresh_counts();
        let spacing = theme::SPACING_LG;
        let card_w = ((ui.available_width() - spacing * 2.0) / 3.0 - theme::SPACING_LG * 2.0).max(160.0);

        let mut target: Option<(Screen, DiseaseType)> = None;
        ui.horizontal_top(|ui| {
            ui.spacing_mut().item_spacing.x = spacing;
            for disease in DiseaseType::ALL {
                let stored = self.stored_counts[disease.index()];
                theme::card_frame().show(ui, |ui| {
                    ui.set_width(card_w);
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(disease.icon())
                                    .size(theme::FONT_DISPLAY)
                                    .color(theme::disease_color(disease)),
                            );
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(disease.display_name())
                                        .size(theme::FONT_HEADING)
                                        .strong()
                                        .color(theme::TEXT_PRIMARY),
                                )
                                .selectable(false),
                            );
                        });
                        ui.add_space(theme::SPACING_SM);
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(disease.description())
                                    .size(theme::FONT_LABEL)
                                    .color(theme::TEXT_MUTED),
                            )
                            .wrap()
                            .selectable(false),
                        );
                        ui.add_space(theme::SPACING_SM);
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(format!("{} predictions in history", stored))
                                    .size(theme::FONT_SMALL)
                                    .color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                        ui.add_space(theme::SPACING_MD);
                        ui.horizontal(|ui| {
                            if ui.add(theme::button_accent("Enter data")).clicked() {
                                target = Some((Screen::Manual, disease));
                            }
                            if ui.add(theme::button("Upload file")).clicked() {
                                target = Some((Screen::Upload, disease));
                            }
                            if ui.add(theme::button("Results")).clicked() {
                                target = Some((Screen::Results, disease));
                            }
                        });
                    });
                });
            }
        });

        if let Some((screen, disease)) = target {
            match screen {
                Screen::Manual => self.select_manual_disease(disease),
                Screen::Upload => self.select_upload_disease(ui.ctx(), disease),
                Screen::Results => self.select_results_disease(disease),
                Screen::Dashboard => {}
            }
            self.switch_screen(screen);
        }

        ui.add_space(theme::SPACING_XL);
        theme::section_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            components::section_label(ui, "How it works");
            ui.add_space(theme::SPACING_SM);
            for line in [
                "Manual Prediction sends one patient's parameters and shows the risk level with its confidence.",
                "File Upload scores every row of a CSV or Excel file and summarizes high and low risk counts.",
                "Results keeps a local history of every prediction, filterable by risk level.",
            ] {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(format!("{}  {}", egui_phosphor::regular::DOT_OUTLINE, line))
                            .size(theme::FONT_LABEL)
                            .color(theme::TEXT_SECONDARY),
                    )
                    .wrap()
                    .selectable(false),
                );
            }
        });
    }
}
