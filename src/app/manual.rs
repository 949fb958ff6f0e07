//! Manual prediction screen: one form per disease, submit, result card

use super::App;
use crate::forms::{FieldKind, FieldValue, Sex};
use crate::theme;
use crate::types::{DiseaseType, PredictionResponse};
use crate::ui::components;
use crate::utils::format_confidence;
use eframe::egui;

impl App {
    pub(crate) fn select_manual_disease(&mut self, disease: DiseaseType) {
        if self.manual_disease != disease {
            self.manual_disease = disease;
            self.manual_error = None;
        }
    }

    pub(crate) fn render_manual(&mut self, ui: &mut egui::Ui) {
        Self::render_header(
            ui,
            "Manual Prediction",
            "Enter health parameters for a single patient",
        );

        if let Some(disease) = Self::disease_tabs(ui, self.manual_disease, !self.busy) {
            self.select_manual_disease(disease);
        }
        ui.add_space(theme::SPACING_LG);

        let ctx = ui.ctx().clone();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let disease = self.manual_disease;
                let enabled = !self.busy;
                theme::section_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    components::section_label(ui, &format!("{} parameters", disease.display_name()));
                    ui.add_space(theme::SPACING_SM);
                    ui.add_enabled_ui(enabled, |ui| {
                        Self::render_form_fields(ui, self.form_mut(disease));
                    });
                });

                ui.add_space(theme::SPACING_LG);
                ui.horizontal(|ui| {
                    let predict = ui.add(theme::button_accent_enabled(
                        format!("{}  Predict Risk", egui_phosphor::regular::LIGHTNING),
                        enabled,
                    ));
                    if predict.clicked() && enabled {
                        self.submit_prediction(&ctx);
                    }
                    if ui.add_enabled(enabled, theme::button("Reset")).clicked() {
                        self.form_mut(disease).reset();
                        self.manual_error = None;
                        if matches!(self.manual_result, Some((d, _)) if d == disease) {
                            self.manual_result = None;
                        }
                    }
                    if self.busy {
                        components::busy_indicator(ui, "Analyzing...");
                    }
                });

                ui.add_space(theme::SPACING_LG);
                if let Some(err) = &self.manual_error {
                    components::error_banner(ui, err);
                } else if let Some((d, result)) = &self.manual_result {
                    if *d == disease {
                        Self::render_prediction_card(ui, *d, result);
                    }
                }
            });
    }

    fn render_form_fields(ui: &mut egui::Ui, form: &mut crate::forms::DiseaseForm) {
        egui::Grid::new(("manual_form", form.disease().as_str()))
            .num_columns(4)
            .spacing(egui::vec2(theme::SPACING_XL, theme::SPACING_MD))
            .show(ui, |ui| {
                let mut column = 0;
                for (spec, value) in form.fields_mut() {
                    ui.add_sized(
                        egui::vec2(theme::FORM_LABEL_WIDTH, 20.0),
                        egui::Label::new(
                            egui::RichText::new(spec.label)
                                .size(theme::FONT_LABEL)
                                .color(theme::TEXT_SECONDARY),
                        )
                        .selectable(false),
                    );
                    match (spec.kind, value) {
                        (FieldKind::Number { .. }, FieldValue::Text(text)) => {
                            components::text_input(ui, text, theme::FORM_INPUT_WIDTH, "");
                        }
                        (FieldKind::Flag, FieldValue::Flag(on)) => {
                            if components::styled_checkbox(ui, *on, 18.0).clicked() {
                                *on = !*on;
                            }
                        }
                        (FieldKind::Sex, FieldValue::Sex(choice)) => {
                            ui.horizontal(|ui| {
                                for sex in [Sex::Male, Sex::Female] {
                                    if ui.selectable_label(*choice == Some(sex), sex.label()).clicked() {
                                        *choice = Some(sex);
                                    }
                                }
                            });
                        }
                        _ => {
                            ui.label("");
                        }
                    }
                    column += 1;
                    if column % 2 == 0 {
                        ui.end_row();
                    }
                }
            });
    }

    fn render_prediction_card(ui: &mut egui::Ui, disease: DiseaseType, result: &PredictionResponse) {
        let (_, fg) = theme::risk_colors(result.risk_level);
        theme::card_frame()
            .stroke(egui::Stroke::new(theme::STROKE_MEDIUM, fg))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(disease.icon())
                            .size(theme::FONT_DISPLAY)
                            .color(theme::disease_color(disease)),
                    );
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(format!("{} risk", result.risk_level))
                                        .size(theme::FONT_TITLE)
                                        .strong()
                                        .color(fg),
                                )
                                .selectable(false),
                            );
                            components::risk_badge(ui, result.risk_level);
                        });
                        ui.label(
                            egui::RichText::new(&result.message)
                                .size(theme::FONT_BODY)
                                .color(theme::TEXT_SECONDARY),
                        );
                    });
                });
                ui.add_space(theme::SPACING_MD);
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("Confidence")
                                .size(theme::FONT_LABEL)
                                .color(theme::TEXT_MUTED),
                        )
                        .selectable(false),
                    );
                    ui.add(
                        egui::ProgressBar::new(result.probability as f32)
                            .desired_width(240.0)
                            .fill(fg)
                            .text(format_confidence(result.probability)),
                    );
                });
            });
    }
}
