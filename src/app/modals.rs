//! Modal dialogs and the toast overlay

use super::App;
use crate::constants::API_URL_ENV;
use crate::theme;
use crate::ui::components;
use eframe::egui;
use tracing::warn;

impl App {
    pub(crate) fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let modal_response = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(360.0);

                ui.horizontal(|ui| {
                    ui.add(egui::Label::new(egui::RichText::new("Settings").size(theme::FONT_HEADING).strong()).selectable(false));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let close_size = 24.0;
                        let (rect, response) =
                            ui.allocate_exact_size(egui::vec2(close_size, close_size), egui::Sense::click());
                        let close_color = if response.hovered() {
                            ui.painter().rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_SURFACE);
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            theme::STATUS_ERROR
                        } else {
                            theme::TEXT_DIM
                        };
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            egui_phosphor::regular::X,
                            egui::FontId::proportional(theme::FONT_HEADING),
                            close_color,
                        );
                        if response.clicked() {
                            self.show_settings = false;
                        }
                    });
                });
                ui.add_space(4.0);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // Prediction service
                components::section_label(ui, "Prediction Service URL");
                ui.add_space(2.0);
                let submitted = ui
                    .horizontal(|ui| {
                        let te = components::text_input(ui, &mut self.api_url_input, 250.0, "http://localhost:5000");
                        let save = ui.add(theme::button_accent("Save")).clicked();
                        save || (te.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)))
                    })
                    .inner;
                if submitted {
                    self.apply_api_url(ctx);
                }
                if std::env::var(API_URL_ENV).is_ok_and(|v| !v.trim().is_empty()) {
                    ui.label(
                        egui::RichText::new(format!("{} is set and overrides this value", API_URL_ENV))
                            .size(theme::FONT_SMALL)
                            .color(theme::STATUS_WARNING),
                    );
                }
                ui.label(
                    egui::RichText::new(format!("Currently using {}", self.client.base_url()))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                );

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // Results
                components::section_label(ui, "Results");
                ui.add_space(2.0);
                let mut limit = self.history_limit;
                let slider = ui.add(
                    egui::Slider::new(&mut limit, 10..=1000)
                        .text("entries shown")
                        .logarithmic(true),
                );
                if limit != self.history_limit {
                    self.history_limit = limit;
                    self.history_dirty = true;
                }
                if slider.drag_stopped() || slider.lost_focus() {
                    self.save_settings();
                }

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // Data folder
                components::section_label(ui, "Data");
                ui.add_space(2.0);
                ui.label(
                    egui::RichText::new(self.data_dir.to_string_lossy())
                        .size(theme::FONT_SMALL)
                        .monospace()
                        .color(theme::TEXT_MUTED),
                );
                ui.add_space(4.0);
                let base = theme::BTN_DEFAULT;
                let (rect, response) = ui.allocate_exact_size(egui::vec2(140.0, 26.0), egui::Sense::click());
                if response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                let (fill, draw_rect) = theme::button_visual(&response, base, rect);
                ui.painter().rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);
                ui.painter().text(
                    draw_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("{}  Open Data Folder", egui_phosphor::regular::FOLDER_OPEN),
                    egui::FontId::proportional(12.0),
                    theme::TEXT_PRIMARY,
                );
                if response.clicked() {
                    if let Err(e) = open::that(&self.data_dir) {
                        warn!(error = %e, "Failed to open data folder");
                    }
                }
            });

        if modal_response.should_close() {
            self.show_settings = false;
        }
    }

    pub(crate) fn render_clear_confirm(&mut self, ctx: &egui::Context) {
        if !self.show_clear_confirm {
            return;
        }

        let disease = self.results_disease;
        let mut confirmed = false;
        let mut cancelled = false;
        let modal_response = egui::Modal::new(egui::Id::new("clear_history_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(320.0);
                ui.add(
                    egui::Label::new(egui::RichText::new("Clear History").size(theme::FONT_HEADING).strong())
                        .selectable(false),
                );
                ui.add_space(theme::SPACING_SM);
                ui.label(
                    egui::RichText::new(format!(
                        "Delete all {} stored {} predictions? This cannot be undone.",
                        self.history_summary.total,
                        disease.display_name()
                    ))
                    .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(theme::SPACING_LG);
                ui.horizontal(|ui| {
                    if ui.add(theme::button_danger("Delete")).clicked() {
                        confirmed = true;
                    }
                    if ui.add(theme::button("Cancel")).clicked() {
                        cancelled = true;
                    }
                });
            });

        if confirmed {
            self.clear_history();
        }
        if confirmed || cancelled || modal_response.should_close() {
            self.show_clear_confirm = false;
        }
    }

    /// Bottom-right toast: 3s visible then fade, paused while hovered
    pub(crate) fn render_toast(&mut self, ctx: &egui::Context) {
        let (Some(msg), Some(panel_rect)) = (self.toast_message.clone(), self.central_panel_rect) else {
            return;
        };

        let visible_duration = 3.0;
        let fade_duration = 0.5;
        let total_duration = visible_duration + fade_duration;
        let margin = 12.0;
        let toast_pos = egui::pos2(panel_rect.right() - margin, panel_rect.bottom() - margin);

        let response = egui::Area::new(egui::Id::new("toast"))
            .fixed_pos(toast_pos)
            .pivot(egui::Align2::RIGHT_BOTTOM)
            .show(ctx, |ui| {
                let elapsed = self.toast_start.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
                let alpha = if elapsed > visible_duration {
                    ((total_duration - elapsed) / fade_duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };

                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(0x1a, 0x1a, 0x1e, (230.0 * alpha) as u8))
                    .stroke(egui::Stroke::new(
                        theme::STROKE_DEFAULT,
                        egui::Color32::from_rgba_unmultiplied(
                            theme::ACCENT.r(),
                            theme::ACCENT.g(),
                            theme::ACCENT.b(),
                            (100.0 * alpha) as u8,
                        ),
                    ))
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(16, 10))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(&msg)
                                .color(egui::Color32::from_rgba_unmultiplied(255, 255, 255, (255.0 * alpha) as u8)),
                        );
                    });
            });

        if response.response.hovered() {
            self.toast_start = Some(std::time::Instant::now());
        }

        let elapsed = self.toast_start.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
        if elapsed >= total_duration {
            self.toast_message = None;
            self.toast_start = None;
        } else {
            ctx.request_repaint();
        }
    }
}
