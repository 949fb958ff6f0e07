//! Sidebar navigation and pieces shared by several screens

use super::{App, Screen, ServiceStatus};
use crate::constants::*;
use crate::theme;
use crate::types::DiseaseType;
use crate::utils;
use eframe::egui;

impl App {
    pub(crate) fn render_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("nav_panel")
            .exact_width(theme::SIDEBAR_WIDTH)
            .resizable(false)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .inner_margin(egui::Margin::symmetric(12, 0)),
            )
            .show(ctx, |ui| {
                let panel_rect = ui.max_rect();
                let avail_w = ui.available_width();

                ui.add_space(21.0);
                ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                    if self.logo_texture.is_none() {
                        self.logo_texture = utils::rasterize_logo((avail_w * 0.8) as u32).map(|(pixels, w, h)| {
                            ctx.load_texture(
                                "logo",
                                egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
                                egui::TextureOptions::LINEAR,
                            )
                        });
                    }
                    if let Some(texture) = &self.logo_texture {
                        let logo_w = avail_w * 0.3;
                        ui.image(egui::load::SizedTexture::new(texture.id(), egui::vec2(logo_w, logo_w)));
                    }

                    ui.add_space(6.0);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(APP_NAME.to_uppercase())
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                });
                ui.add_space(theme::SPACING_XL);

                for screen in Screen::ALL {
                    if self.nav_item(ui, screen) {
                        self.switch_screen(screen);
                    }
                    ui.add_space(2.0);
                }

                // Footer: service status and settings, pinned to the bottom
                let footer_rect = egui::Rect::from_min_max(
                    egui::pos2(panel_rect.left(), panel_rect.bottom() - 64.0),
                    egui::pos2(panel_rect.right(), panel_rect.bottom() - 12.0),
                );
                ui.scope_builder(egui::UiBuilder::new().max_rect(footer_rect), |ui| {
                    self.render_service_status(ui);
                    ui.add_space(4.0);
                    ui.horizontal(|ui| {
                        if ui
                            .add(theme::button(format!("{}  Settings", egui_phosphor::regular::GEAR)))
                            .clicked()
                        {
                            self.api_url_input = self.api_base_url.clone();
                            self.show_settings = true;
                        }
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(format!("v{}", APP_VERSION))
                                    .size(theme::FONT_SMALL)
                                    .color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                    });
                });
            });
    }

    /// Full-width sidebar entry. Returns true when clicked.
    fn nav_item(&self, ui: &mut egui::Ui, screen: Screen) -> bool {
        let selected = self.screen == screen;
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), theme::NAV_ITEM_HEIGHT),
            egui::Sense::click(),
        );
        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let base = if selected { theme::BG_HOVER } else { theme::BG_ELEVATED };
        let (fill, draw_rect) = theme::button_visual(&response, base, rect);
        let painter = ui.painter();
        painter.rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);
        if selected {
            let bar = egui::Rect::from_min_size(draw_rect.min, egui::vec2(3.0, draw_rect.height()));
            painter.rect_filled(bar, 1.5, theme::ACCENT);
        }

        let color = if selected { theme::TEXT_PRIMARY } else { theme::TEXT_MUTED };
        painter.text(
            egui::pos2(draw_rect.left() + 14.0, draw_rect.center().y),
            egui::Align2::LEFT_CENTER,
            screen.icon(),
            egui::FontId::proportional(theme::FONT_HEADING),
            if selected { theme::ACCENT } else { color },
        );
        painter.text(
            egui::pos2(draw_rect.left() + 40.0, draw_rect.center().y),
            egui::Align2::LEFT_CENTER,
            screen.title(),
            egui::FontId::proportional(theme::FONT_BODY),
            color,
        );

        response.clicked()
    }

    fn render_service_status(&mut self, ui: &mut egui::Ui) {
        let (color, text) = match &self.service {
            ServiceStatus::Unknown => (theme::TEXT_DIM, "Service not checked".to_string()),
            ServiceStatus::Checking => (theme::STATUS_WARNING, "Checking service...".to_string()),
            ServiceStatus::Online(status) => (theme::STATUS_SUCCESS, format!("Service {}", status.status)),
            ServiceStatus::Offline(_) => (theme::STATUS_ERROR, "Service unreachable".to_string()),
        };

        let response = ui
            .horizontal(|ui| {
                let (dot, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                ui.painter().circle_filled(dot.center(), 4.0, color);
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(text)
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_MUTED),
                    )
                    .selectable(false)
                    .sense(egui::Sense::click()),
                )
            })
            .inner;

        let tooltip = match &self.service {
            ServiceStatus::Online(status) if !status.message.is_empty() => status.message.clone(),
            ServiceStatus::Offline(msg) => msg.clone(),
            _ => self.client.base_url().to_string(),
        };
        if response.on_hover_text(format!("{}\nClick to re-check", tooltip)).clicked() {
            let ctx = ui.ctx().clone();
            self.check_health(&ctx);
        }
    }

    /// Screen heading with a muted subtitle
    pub(crate) fn render_header(ui: &mut egui::Ui, title: &str, subtitle: &str) {
        ui.add(
            egui::Label::new(
                egui::RichText::new(title)
                    .size(theme::FONT_TITLE)
                    .strong()
                    .color(theme::TEXT_PRIMARY),
            )
            .selectable(false),
        );
        ui.add(
            egui::Label::new(
                egui::RichText::new(subtitle)
                    .size(theme::FONT_LABEL)
                    .color(theme::TEXT_MUTED),
            )
            .selectable(false),
        );
        ui.add_space(theme::SPACING_LG);
    }

    /// Row of disease tabs. Returns the newly clicked disease, if any.
    pub(crate) fn disease_tabs(ui: &mut egui::Ui, selected: DiseaseType, enabled: bool) -> Option<DiseaseType> {
        let mut clicked = None;
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = theme::SPACING_SM;
            for disease in DiseaseType::ALL {
                let is_selected = disease == selected;
                let text = format!("{}  {}", disease.icon(), disease.display_name());
                let button = if is_selected {
                    egui::Button::new(egui::RichText::new(text).color(theme::TEXT_PRIMARY))
                        .fill(theme::BG_HOVER)
                        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::disease_color(disease)))
                        .corner_radius(theme::RADIUS_DEFAULT)
                } else {
                    egui::Button::new(egui::RichText::new(text).color(theme::TEXT_MUTED))
                        .fill(theme::BG_ELEVATED)
                        .corner_radius(theme::RADIUS_DEFAULT)
                };
                if ui.add_enabled(enabled, button).clicked() && !is_selected {
                    clicked = Some(disease);
                }
            }
        });
        clicked
    }
}
