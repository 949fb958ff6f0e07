//! Reusable UI components
//!
//! Small painted widgets shared by the screens: checkboxes, badges, stat
//! cards and the high/low ratio bar.

use crate::theme;
use crate::types::RiskLevel;
use eframe::egui;

/// Custom checkbox widget with consistent styling
pub fn styled_checkbox(ui: &mut egui::Ui, selected: bool, size: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::click());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let rounding = 3.0;

        if selected {
            painter.rect_filled(rect, rounding, theme::ACCENT);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::regular::CHECK,
                egui::FontId::proportional(size * 0.7),
                theme::ACCENT_DARK,
            );
        } else {
            let stroke_color = if response.hovered() {
                theme::ACCENT
            } else {
                theme::BORDER_DEFAULT
            };
            painter.rect_stroke(
                rect,
                rounding,
                egui::Stroke::new(theme::STROKE_MEDIUM, stroke_color),
                egui::StrokeKind::Inside,
            );
        }
    }

    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response
}

/// Small uppercase section header in accent color
pub fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.add(
        egui::Label::new(
            egui::RichText::new(text)
                .size(theme::FONT_LABEL)
                .color(theme::ACCENT),
        )
        .selectable(false),
    );
}

/// Single-line text input styled like the rest of the app
pub fn text_input(ui: &mut egui::Ui, value: &mut String, width: f32, hint: &str) -> egui::Response {
    egui::Frame::new()
        .fill(theme::BG_INPUT)
        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::symmetric(6, 4))
        .show(ui, |ui| {
            ui.add(
                egui::TextEdit::singleline(value)
                    .frame(false)
                    .hint_text(hint)
                    .desired_width(width)
                    .font(egui::FontId::proportional(theme::FONT_LABEL)),
            )
        })
        .inner
}

/// Colored pill showing "High" or "Low"
pub fn risk_badge(ui: &mut egui::Ui, level: RiskLevel) -> egui::Response {
    let (bg, fg) = theme::risk_colors(level);
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(theme::BADGE_WIDTH, theme::BADGE_HEIGHT),
        egui::Sense::hover(),
    );
    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        painter.rect_filled(rect, theme::BADGE_HEIGHT / 2.0, bg);
        painter.rect_stroke(
            rect,
            theme::BADGE_HEIGHT / 2.0,
            egui::Stroke::new(theme::STROKE_DEFAULT, fg.gamma_multiply(0.5)),
            egui::StrokeKind::Inside,
        );
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            level.as_str(),
            egui::FontId::proportional(theme::FONT_SMALL),
            fg,
        );
    }
    response
}

/// Card with a big number and a caption underneath
pub fn stat_card(ui: &mut egui::Ui, width: f32, caption: &str, value: &str, color: egui::Color32) {
    theme::card_frame().show(ui, |ui| {
        ui.set_width(width);
        ui.vertical(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(caption)
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
            ui.add_space(2.0);
            ui.add(
                egui::Label::new(
                    egui::RichText::new(value)
                        .size(theme::FONT_DISPLAY)
                        .strong()
                        .color(color),
                )
                .selectable(false),
            );
        });
    });
}

/// Horizontal bar split into high (left) and low (right) shares
pub fn ratio_bar(ui: &mut egui::Ui, high_ratio: f32, height: f32) {
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
    if !ui.is_rect_visible(rect) {
        return;
    }

    let painter = ui.painter();
    let radius = height / 2.0;
    painter.rect_filled(rect, radius, theme::BG_SURFACE);

    let (_, high_color) = theme::risk_colors(RiskLevel::High);
    let (_, low_color) = theme::risk_colors(RiskLevel::Low);
    let split = rect.left() + rect.width() * high_ratio.clamp(0.0, 1.0);

    if split > rect.left() {
        let high_rect = egui::Rect::from_min_max(rect.min, egui::pos2(split, rect.bottom()));
        painter.rect_filled(high_rect, radius, high_color);
    }
    if split < rect.right() {
        let low_rect = egui::Rect::from_min_max(egui::pos2(split, rect.top()), rect.max);
        painter.rect_filled(low_rect, radius, low_color);
    }
}

/// Inline error message with a warning icon
pub fn error_banner(ui: &mut egui::Ui, message: &str) {
    theme::error_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(egui_phosphor::regular::WARNING_CIRCLE)
                    .size(theme::FONT_HEADING)
                    .color(theme::STATUS_ERROR),
            );
            ui.add(
                egui::Label::new(
                    egui::RichText::new(message)
                        .size(theme::FONT_BODY)
                        .color(theme::TEXT_PRIMARY),
                )
                .wrap(),
            );
        });
    });
}

/// Spinner with a caption, shown while a request is in flight
pub fn busy_indicator(ui: &mut egui::Ui, caption: &str) {
    ui.horizontal(|ui| {
        ui.add(egui::Spinner::new().size(16.0).color(theme::ACCENT));
        ui.label(
            egui::RichText::new(caption)
                .size(theme::FONT_LABEL)
                .color(theme::TEXT_MUTED),
        );
    });
}
