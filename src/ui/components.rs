//! Shared UI components.

use eframe::egui::{self, Color32, Response, RichText, Sense, StrokeKind, Ui};

use crate::stats::SortDirection;

/// Render a clickable dashboard card with dynamic size.
///
/// Returns the response which can be checked for `.clicked()`.
pub fn dashboard_card(ui: &mut Ui, title: &str, description: &str, icon: &str, size: egui::Vec2) -> Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let visuals = ui.style().interact(&response);

        // Scale factor based on width (200 is the reference size)
        let scale = size.x / 200.0;

        // Card background
        ui.painter().rect_filled(rect, 8.0, visuals.bg_fill);
        ui.painter()
            .rect_stroke(rect, 8.0, visuals.bg_stroke, StrokeKind::Outside);

        // Icon (top area)
        let icon_pos = egui::pos2(rect.center().x, rect.top() + size.y * 0.23);
        ui.painter().text(
            icon_pos,
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(36.0 * scale),
            visuals.text_color(),
        );

        // Title (middle)
        let title_pos = egui::pos2(rect.center().x, rect.center().y + size.y * 0.07);
        ui.painter().text(
            title_pos,
            egui::Align2::CENTER_CENTER,
            title,
            egui::FontId::proportional(18.0 * scale),
            visuals.text_color(),
        );

        // Description (bottom)
        let desc_pos = egui::pos2(rect.center().x, rect.bottom() - size.y * 0.17);
        ui.painter().text(
            desc_pos,
            egui::Align2::CENTER_CENTER,
            description,
            egui::FontId::proportional(12.0 * scale),
            ui.visuals().weak_text_color(),
        );
    }

    response
}

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const ACCENT: Color32 = Color32::from_rgb(70, 120, 200);
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui) -> bool {
    ui.button(RichText::new("< Back to Dashboard").size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

/// Plain secondary button.
pub fn styled_button(ui: &mut Ui, label: &str) -> Response {
    ui.button(label)
}

/// Secondary button with a phosphor icon.
pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, label: &str) -> Response {
    ui.button(format!("{icon} {label}"))
}

/// Accent-filled primary button with a phosphor icon.
pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, label: &str) -> Response {
    let text = if icon.is_empty() {
        label.to_string()
    } else {
        format!("{icon} {label}")
    };
    ui.add(egui::Button::new(RichText::new(text).color(Color32::WHITE)).fill(colors::ACCENT))
}

/// Small per-row action button (edit etc.).
pub fn action_button(ui: &mut Ui, icon: &str, hover: &str) -> Response {
    ui.button(icon).on_hover_text(hover.to_string())
}

/// Small per-row destructive action button.
pub fn danger_action_button(ui: &mut Ui, icon: &str, hover: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).color(colors::ERROR)))
        .on_hover_text(hover.to_string())
}

/// Clickable sortable column header showing the current direction.
///
/// Returns true when clicked.
pub fn sort_header(ui: &mut Ui, label: &str, direction: Option<SortDirection>) -> bool {
    let arrow = match direction {
        None => "\u{2195}",
        Some(SortDirection::Ascending) => "\u{2191}",
        Some(SortDirection::Descending) => "\u{2193}",
    };
    ui.add(egui::Button::new(RichText::new(format!("{label} {arrow}")).strong()).frame(false))
        .clicked()
}
