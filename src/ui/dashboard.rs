//! Dashboard panel with navigation cards and the activity log.

use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{
    CHART_BAR, LIST_CHECKS, MAP_PIN, SHIELD_STAR, SIGN_OUT, USERS,
};

use crate::config::AdminRole;

use super::app::{App, LogLevel, Panel};
use super::components::dashboard_card;

/// Show the dashboard panel.
///
/// Returns `Some(panel)` if navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Panel> {
    let mut next_panel = None;

    ui.vertical_centered(|ui| {
        ui.add_space(30.0);

        // Header
        ui.label(RichText::new("KBK Attendance Admin").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Attendance Administration Dashboard").size(14.0).weak());

        ui.add_space(30.0);

        // Stat cards row
        ui.horizontal(|ui| {
            let available = ui.available_width();
            let start_offset = ((available - 510.0) / 2.0).max(0.0);
            ui.add_space(start_offset);

            stat_card(
                ui,
                "Tracked Users",
                &app.users.len().to_string(),
                "Registered for attendance",
            );
            stat_card(
                ui,
                "Geofence Points",
                &(app.checkin_points.len() + app.checkout_points.len()).to_string(),
                "Checkin and checkout",
            );
            stat_card(
                ui,
                "Loaded Records",
                &app.checkins.len().to_string(),
                "Most recent fetch",
            );
        });

        ui.add_space(30.0);

        // Navigation cards
        let is_admin = app.role() == AdminRole::Admin;
        let mut cards: Vec<(&str, &str, &str, Panel)> = vec![
            ("Manage Users", "Tracked user records", USERS, Panel::Users),
            ("Statistics", "Department attendance stats", CHART_BAR, Panel::Statistics),
            ("Attendance Records", "Raw checkin events", LIST_CHECKS, Panel::Checkins),
            ("Checkin Points", "Checkin geofences", MAP_PIN, Panel::CheckinPoints),
            ("Checkout Points", "Checkout geofences", SIGN_OUT, Panel::CheckoutPoints),
        ];
        if is_admin {
            cards.push(("Admin Accounts", "Dashboard access", SHIELD_STAR, Panel::AdminUsers));
        }

        let available = ui.available_width();
        let per_row = 3usize;
        let spacing = 30.0;
        let total_spacing = spacing * (per_row as f32 - 1.0);
        let card_width = ((available - total_spacing) / per_row as f32).clamp(150.0, 250.0);
        let card_size = egui::vec2(card_width, card_width * 0.75);
        let total_width = card_width * per_row as f32 + total_spacing;
        let start_offset = ((available - total_width) / 2.0).max(0.0);

        for row in cards.chunks(per_row) {
            ui.horizontal(|ui| {
                ui.add_space(start_offset);
                for (i, (title, description, icon, panel)) in row.iter().enumerate() {
                    if i > 0 {
                        ui.add_space(spacing);
                    }
                    if dashboard_card(ui, title, description, icon, card_size).clicked() {
                        next_panel = Some(*panel);
                    }
                }
            });
            ui.add_space(spacing);
        }
    });

    // Recent Activity
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::symmetric(10, 0))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.label(RichText::new("Recent Activity").strong());
            ui.add_space(10.0);

            ScrollArea::vertical().max_height(150.0).show(ui, |ui| {
                if app.log_messages.is_empty() {
                    ui.label(RichText::new("No recent activity").weak());
                } else {
                    for entry in app.log_messages.iter().rev().take(10) {
                        let color = match entry.level {
                            LogLevel::Info => Color32::GRAY,
                            LogLevel::Success => Color32::from_rgb(100, 200, 100),
                            LogLevel::Error => Color32::from_rgb(230, 100, 100),
                        };

                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                    .small()
                                    .color(Color32::DARK_GRAY),
                            );
                            ui.label(RichText::new(&entry.message).color(color));
                        });
                    }
                }
            });
        });

    next_panel
}

/// Render a stat card with title, value, and subtitle.
fn stat_card(ui: &mut Ui, title: &str, value: &str, subtitle: &str) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::same(5))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_min_width(150.0);

            ui.vertical(|ui| {
                ui.label(RichText::new(title).small());
                ui.label(RichText::new(value).heading().strong());
                ui.label(RichText::new(subtitle).small().weak());
            });
        });
}
