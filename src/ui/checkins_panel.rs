//! Attendance record management panel with server-side filters.

use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use crate::models::checkin::{CreateCheckinRequest, UpdateCheckinRequest};

use super::app::{App, CheckinForm, DeleteTarget};
use super::components::{
    action_button, back_button, colors, danger_action_button, panel_header,
    primary_button_with_icon, styled_button, styled_button_with_icon,
};

/// Parse a local "YYYY-MM-DD HH:MM:SS" timestamp into UTC.
fn parse_local_timestamp(input: &str) -> Option<chrono::DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%d %H:%M:%S").ok()?;
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Show the attendance records panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Attendance Records");

    // Toolbar row 1: actions
    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Record").clicked() {
            app.checkin_form = CheckinForm {
                action: "checkin".to_string(),
                timestamp_input: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                is_open: true,
                ..Default::default()
            };
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_checkins();
        }
    });

    ui.add_space(10.0);

    // Toolbar row 2: server-side filters
    ui.horizontal(|ui| {
        ui.label("User Id:");
        ui.add(
            egui::TextEdit::singleline(&mut app.checkin_filter_input.user_id)
                .desired_width(120.0)
                .hint_text("Any"),
        );

        ui.add_space(20.0);

        ui.label("Action:");
        egui::ComboBox::from_id_salt("checkin_action_filter")
            .width(110.0)
            .selected_text(if app.checkin_filter_input.action.is_empty() {
                "All"
            } else {
                app.checkin_filter_input.action.as_str()
            })
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(app.checkin_filter_input.action.is_empty(), "All")
                    .clicked()
                {
                    app.checkin_filter_input.action.clear();
                }
                for action in ["checkin", "checkout"] {
                    if ui
                        .selectable_label(app.checkin_filter_input.action == action, action)
                        .clicked()
                    {
                        app.checkin_filter_input.action = action.to_string();
                    }
                }
            });

        ui.add_space(20.0);

        ui.label("Limit:");
        ui.add(
            egui::TextEdit::singleline(&mut app.checkin_filter_input.limit)
                .desired_width(60.0)
                .hint_text(app.config.ui.checkin_limit.to_string()),
        );

        ui.add_space(10.0);

        if styled_button(ui, "Apply").clicked() {
            app.load_checkins();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.checkin_form.is_open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let checkins = app.checkins.clone();

    ui.label(format!("{} records", checkins.len()));
    ui.add_space(10.0);

    let mut edit_form = None;
    let mut delete_target = None;

    ScrollArea::vertical().id_salt("checkins_scroll").show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("checkins_grid")
            .num_columns(6)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("User Id");
                ui.strong("Action");
                ui.strong("Time");
                ui.strong("Location");
                ui.strong("Synced");
                ui.strong("Actions");
                ui.end_row();

                for checkin in &checkins {
                    ui.label(&checkin.user_id);

                    let color = if checkin.action == "checkin" {
                        colors::SUCCESS
                    } else {
                        colors::WARNING
                    };
                    ui.colored_label(color, &checkin.action);

                    ui.label(
                        checkin
                            .created_at
                            .with_timezone(&Local)
                            .format("%Y-%m-%d %H:%M:%S")
                            .to_string(),
                    );

                    let location = match (checkin.latitude, checkin.longitude) {
                        (Some(lat), Some(lon)) => format!("{lat:.5}, {lon:.5}"),
                        _ => "-".to_string(),
                    };
                    ui.label(location);

                    ui.label(if checkin.is_synced != 0 { "Yes" } else { "No" });

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            edit_form = Some(CheckinForm::edit(checkin));
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            delete_target = Some(DeleteTarget::Checkin(
                                checkin.id,
                                format!("for '{}'", checkin.user_id),
                            ));
                        }
                    });

                    ui.end_row();
                }
            });
    });

    if let Some(form) = edit_form {
        app.checkin_form = form;
    }
    if let Some(target) = delete_target {
        app.request_delete(target);
    }
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.checkin_form.is_editing { "Edit Record" } else { "Add Record" };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("checkin_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("User Id:");
                    ui.add(egui::TextEdit::singleline(&mut app.checkin_form.user_id).desired_width(150.0));
                    ui.end_row();

                    ui.label("Action:");
                    egui::ComboBox::from_id_salt("checkin_form_action")
                        .width(120.0)
                        .selected_text(app.checkin_form.action.as_str())
                        .show_ui(ui, |ui| {
                            for action in ["checkin", "checkout"] {
                                if ui
                                    .selectable_label(app.checkin_form.action == action, action)
                                    .clicked()
                                {
                                    app.checkin_form.action = action.to_string();
                                }
                            }
                        });
                    ui.end_row();

                    ui.label("Time:");
                    ui.vertical(|ui| {
                        let is_valid = parse_local_timestamp(&app.checkin_form.timestamp_input).is_some();
                        let text_color = if is_valid {
                            ui.visuals().text_color()
                        } else {
                            colors::ERROR
                        };

                        ui.add(
                            egui::TextEdit::singleline(&mut app.checkin_form.timestamp_input)
                                .desired_width(180.0)
                                .hint_text("YYYY-MM-DD HH:MM:SS")
                                .text_color(text_color),
                        );
                        if !is_valid {
                            ui.colored_label(colors::ERROR, "Invalid timestamp");
                        } else {
                            ui.weak("Local time");
                        }
                    });
                    ui.end_row();

                    ui.label("Latitude:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.checkin_form.latitude)
                            .desired_width(150.0)
                            .hint_text("Optional"),
                    );
                    ui.end_row();

                    ui.label("Longitude:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.checkin_form.longitude)
                            .desired_width(150.0)
                            .hint_text("Optional"),
                    );
                    ui.end_row();

                    ui.label("Synced:");
                    ui.checkbox(&mut app.checkin_form.is_synced, "");
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.checkin_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Save").clicked() {
                        save_checkin(app);
                    }
                });
            });
        });
}

fn save_checkin(app: &mut App) {
    let form = &app.checkin_form;

    if form.user_id.trim().is_empty() {
        app.error_message = Some("User id is required".to_string());
        return;
    }
    let Some(created_at) = parse_local_timestamp(&form.timestamp_input) else {
        app.error_message = Some("Invalid timestamp (expected YYYY-MM-DD HH:MM:SS)".to_string());
        return;
    };

    let latitude = if form.latitude.trim().is_empty() {
        None
    } else {
        match form.latitude.trim().parse() {
            Ok(v) => Some(v),
            Err(_) => {
                app.error_message = Some("Invalid latitude".to_string());
                return;
            }
        }
    };
    let longitude = if form.longitude.trim().is_empty() {
        None
    } else {
        match form.longitude.trim().parse() {
            Ok(v) => Some(v),
            Err(_) => {
                app.error_message = Some("Invalid longitude".to_string());
                return;
            }
        }
    };

    let is_synced = if form.is_synced { 1 } else { 0 };

    if form.is_editing {
        let id = form.id.unwrap();
        let data = UpdateCheckinRequest {
            user_id: form.user_id.trim().to_string(),
            action: form.action.clone(),
            created_at,
            latitude,
            longitude,
            is_synced,
        };
        app.update_checkin(id, data);
    } else {
        let data = CreateCheckinRequest {
            user_id: form.user_id.trim().to_string(),
            action: form.action.clone(),
            created_at,
            latitude,
            longitude,
            is_synced,
        };
        app.create_checkin(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_timestamp() {
        assert!(parse_local_timestamp("2024-06-03 08:55:00").is_some());
        assert!(parse_local_timestamp("  2024-06-03 08:55:00  ").is_some());
        assert!(parse_local_timestamp("2024-06-03").is_none());
        assert!(parse_local_timestamp("not a time").is_none());
    }
}
