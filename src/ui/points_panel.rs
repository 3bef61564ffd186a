//! Geofence point management panel, shared by the checkin and checkout kinds.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use crate::models::point::{CreatePointRequest, PointKind, UpdatePointRequest};

use super::app::{App, DeleteTarget, PointForm};
use super::components::{
    action_button, back_button, danger_action_button, panel_header, primary_button_with_icon,
    styled_button, styled_button_with_icon,
};

/// Show the geofence points panel for one kind.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui, kind: PointKind) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, kind.name());

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Point").clicked() {
            app.point_form = PointForm {
                radius: "50".to_string(),
                is_open: true,
                ..Default::default()
            };
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_points(kind);
        }
    });

    ui.add_space(15.0);

    show_table(app, ui, kind);

    if app.point_form.is_open {
        show_form_dialog(app, ui.ctx(), kind);
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui, kind: PointKind) {
    let points = app.points(kind).to_vec();

    ui.label(format!("{} points configured", points.len()));
    ui.add_space(10.0);

    let mut edit_form = None;
    let mut delete_target = None;

    ScrollArea::vertical().id_salt("points_scroll").show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("points_grid")
            .num_columns(6)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Location");
                ui.strong("Latitude");
                ui.strong("Longitude");
                ui.strong("Radius (m)");
                ui.strong("Departments");
                ui.strong("Actions");
                ui.end_row();

                for point in &points {
                    ui.label(&point.location_name);
                    ui.label(format!("{:.6}", point.latitude));
                    ui.label(format!("{:.6}", point.longitude));
                    ui.label(format!("{:.0}", point.radius));

                    let departments = if point.allowed_department.is_empty() {
                        "All".to_string()
                    } else {
                        point
                            .allowed_department
                            .iter()
                            .map(|d| d.to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                    };
                    ui.label(departments);

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            edit_form = Some(PointForm::edit(point));
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            delete_target =
                                Some(DeleteTarget::Point(kind, point.id, point.location_name.clone()));
                        }
                    });

                    ui.end_row();
                }
            });
    });

    if let Some(form) = edit_form {
        app.point_form = form;
    }
    if let Some(target) = delete_target {
        app.request_delete(target);
    }
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context, kind: PointKind) {
    let title = if app.point_form.is_editing { "Edit Point" } else { "Add Point" };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("point_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Location Name:");
                    ui.add(egui::TextEdit::singleline(&mut app.point_form.location_name).desired_width(250.0));
                    ui.end_row();

                    ui.label("Latitude:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.point_form.latitude)
                            .desired_width(150.0)
                            .hint_text("e.g. 10.776530"),
                    );
                    ui.end_row();

                    ui.label("Longitude:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.point_form.longitude)
                            .desired_width(150.0)
                            .hint_text("e.g. 106.700981"),
                    );
                    ui.end_row();

                    ui.label("Radius (m):");
                    ui.add(egui::TextEdit::singleline(&mut app.point_form.radius).desired_width(100.0));
                    ui.end_row();

                    ui.label("Departments:");
                    ui.vertical(|ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut app.point_form.allowed_departments)
                                .desired_width(250.0)
                                .hint_text("e.g. 1, 2, 5"),
                        );
                        ui.weak("Comma-separated codes; empty allows all");
                    });
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.point_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Save").clicked() {
                        save_point(app, kind);
                    }
                });
            });
        });
}

fn save_point(app: &mut App, kind: PointKind) {
    let form = &app.point_form;

    if form.location_name.trim().is_empty() {
        app.error_message = Some("Location name is required".to_string());
        return;
    }
    let latitude: f64 = match form.latitude.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            app.error_message = Some("Invalid latitude".to_string());
            return;
        }
    };
    let longitude: f64 = match form.longitude.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            app.error_message = Some("Invalid longitude".to_string());
            return;
        }
    };
    let radius: f64 = match form.radius.trim().parse() {
        Ok(v) if v > 0.0 => v,
        _ => {
            app.error_message = Some("Radius must be a positive number".to_string());
            return;
        }
    };

    let mut allowed_department = Vec::new();
    for part in form.allowed_departments.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.parse() {
            Ok(code) => allowed_department.push(code),
            Err(_) => {
                app.error_message = Some(format!("Invalid department code '{part}'"));
                return;
            }
        }
    }

    if form.is_editing {
        let id = form.id.unwrap();
        let data = UpdatePointRequest {
            latitude,
            longitude,
            radius,
            location_name: form.location_name.trim().to_string(),
            allowed_department,
        };
        app.update_point(kind, id, data);
    } else {
        let data = CreatePointRequest {
            latitude,
            longitude,
            radius,
            location_name: form.location_name.trim().to_string(),
            allowed_department,
        };
        app.create_point(kind, data);
    }
}
