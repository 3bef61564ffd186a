//! Tracked user management panel with full CRUD and search.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use crate::models::user::{CreateUserRequest, UpdateUserRequest};

use super::app::{App, DeleteTarget, UserForm};
use super::components::{
    action_button, back_button, danger_action_button, panel_header, primary_button_with_icon,
    styled_button, styled_button_with_icon,
};

/// Show the users panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Manage Users");

    // Toolbar
    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add User").clicked() {
            app.user_form = UserForm {
                is_open: true,
                ..Default::default()
            };
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_users();
        }

        ui.add_space(20.0);

        ui.label("Search:");
        ui.add(
            egui::TextEdit::singleline(&mut app.user_search)
                .desired_width(200.0)
                .hint_text("Id or name..."),
        );

        if !app.user_search.is_empty() {
            ui.add_space(10.0);
            if styled_button(ui, "Clear").clicked() {
                app.user_search.clear();
            }
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.user_form.is_open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let search = app.user_search.to_lowercase();
    let filtered: Vec<_> = app
        .users
        .iter()
        .filter(|u| {
            search.is_empty()
                || u.user_id.to_lowercase().contains(&search)
                || u.display_name().to_lowercase().contains(&search)
        })
        .cloned()
        .collect();

    ui.label(format!("Showing {} of {} users", filtered.len(), app.users.len()));
    ui.add_space(10.0);

    let mut edit_form = None;
    let mut delete_target = None;

    ScrollArea::vertical().id_salt("users_scroll").show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("users_grid")
            .num_columns(6)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("User Id");
                ui.strong("Name");
                ui.strong("Department");
                ui.strong("Department Name");
                ui.strong("Passkey");
                ui.strong("Actions");
                ui.end_row();

                for user in &filtered {
                    ui.label(&user.user_id);
                    ui.label(user.user_name.as_deref().unwrap_or("-"));
                    ui.label(user.department.to_string());
                    ui.label(user.department_name.as_deref().unwrap_or("-"));
                    ui.label(&user.passkey);

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            edit_form = Some(UserForm::edit(user));
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            delete_target =
                                Some(DeleteTarget::User(user.id, user.display_name().to_string()));
                        }
                    });

                    ui.end_row();
                }
            });
    });

    if let Some(form) = edit_form {
        app.user_form = form;
    }
    if let Some(target) = delete_target {
        app.request_delete(target);
    }
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.user_form.is_editing { "Edit User" } else { "Add User" };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("user_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("User Id:");
                    ui.add(egui::TextEdit::singleline(&mut app.user_form.user_id).desired_width(200.0));
                    ui.end_row();

                    ui.label("Name:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.user_form.user_name)
                            .desired_width(250.0)
                            .hint_text("Optional"),
                    );
                    ui.end_row();

                    ui.label("Department:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.user_form.department)
                            .desired_width(100.0)
                            .hint_text("Numeric code"),
                    );
                    ui.end_row();

                    ui.label("Department Name:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.user_form.department_name)
                            .desired_width(250.0)
                            .hint_text("Optional"),
                    );
                    ui.end_row();

                    ui.label("Passkey:");
                    ui.add(egui::TextEdit::singleline(&mut app.user_form.passkey).desired_width(200.0));
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.user_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Save").clicked() {
                        save_user(app);
                    }
                });
            });
        });
}

fn save_user(app: &mut App) {
    let form = &app.user_form;

    if form.user_id.trim().is_empty() {
        app.error_message = Some("User id is required".to_string());
        return;
    }
    let department: i32 = match form.department.trim().parse() {
        Ok(code) => code,
        Err(_) => {
            app.error_message = Some("Department must be a numeric code".to_string());
            return;
        }
    };
    if form.passkey.trim().is_empty() {
        app.error_message = Some("Passkey is required".to_string());
        return;
    }

    let user_name = match form.user_name.trim() {
        "" => None,
        name => Some(name.to_string()),
    };
    let department_name = match form.department_name.trim() {
        "" => None,
        name => Some(name.to_string()),
    };

    if form.is_editing {
        let id = form.id.unwrap();
        let data = UpdateUserRequest {
            user_id: form.user_id.trim().to_string(),
            user_name,
            department,
            department_name,
            passkey: form.passkey.trim().to_string(),
        };
        app.update_user(id, data);
    } else {
        let data = CreateUserRequest {
            user_id: form.user_id.trim().to_string(),
            user_name,
            department,
            department_name,
            passkey: form.passkey.trim().to_string(),
        };
        app.create_user(data);
    }
}
