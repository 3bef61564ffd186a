//! Admin account management panel with CRUD and password reset.

use chrono::Local;
use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, KEY, PENCIL, PLUS, TRASH};

use crate::models::admin_user::{
    CreateAdminUserRequest, ResetPasswordRequest, UpdateAdminUserRequest,
};

use super::app::{AdminUserForm, App, DeleteTarget, ResetPasswordForm};
use super::components::{
    action_button, back_button, danger_action_button, panel_header, primary_button_with_icon,
    styled_button, styled_button_with_icon,
};

/// Show the admin accounts panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Admin Accounts");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Account").clicked() {
            app.admin_user_form = AdminUserForm {
                role: "department".to_string(),
                is_open: true,
                ..Default::default()
            };
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_admin_users();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.admin_user_form.is_open {
        show_form_dialog(app, ui.ctx());
    }
    if app.reset_password_form.is_open {
        show_reset_dialog(app, ui.ctx());
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let admins = app.admin_users.clone();

    ui.label(format!("{} accounts", admins.len()));
    ui.add_space(10.0);

    let mut edit_form = None;
    let mut reset_form = None;
    let mut delete_target = None;

    ScrollArea::vertical().id_salt("admins_scroll").show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("admins_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Username");
                ui.strong("Role");
                ui.strong("Department");
                ui.strong("Created");
                ui.strong("Actions");
                ui.end_row();

                for admin in &admins {
                    ui.label(&admin.username);
                    ui.label(&admin.role);
                    ui.label(admin.department.map(|d| d.to_string()).unwrap_or("-".to_string()));
                    ui.label(
                        admin
                            .created_at
                            .with_timezone(&Local)
                            .format("%Y-%m-%d")
                            .to_string(),
                    );

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            edit_form = Some(AdminUserForm::edit(admin));
                        }
                        ui.add_space(4.0);
                        if action_button(ui, KEY, "Reset password").clicked() {
                            reset_form = Some(ResetPasswordForm {
                                id: Some(admin.id),
                                username: admin.username.clone(),
                                new_password: String::new(),
                                is_open: true,
                            });
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            delete_target =
                                Some(DeleteTarget::AdminUser(admin.id, admin.username.clone()));
                        }
                    });

                    ui.end_row();
                }
            });
    });

    if let Some(form) = edit_form {
        app.admin_user_form = form;
    }
    if let Some(form) = reset_form {
        app.reset_password_form = form;
    }
    if let Some(target) = delete_target {
        app.request_delete(target);
    }
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.admin_user_form.is_editing {
        "Edit Account"
    } else {
        "Add Account"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("admin_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Username:");
                    ui.add(egui::TextEdit::singleline(&mut app.admin_user_form.username).desired_width(200.0));
                    ui.end_row();

                    ui.label("Password:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.admin_user_form.password)
                            .desired_width(200.0)
                            .password(true)
                            .hint_text(if app.admin_user_form.is_editing {
                                "Leave blank to keep"
                            } else {
                                ""
                            }),
                    );
                    ui.end_row();

                    ui.label("Role:");
                    egui::ComboBox::from_id_salt("admin_form_role")
                        .width(150.0)
                        .selected_text(app.admin_user_form.role.as_str())
                        .show_ui(ui, |ui| {
                            for role in ["admin", "department"] {
                                if ui
                                    .selectable_label(app.admin_user_form.role == role, role)
                                    .clicked()
                                {
                                    app.admin_user_form.role = role.to_string();
                                }
                            }
                        });
                    ui.end_row();

                    ui.label("Department:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.admin_user_form.department)
                            .desired_width(100.0)
                            .hint_text("Required for department role"),
                    );
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.admin_user_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Save").clicked() {
                        save_admin_user(app);
                    }
                });
            });
        });
}

fn show_reset_dialog(app: &mut App, ctx: &egui::Context) {
    let title = format!("Reset Password: {}", app.reset_password_form.username);

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(350.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.label("New password:");
                ui.add(
                    egui::TextEdit::singleline(&mut app.reset_password_form.new_password)
                        .desired_width(180.0)
                        .password(true),
                );
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.reset_password_form = ResetPasswordForm::default();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Reset").clicked() {
                        let form = app.reset_password_form.clone();
                        if form.new_password.trim().is_empty() {
                            app.error_message = Some("New password is required".to_string());
                        } else if let Some(id) = form.id {
                            app.reset_admin_password(
                                id,
                                ResetPasswordRequest {
                                    new_password: form.new_password,
                                },
                            );
                        }
                    }
                });
            });
        });
}

fn save_admin_user(app: &mut App) {
    let form = &app.admin_user_form;

    if form.username.trim().is_empty() {
        app.error_message = Some("Username is required".to_string());
        return;
    }
    if !form.is_editing && form.password.trim().is_empty() {
        app.error_message = Some("Password is required".to_string());
        return;
    }

    let department = if form.department.trim().is_empty() {
        None
    } else {
        match form.department.trim().parse() {
            Ok(code) => Some(code),
            Err(_) => {
                app.error_message = Some("Department must be a numeric code".to_string());
                return;
            }
        }
    };
    if form.role == "department" && department.is_none() {
        app.error_message = Some("Department role requires a department code".to_string());
        return;
    }

    if form.is_editing {
        let id = form.id.unwrap();
        let password = match form.password.trim() {
            "" => None,
            pass => Some(pass.to_string()),
        };
        let data = UpdateAdminUserRequest {
            username: form.username.trim().to_string(),
            password,
            role: form.role.clone(),
            department,
        };
        app.update_admin_user(id, data);
    } else {
        let data = CreateAdminUserRequest {
            username: form.username.trim().to_string(),
            password: form.password.trim().to_string(),
            role: form.role.clone(),
            department,
        };
        app.create_admin_user(data);
    }
}
