//! Statistics panel: filtered department roll-ups with sortable per-user
//! tables and a detail drill-down modal.

use std::time::Instant;

use chrono::{Datelike, Local};
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::ARROWS_CLOCKWISE;

use crate::models::stats::UserAttendanceStat;
use crate::stats::{
    DetailContent, DetailState, SortColumn, ViewType, YearlyAggregate, month_name,
};

use super::app::App;
use super::components::{
    back_button, colors, panel_header, primary_button_with_icon, sort_header, styled_button,
    styled_button_with_icon,
};

/// Show the statistics panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Department Statistics");

    show_filter_bar(app, ui);

    ui.add_space(15.0);

    if let Some(ref error) = app.stats.error.clone() {
        ui.colored_label(colors::ERROR, error);
        ui.add_space(10.0);
    }

    if app.stats.loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading statistics...");
        });
    } else if app.stats.loaded && app.stats.departments.is_empty() {
        ui.label(RichText::new("No statistics available for the selected filters").weak());
    } else {
        show_departments(app, ui);
    }

    show_detail_modal(app, ui.ctx());
    show_detail_error(app, ui.ctx());

    go_back
}

fn show_filter_bar(app: &mut App, ui: &mut Ui) {
    let mut fetch = false;

    ui.horizontal(|ui| {
        ui.label("View:");
        if ui
            .selectable_label(app.stats.filter.view_type == ViewType::Month, "Monthly")
            .clicked()
            && app.stats.filter.view_type != ViewType::Month
        {
            app.stats.filter.view_type = ViewType::Month;
            fetch = true;
        }
        if ui
            .selectable_label(app.stats.filter.view_type == ViewType::Year, "Yearly")
            .clicked()
            && app.stats.filter.view_type != ViewType::Year
        {
            app.stats.filter.view_type = ViewType::Year;
            fetch = true;
        }

        ui.add_space(20.0);

        ui.label("Month:");
        ui.add_enabled_ui(app.stats.filter.view_type == ViewType::Month, |ui| {
            egui::ComboBox::from_id_salt("stats_month")
                .width(120.0)
                .selected_text(month_name(app.stats.filter.month))
                .show_ui(ui, |ui| {
                    for month in 1..=12 {
                        if ui
                            .selectable_label(app.stats.filter.month == month, month_name(month))
                            .clicked()
                            && app.stats.filter.month != month
                        {
                            app.stats.filter.month = month;
                            fetch = true;
                        }
                    }
                });
        });

        ui.add_space(20.0);

        ui.label("Year:");
        let current_year = Local::now().year();
        egui::ComboBox::from_id_salt("stats_year")
            .width(80.0)
            .selected_text(app.stats.filter.year.to_string())
            .show_ui(ui, |ui| {
                for year in (current_year - 1)..=(current_year + 1) {
                    if ui
                        .selectable_label(app.stats.filter.year == year, year.to_string())
                        .clicked()
                        && app.stats.filter.year != year
                    {
                        app.stats.filter.year = year;
                        fetch = true;
                    }
                }
            });
    });

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label("Search:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut app.stats.filter.user_name_query)
                .desired_width(200.0)
                .hint_text("User name..."),
        );
        if response.changed() {
            app.stats.arm_search_debounce(Instant::now());
        }

        if app.stats_department_filter_enabled {
            ui.add_space(20.0);

            ui.label("Department:");
            ui.add(
                egui::TextEdit::singleline(&mut app.stats_department_input)
                    .desired_width(80.0)
                    .hint_text("All"),
            );
        }

        ui.add_space(20.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Apply").clicked() {
            match app.stats_department_input.trim() {
                "" => {
                    app.stats.filter.department = None;
                    fetch = true;
                }
                code => match code.parse() {
                    Ok(code) => {
                        app.stats.filter.department = Some(code);
                        fetch = true;
                    }
                    Err(_) => {
                        app.error_message = Some("Department must be a numeric code".to_string());
                    }
                },
            }
        }

        ui.add_space(10.0);

        if styled_button(ui, "Reset").clicked() {
            app.stats.reset_filters();
            app.stats_department_input.clear();
            fetch = true;
        }
    });

    if fetch {
        app.fetch_stats();
    }
}

fn show_departments(app: &mut App, ui: &mut Ui) {
    let departments = app.stats.departments.clone();

    // Deferred so the render pass never borrows the view model mutably.
    let mut toggle: Option<(i32, SortColumn)> = None;
    let mut detail_row: Option<UserAttendanceStat> = None;

    ScrollArea::vertical().id_salt("stats_scroll").show(ui, |ui| {
        for dept in &departments {
            let dept_title = dept
                .department_name
                .clone()
                .unwrap_or_else(|| format!("Department {}", dept.department));

            ui.add_space(4.0);
            ui.label(RichText::new(dept_title).size(18.0).strong());
            ui.label(
                RichText::new(format!(
                    "{} users, {} attendance days, {:.2}h average",
                    dept.user_count, dept.total_attendance_days, dept.avg_work_hours
                ))
                .weak(),
            );
            ui.add_space(8.0);

            let sort = app.stats.sort_state(dept.department);

            egui::Grid::new(("stats_grid", dept.department))
                .num_columns(5)
                .striped(true)
                .min_col_width(80.0)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.strong("User");
                    if sort_header(ui, "Total Days", sort.direction_for(SortColumn::TotalDays)) {
                        toggle = Some((dept.department, SortColumn::TotalDays));
                    }
                    if sort_header(ui, "Total Hours", sort.direction_for(SortColumn::TotalHours)) {
                        toggle = Some((dept.department, SortColumn::TotalHours));
                    }
                    ui.strong("Last Checkin");
                    ui.strong("Actions");
                    ui.end_row();

                    for row in &dept.users {
                        ui.label(row.display_name());
                        ui.label(row.total_days.to_string());
                        ui.label(format!("{:.2}", row.total_hours));
                        ui.label(
                            row.last_checkin
                                .map(|t| {
                                    t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
                                })
                                .unwrap_or("-".to_string()),
                        );

                        if ui.button("Details").clicked() {
                            detail_row = Some(row.clone());
                        }
                        ui.end_row();
                    }
                });

            ui.add_space(12.0);
            ui.separator();
        }
    });

    if let Some((department, column)) = toggle {
        app.stats.toggle_sort(department, column);
    }
    if let Some(row) = detail_row
        && let Some(request) = app.stats.open_detail(&row)
    {
        app.fetch_detail(request);
    }
}

fn show_detail_modal(app: &mut App, ctx: &egui::Context) {
    let mut close = false;
    let mut drill_month: Option<u32> = None;

    match &app.stats.detail {
        DetailState::Closed => return,
        DetailState::Loading { user_name, .. } => {
            egui::Window::new(format!("Details: {user_name}"))
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading details...");
                    });
                });
        }
        DetailState::Shown { user_name, content } => {
            let title = format!("Details: {user_name}");
            match content {
                DetailContent::Month(detail) => {
                    let detail = detail.clone();
                    egui::Window::new(title)
                        .collapsible(false)
                        .default_width(520.0)
                        .max_height(500.0)
                        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                        .show(ctx, |ui| {
                            ui.label(
                                RichText::new(format!(
                                    "{} {}",
                                    month_name(detail.month),
                                    detail.year
                                ))
                                .strong(),
                            );
                            ui.label(format!(
                                "{} days, {:.2} hours total",
                                detail.total_days, detail.total_hours
                            ));
                            ui.add_space(10.0);

                            if detail.records.is_empty() {
                                ui.label(RichText::new("No attendance records this month").weak());
                            } else {
                                show_month_records(ui, &detail);
                            }

                            ui.add_space(10.0);
                            if ui.button("Close").clicked() {
                                close = true;
                            }
                        });
                }
                DetailContent::Year(aggregate) => {
                    let aggregate = aggregate.clone();
                    egui::Window::new(title)
                        .collapsible(false)
                        .default_width(420.0)
                        .max_height(500.0)
                        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                        .show(ctx, |ui| {
                            ui.label(RichText::new(format!("Year {}", aggregate.year)).strong());
                            ui.label(format!(
                                "{} days, {:.2} hours total",
                                aggregate.total_days, aggregate.total_hours
                            ));
                            ui.add_space(10.0);

                            if aggregate.months.is_empty() {
                                ui.label(RichText::new("No attendance records this year").weak());
                            } else {
                                drill_month = show_year_breakdown(ui, &aggregate);
                            }

                            ui.add_space(10.0);
                            if ui.button("Close").clicked() {
                                close = true;
                            }
                        });
                }
            }
        }
    }

    if close {
        app.stats.close_detail();
    }
    if let Some(month) = drill_month
        && let Some(request) = app.stats.drill_down_month(month)
    {
        app.fetch_detail(request);
    }
}

fn show_month_records(ui: &mut Ui, detail: &crate::models::stats::UserDetailResponse) {
    ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
        egui::Grid::new("detail_records_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(70.0)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.strong("Date");
                ui.strong("First In");
                ui.strong("Last Out");
                ui.strong("Hours");
                ui.strong("Status");
                ui.end_row();

                for record in &detail.records {
                    ui.label(record.date.to_string());
                    ui.label(
                        record
                            .first_checkin
                            .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
                            .unwrap_or("-".to_string()),
                    );
                    ui.label(
                        record
                            .last_checkout
                            .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
                            .unwrap_or("-".to_string()),
                    );
                    ui.label(format!("{:.2}", record.work_hours()));

                    ui.horizontal(|ui| {
                        if record.is_late {
                            ui.colored_label(colors::WARNING, "Late");
                        }
                        if record.is_early_leave {
                            ui.colored_label(colors::WARNING, "Early Leave");
                        }
                        if !record.is_late && !record.is_early_leave {
                            ui.colored_label(colors::SUCCESS, "Normal");
                        }
                    });
                    ui.end_row();
                }
            });
    });
}

/// Render the monthly breakdown; returns a month the user drilled into.
fn show_year_breakdown(ui: &mut Ui, aggregate: &YearlyAggregate) -> Option<u32> {
    let mut drill = None;

    ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
        egui::Grid::new("detail_breakdown_grid")
            .num_columns(4)
            .striped(true)
            .min_col_width(70.0)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.strong("Month");
                ui.strong("Days");
                ui.strong("Hours");
                ui.strong("");
                ui.end_row();

                for month in &aggregate.months {
                    ui.label(month_name(month.month));
                    ui.label(month.total_days.to_string());
                    ui.label(format!("{:.2}", month.total_hours));
                    if ui.button("View Details").clicked() {
                        drill = Some(month.month);
                    }
                    ui.end_row();
                }
            });
    });

    drill
}

fn show_detail_error(app: &mut App, ctx: &egui::Context) {
    if let Some(ref error) = app.stats.detail_error.clone() {
        egui::Window::new("Detail Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.colored_label(colors::ERROR, error);
                ui.add_space(10.0);
                if primary_button_with_icon(ui, "", "OK").clicked() {
                    app.stats.detail_error = None;
                }
            });
    }
}
