//! GUI panels and application state.

pub mod admin_users_panel;
pub mod app;
pub mod checkins_panel;
pub mod components;
pub mod dashboard;
pub mod points_panel;
pub mod stats_panel;
pub mod users_panel;

pub use app::{App, Panel};
