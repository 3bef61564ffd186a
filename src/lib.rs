pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod stats;
pub mod ui;

pub use error::{AppError, Result};
