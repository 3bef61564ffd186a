//! KBK Admin - Desktop administration console for the KBK attendance backend.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use eframe::egui;
use kbk_admin as app;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use app::client::ApiClient;
use app::config::{AdminRole, AppConfig, ConfigLoadResult};
use app::ui::App;

/// Desktop administration console for the KBK attendance backend.
#[derive(Parser)]
#[command(name = "kbk-admin")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging: stdout plus a daily-rolled file next to the logs dir
    let file_appender = tracing_appender::rolling::daily("logs", "kbk-admin.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    tracing::info!("KBK Admin starting...");

    // Determine config path based on mode
    let config_path = if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    tracing::info!("Config path: {:?}", config_path);

    let config = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            config
        }
        ConfigLoadResult::Missing => {
            let mut template = AppConfig::default();
            template.session.role = AdminRole::Admin;
            if let Err(e) = template.save(&config_path) {
                tracing::error!("Failed to write config template: {}", e);
                return ExitCode::FAILURE;
            }
            tracing::info!(
                "Wrote config template to {:?}; fill in the server URL and admin token, then restart",
                config_path
            );
            return ExitCode::SUCCESS;
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::error!("Config invalid: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run_app(config, config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the main application.
fn run_app(config: AppConfig, config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("KBK Admin")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    let client = ApiClient::new(
        &config.server.url,
        &config.session.token,
        config.server.timeout_secs,
    )?;
    tracing::info!("Backend: {}", config.server.url);

    eframe::run_native(
        "KBK Admin",
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(App::new(client, config, config_path, rt)))
        }),
    )?;
    Ok(())
}
