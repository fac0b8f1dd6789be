mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::BikeDashboardApp;
use clap::Parser;
use eframe::egui;
use state::AppState;

/// Interactive dashboard for the bike-sharing dataset.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Dataset to open at startup (.csv, .json or .parquet)
    #[arg(default_value = "main.csv")]
    data: PathBuf,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    // A missing or broken file is reported in the window; File → Open… still works.
    let mut state = AppState::default();
    state.open(&args.data);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(BikeDashboardApp::new(state)))),
    )
}
