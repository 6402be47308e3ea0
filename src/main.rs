//! Hometrics - USA Housing Analytics Dashboard
//!
//! Loads a static housing-sale dataset once, then lets the user filter it
//! and explore summary statistics and charts over the filtered subset.

mod data;
mod gui;
mod stats;
mod view;

use anyhow::Context;
use eframe::egui;
use gui::HometricsApp;

/// The one static input file, read from the working directory.
pub const DATA_PATH: &str = "USA Housing Dataset.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // A load failure is fatal: no partial dashboard is shown.
    let dataset = data::load_cached(DATA_PATH)
        .with_context(|| format!("failed to load dataset from '{DATA_PATH}'"))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("Hometrics"),
        ..Default::default()
    };

    eframe::run_native(
        "Hometrics",
        options,
        Box::new(move |cc| Ok(Box::new(HometricsApp::new(cc, dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("egui runtime error: {e}"))
}
