//! CandleGraph - Stock Trading Graph Generator
//!
//! Fetches daily price history for a ticker and renders candlestick charts
//! with moving averages, a stochastic oscillator and volume.

mod charts;
mod data;
mod error;
mod gui;
mod indicators;

use eframe::egui;
use gui::CandleGraphApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 840.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("CandleGraph"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "CandleGraph",
        options,
        Box::new(|cc| Ok(Box::new(CandleGraphApp::new(cc)))),
    )
}
