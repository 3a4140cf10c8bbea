//! CandleGraph Main Application
//! Main window with control panel and chart viewer. Chart generation runs
//! on a background thread and reports back through a channel, so the UI
//! stays responsive while fetching and rendering.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use egui::SidePanel;

use crate::charts::{output_path, ChartData, ChartRenderer, FigureSet};
use crate::data::DataFetcher;
use crate::error::ChartError;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, UserInputs};
use crate::indicators::{stochastic, MovingAverage, SMA_WINDOWS};

/// Generation result from background thread
enum JobResult {
    Progress(f32, String),
    Complete(Box<ChartData>),
    Error(ChartError),
}

/// Main application window.
pub struct CandleGraphApp {
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async chart generation
    job_rx: Option<Receiver<JobResult>>,
    is_generating: bool,
}

impl CandleGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            job_rx: None,
            is_generating: false,
        }
    }

    /// Kick off the pipeline on a background thread.
    fn start_generation(&mut self) {
        if self.is_generating {
            return; // Already running
        }

        let inputs = self.control_panel.inputs.clone();
        let (tx, rx) = channel();
        self.job_rx = Some(rx);
        self.is_generating = true;
        self.control_panel.generate_enabled = false;
        self.control_panel.set_progress(5.0, "Starting...");

        thread::spawn(move || Self::run_generation(tx, inputs));
    }

    fn run_generation(tx: Sender<JobResult>, inputs: UserInputs) {
        match Self::generate(&tx, &inputs) {
            Ok(data) => {
                let _ = tx.send(JobResult::Complete(Box::new(data)));
            }
            Err(e) => {
                tracing::error!(error = %e, "chart generation failed");
                let _ = tx.send(JobResult::Error(e));
            }
        }
    }

    /// The whole fetch/compute/render/save pipeline (background thread).
    fn generate(tx: &Sender<JobResult>, inputs: &UserInputs) -> Result<ChartData, ChartError> {
        let ticker = inputs.ticker.trim().to_string();
        let start = DataFetcher::parse_start_date(&inputs.start_date)?;

        let _ = tx.send(JobResult::Progress(
            15.0,
            format!("Fetching {ticker} history..."),
        ));
        let mut series = DataFetcher::fetch(&ticker, start)?;

        let _ = tx.send(JobResult::Progress(
            45.0,
            "Computing indicators...".to_string(),
        ));
        let close = series.close()?;
        let high = series.high()?;
        let low = series.low()?;

        let mut averages = MovingAverage::set(&close, &SMA_WINDOWS).into_iter();
        let (Some(sma_10), Some(sma_30), Some(sma_50), Some(sma_200)) = (
            averages.next(),
            averages.next(),
            averages.next(),
            averages.next(),
        ) else {
            return Err(ChartError::Compute("moving average set incomplete".into()));
        };

        let stoch = stochastic(&high, &low, &close).zero_filled();
        series.attach_stochastic(&stoch)?;

        let _ = tx.send(JobResult::Progress(65.0, "Rendering charts...".to_string()));
        let (fig1, (fig2, fig3)) = rayon::join(
            || ChartRenderer::candlestick(&ticker, &series),
            || {
                rayon::join(
                    || {
                        ChartRenderer::candlestick_with_averages(
                            &ticker, &series, &sma_50, &sma_200,
                        )
                    },
                    || ChartRenderer::full_analysis(&ticker, &series, &sma_10, &sma_30, &stoch),
                )
            },
        );
        let figures = FigureSet {
            candlestick: fig1?,
            with_averages: fig2?,
            full_analysis: fig3?,
        };

        let _ = tx.send(JobResult::Progress(90.0, "Saving PNG...".to_string()));
        let saved_path = output_path(&ticker);
        ChartRenderer::save_png(&figures.full_analysis, &saved_path)?;

        Ok(ChartData {
            dates: series.dates()?,
            open: series.open()?,
            volume: series.volume()?,
            ticker,
            high,
            low,
            close,
            sma_10,
            sma_30,
            k: stoch.k,
            d: stoch.d,
            figures,
            saved_path,
        })
    }

    /// Check for background generation results
    fn check_job_results(&mut self, ctx: &egui::Context) {
        // Take the receiver temporarily to avoid borrow issues
        let rx = self.job_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    JobResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    JobResult::Complete(data) => {
                        self.control_panel.set_progress(
                            100.0,
                            &format!("Complete! Saved to {}", data.saved_path.display()),
                        );
                        self.chart_viewer.set_chart_data(ctx, *data);
                        self.finish_job();
                        should_keep_receiver = false;
                    }
                    JobResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {error}"));
                        Self::show_error_dialog(&error);
                        self.finish_job();
                        should_keep_receiver = false;
                    }
                }
            }

            // Put receiver back if still needed
            if should_keep_receiver {
                self.job_rx = Some(rx);
            }
        }
    }

    fn finish_job(&mut self) {
        self.is_generating = false;
        self.control_panel.generate_enabled = true;
    }

    /// The single error surface: a modal dialog with the failure message.
    /// The app stays open and re-triggerable after dismissal.
    fn show_error_dialog(error: &ChartError) {
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Error")
            .set_description(error.to_string())
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

impl eframe::App for CandleGraphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_job_results(ctx);

        // Request repaint while generating
        if self.is_generating {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::GenerateChart => self.start_generation(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
