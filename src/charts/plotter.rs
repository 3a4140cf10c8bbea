//! Interactive Chart Rendition
//! Zoomable egui_plot version of the analysis figure: candlestick panel
//! with 10/30-day averages, %K/%D panel, and colored volume panel.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use egui::Color32;
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridInput, GridMark, Legend, Line, Plot, PlotPoints};

use super::renderer::{FigureSet, TICK_STEP_PANEL};
use crate::indicators::MovingAverage;

const CANDLE_UP: Color32 = Color32::from_rgb(0, 176, 96);
const CANDLE_DOWN: Color32 = Color32::from_rgb(254, 48, 48);
const VOLUME_UP: Color32 = Color32::from_rgb(255, 0, 0);
const VOLUME_DOWN: Color32 = Color32::from_rgb(0, 128, 0);
const LINE_FIRST: Color32 = Color32::from_rgb(31, 119, 180);
const LINE_SECOND: Color32 = Color32::from_rgb(255, 127, 14);

/// Everything the viewer needs for one generated chart set.
pub struct ChartData {
    pub ticker: String,
    pub dates: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<u64>,
    pub sma_10: MovingAverage,
    pub sma_30: MovingAverage,
    pub k: Vec<f64>,
    pub d: Vec<f64>,
    pub figures: FigureSet,
    pub saved_path: PathBuf,
}

pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw the three linked panels, stacked with the same 4:1:2 split as
    /// the static figure.
    pub fn draw_full_analysis(ui: &mut egui::Ui, data: &ChartData) {
        let spacing = 8.0;
        // available_height is unbounded inside a scroll area
        let total = (ui.available_height() - 2.0 * spacing).clamp(420.0, 980.0);

        Self::draw_price_panel(ui, data, total * 4.0 / 7.0);
        ui.add_space(spacing);
        Self::draw_kd_panel(ui, data, total / 7.0);
        ui.add_space(spacing);
        Self::draw_volume_panel(ui, data, total * 2.0 / 7.0);
    }

    fn draw_price_panel(ui: &mut egui::Ui, data: &ChartData, height: f32) {
        let candles = Self::candle_elements(data);

        Plot::new(format!("price_{}", data.ticker))
            .height(height)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_formatter(Self::date_formatter(data.dates.clone()))
            .x_grid_spacer(Self::date_grid(data.dates.len()))
            .show(ui, |plot_ui| {
                plot_ui.box_plot(BoxPlot::new(candles).name("Price"));
                Self::average_line(plot_ui, &data.sma_10, LINE_FIRST);
                Self::average_line(plot_ui, &data.sma_30, LINE_SECOND);
            });
    }

    fn draw_kd_panel(ui: &mut egui::Ui, data: &ChartData, height: f32) {
        Plot::new(format!("kd_{}", data.ticker))
            .height(height)
            .allow_scroll(false)
            .legend(Legend::default())
            .include_y(0.0)
            .include_y(100.0)
            .x_axis_formatter(Self::date_formatter(data.dates.clone()))
            .x_grid_spacer(Self::date_grid(data.dates.len()))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(Self::index_points(&data.k))
                        .color(LINE_FIRST)
                        .width(1.5)
                        .name("K value"),
                );
                plot_ui.line(
                    Line::new(Self::index_points(&data.d))
                        .color(LINE_SECOND)
                        .width(1.5)
                        .name("D value"),
                );
            });
    }

    fn draw_volume_panel(ui: &mut egui::Ui, data: &ChartData, height: f32) {
        let bars: Vec<Bar> = (0..data.volume.len())
            .map(|i| {
                let color = if data.close[i] >= data.open[i] {
                    VOLUME_UP
                } else {
                    VOLUME_DOWN
                };
                Bar::new(i as f64, data.volume[i] as f64)
                    .width(0.5)
                    .fill(color.gamma_multiply(0.8))
            })
            .collect();

        Plot::new(format!("volume_{}", data.ticker))
            .height(height)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_formatter(Self::date_formatter(data.dates.clone()))
            .x_grid_spacer(Self::date_grid(data.dates.len()))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Volume"));
            });
    }

    /// One box element per trading day, colored by direction. The body
    /// spans open/close, the whiskers span low/high.
    fn candle_elements(data: &ChartData) -> Vec<BoxElem> {
        (0..data.close.len())
            .map(|i| {
                let (open, close) = (data.open[i], data.close[i]);
                let color = if close >= open { CANDLE_UP } else { CANDLE_DOWN };
                BoxElem::new(
                    i as f64,
                    BoxSpread::new(
                        data.low[i],
                        open.min(close),
                        (open + close) / 2.0,
                        open.max(close),
                        data.high[i],
                    ),
                )
                .box_width(0.6)
                .whisker_width(0.0)
                .fill(color.gamma_multiply(0.85))
                .stroke(egui::Stroke::new(1.0, color))
            })
            .collect()
    }

    fn average_line(plot_ui: &mut egui_plot::PlotUi, ma: &MovingAverage, color: Color32) {
        let points: PlotPoints = ma.defined().map(|(i, v)| [i as f64, v]).collect();
        plot_ui.line(Line::new(points).color(color).width(1.5).name(ma.label()));
    }

    fn index_points(values: &[f64]) -> PlotPoints {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| [i as f64, *v])
            .collect()
    }

    /// Label grid marks with the date index; marks land on whole days.
    fn date_formatter(dates: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let i = mark.value.round();
            if i < 0.0 {
                return String::new();
            }
            dates.get(i as usize).cloned().unwrap_or_default()
        }
    }

    /// Grid marks at the fixed tick stride shared by all panels.
    fn date_grid(len: usize) -> impl Fn(GridInput) -> Vec<GridMark> {
        move |input| {
            let step = TICK_STEP_PANEL as f64;
            let (min, max) = input.bounds;
            let mut marks = Vec::new();
            let mut value = (min / step).ceil() * step;
            while value <= max && value < len as f64 {
                if value >= 0.0 {
                    marks.push(GridMark {
                        value,
                        step_size: step,
                    });
                }
                value += step;
            }
            marks
        }
    }
}
