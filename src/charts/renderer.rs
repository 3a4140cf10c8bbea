//! Static Chart Renderer
//! Draws the three candlestick figures with plotters into RGB pixel
//! buffers, and saves the full-analysis figure as a PNG.
//!
//! Figures, in drawing order:
//! 1. Plain candlestick chart
//! 2. Candlestick chart + 50/200-day moving averages
//! 3. Three panels: candles + 10/30-day averages, %K/%D, colored volume

use std::path::{Path, PathBuf};

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::data::StockSeries;
use crate::error::ChartError;
use crate::indicators::{MovingAverage, StochasticPair};

// Green-up/red-down candles. The volume overlay is the other way around:
// red bars for up days, green for down days.
const CANDLE_UP: RGBColor = RGBColor(0, 176, 96);
const CANDLE_DOWN: RGBColor = RGBColor(254, 48, 48);
const VOLUME_UP: RGBColor = RGBColor(255, 0, 0);
const VOLUME_DOWN: RGBColor = RGBColor(0, 128, 0);
// Indicator line colors, blue then orange.
const LINE_FIRST: RGBColor = RGBColor(31, 119, 180);
const LINE_SECOND: RGBColor = RGBColor(255, 127, 14);

// Canvas geometry: wide single-panel figures, a taller three-panel one.
const FIG_WIDTH: u32 = 1440;
const FIG_HEIGHT: u32 = 480;
const FIG_TALL_HEIGHT: u32 = 1200;

/// Date tick stride for the moving-average overlay figure, in trading days.
pub const TICK_STEP_OVERLAY: usize = 30;
/// Date tick stride shared by all three panels of the analysis figure.
pub const TICK_STEP_PANEL: usize = 10;

type Chart2d<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// A rendered figure: raw RGB8 pixels plus dimensions.
#[derive(Clone)]
pub struct RenderedFigure {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// The three figures produced per run.
#[derive(Clone)]
pub struct FigureSet {
    pub candlestick: RenderedFigure,
    pub with_averages: RenderedFigure,
    pub full_analysis: RenderedFigure,
}

impl FigureSet {
    pub fn iter(&self) -> impl Iterator<Item = &RenderedFigure> {
        [&self.candlestick, &self.with_averages, &self.full_analysis].into_iter()
    }
}

/// Fixed output location:
/// `$HOME/Pictures/Stock Trading Graphs/<ticker>_Candlestick_Chart.png`
/// (the temp dir stands in when `$HOME` is unset).
pub fn output_path(ticker: &str) -> PathBuf {
    let base = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    base.join("Pictures")
        .join("Stock Trading Graphs")
        .join(format!("{ticker}_Candlestick_Chart.png"))
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Figure 1: plain candlestick chart of the full series.
    pub fn candlestick(ticker: &str, series: &StockSeries) -> Result<RenderedFigure, ChartError> {
        let step = (series.len() / 8).max(1);
        Self::price_figure(
            &format!("{ticker} Candlestick Chart"),
            series,
            &[],
            step,
        )
    }

    /// Figure 2: candlestick chart with the 50/200-day averages overlaid.
    pub fn candlestick_with_averages(
        ticker: &str,
        series: &StockSeries,
        sma_50: &MovingAverage,
        sma_200: &MovingAverage,
    ) -> Result<RenderedFigure, ChartError> {
        Self::price_figure(
            &format!("{ticker} Candlestick Chart with Moving Averages"),
            series,
            &[sma_50, sma_200],
            TICK_STEP_OVERLAY,
        )
    }

    fn price_figure(
        title: &str,
        series: &StockSeries,
        overlays: &[&MovingAverage],
        step: usize,
    ) -> Result<RenderedFigure, ChartError> {
        if series.is_empty() {
            return Err(ChartError::Render("no data to plot".into()));
        }

        let dates = series.dates()?;
        let open = series.open()?;
        let high = series.high()?;
        let low = series.low()?;
        let close = series.close()?;
        let n = series.len();

        let (w, h) = (FIG_WIDTH, FIG_HEIGHT);
        let mut pixels = vec![255u8; (w * h * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (w, h)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let (y_min, y_max) = price_range(&low, &high);
            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 28))
                .margin(12)
                .x_label_area_size(34)
                .y_label_area_size(60)
                .build_cartesian_2d(-0.5..(n as f64 - 0.5), y_min..y_max)
                .map_err(render_err)?;

            draw_date_mesh(&mut chart, &dates, step, 2)?;
            draw_candles(&mut chart, &open, &high, &low, &close)?;

            for (ma, color) in overlays.iter().zip([LINE_FIRST, LINE_SECOND]) {
                draw_average(&mut chart, ma, color)?;
            }
            if !overlays.is_empty() {
                draw_legend(&mut chart)?;
            }
        }

        Ok(RenderedFigure {
            title: title.to_string(),
            width: w,
            height: h,
            pixels,
        })
    }

    /// Figure 3: candles + 10/30-day averages over a %K/%D panel and a
    /// colored volume panel. Panels split 4:1:2 top to bottom and share
    /// the same date tick stride.
    pub fn full_analysis(
        ticker: &str,
        series: &StockSeries,
        sma_10: &MovingAverage,
        sma_30: &MovingAverage,
        stochastic: &StochasticPair,
    ) -> Result<RenderedFigure, ChartError> {
        if series.is_empty() {
            return Err(ChartError::Render("no data to plot".into()));
        }

        let title = format!("{ticker} Candlestick Chart with Moving Averages and KD Indicator");
        let dates = series.dates()?;
        let open = series.open()?;
        let high = series.high()?;
        let low = series.low()?;
        let close = series.close()?;
        let volume = series.volume()?;
        let n = series.len();

        let (w, h) = (FIG_WIDTH, FIG_TALL_HEIGHT);
        let mut pixels = vec![255u8; (w * h * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (w, h)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;
            let root = root
                .titled(&title, ("sans-serif", 28))
                .map_err(render_err)?;

            let (_, area_h) = root.dim_in_pixel();
            let (price_area, rest) = root.split_vertically(area_h * 4 / 7);
            let (kd_area, volume_area) = rest.split_vertically(area_h / 7);

            let x_range = -0.5..(n as f64 - 0.5);

            // Price panel.
            {
                let (y_min, y_max) = price_range(&low, &high);
                let mut chart = ChartBuilder::on(&price_area)
                    .margin(8)
                    .x_label_area_size(30)
                    .y_label_area_size(60)
                    .build_cartesian_2d(x_range.clone(), y_min..y_max)
                    .map_err(render_err)?;

                draw_date_mesh(&mut chart, &dates, TICK_STEP_PANEL, 2)?;
                draw_candles(&mut chart, &open, &high, &low, &close)?;
                draw_average(&mut chart, sma_10, LINE_FIRST)?;
                draw_average(&mut chart, sma_30, LINE_SECOND)?;
                draw_legend(&mut chart)?;
            }

            // %K/%D panel.
            {
                let mut chart = ChartBuilder::on(&kd_area)
                    .margin(8)
                    .x_label_area_size(30)
                    .y_label_area_size(60)
                    .build_cartesian_2d(x_range.clone(), -5.0..105.0)
                    .map_err(render_err)?;

                draw_date_mesh(&mut chart, &dates, TICK_STEP_PANEL, 0)?;
                draw_kd_line(&mut chart, &stochastic.k, "K value", LINE_FIRST)?;
                draw_kd_line(&mut chart, &stochastic.d, "D value", LINE_SECOND)?;
                draw_legend(&mut chart)?;
            }

            // Volume panel.
            {
                let max_volume = volume.iter().copied().max().unwrap_or(0).max(1) as f64;
                let mut chart = ChartBuilder::on(&volume_area)
                    .margin(8)
                    .x_label_area_size(30)
                    .y_label_area_size(60)
                    .build_cartesian_2d(x_range, 0.0..max_volume * 1.05)
                    .map_err(render_err)?;

                draw_date_mesh(&mut chart, &dates, TICK_STEP_PANEL, 0)?;
                chart
                    .draw_series((0..n).map(|i| {
                        let color = if close[i] >= open[i] {
                            VOLUME_UP
                        } else {
                            VOLUME_DOWN
                        };
                        Rectangle::new(
                            [(i as f64 - 0.25, 0.0), (i as f64 + 0.25, volume[i] as f64)],
                            color.mix(0.8).filled(),
                        )
                    }))
                    .map_err(render_err)?;
            }
        }

        Ok(RenderedFigure {
            title,
            width: w,
            height: h,
            pixels,
        })
    }

    /// Encode a figure as PNG at `path`, creating the directory if needed
    /// and overwriting any previous file.
    pub fn save_png(figure: &RenderedFigure, path: &Path) -> Result<(), ChartError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        image::save_buffer(
            path,
            &figure.pixels,
            figure.width,
            figure.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ChartError::Io(std::io::Error::other(e)))?;
        tracing::info!(path = %path.display(), "chart saved");
        Ok(())
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Y range covering the low/high extremes with a little padding.
fn price_range(low: &[f64], high: &[f64]) -> (f64, f64) {
    let lo = low
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::INFINITY, f64::min);
    let hi = high
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let mut pad = (hi - lo) * 0.05;
    if pad == 0.0 {
        pad = 1.0;
    }
    (lo - pad, hi + pad)
}

/// Candle body width in pixels for `n` candles on the shared canvas width.
fn candle_px_width(n: usize, fig_width: u32) -> u32 {
    if n == 0 {
        return 1;
    }
    let plot_px = fig_width.saturating_sub(90) as f64;
    ((plot_px / n as f64) * 0.8).floor().max(1.0) as u32
}

fn draw_date_mesh(
    chart: &mut Chart2d<'_, '_>,
    dates: &[String],
    step: usize,
    y_decimals: usize,
) -> Result<(), ChartError> {
    let label_count = (dates.len() / step).max(2);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(label_count)
        .x_label_formatter(&|x: &f64| {
            let i = x.round();
            if i < 0.0 {
                return String::new();
            }
            dates.get(i as usize).cloned().unwrap_or_default()
        })
        .y_label_formatter(&|v: &f64| format!("{:.prec$}", v, prec = y_decimals))
        .label_style(("sans-serif", 14))
        .draw()
        .map_err(render_err)?;
    Ok(())
}

fn draw_candles(
    chart: &mut Chart2d<'_, '_>,
    open: &[f64],
    high: &[f64],
    low: &[f64],
    close: &[f64],
) -> Result<(), ChartError> {
    let n = close.len();
    let width = candle_px_width(n, FIG_WIDTH);
    chart
        .draw_series((0..n).map(|i| {
            CandleStick::new(
                i as f64,
                open[i],
                high[i],
                low[i],
                close[i],
                CANDLE_UP.filled(),
                CANDLE_DOWN.filled(),
                width,
            )
        }))
        .map_err(render_err)?;
    Ok(())
}

fn draw_average(
    chart: &mut Chart2d<'_, '_>,
    ma: &MovingAverage,
    color: RGBColor,
) -> Result<(), ChartError> {
    let style = color.stroke_width(2);
    chart
        .draw_series(LineSeries::new(
            ma.defined().map(|(i, v)| (i as f64, v)),
            style,
        ))
        .map_err(render_err)?
        .label(ma.label())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], style));
    Ok(())
}

fn draw_kd_line(
    chart: &mut Chart2d<'_, '_>,
    values: &[f64],
    name: &str,
    color: RGBColor,
) -> Result<(), ChartError> {
    let style = color.stroke_width(2);
    chart
        .draw_series(LineSeries::new(
            values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
            style,
        ))
        .map_err(render_err)?
        .label(name)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], style));
    Ok(())
}

fn draw_legend(chart: &mut Chart2d<'_, '_>) -> Result<(), ChartError> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(render_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_is_derived_from_ticker() {
        let path = output_path("KO");
        assert!(path.is_absolute());
        assert!(path.ends_with("Stock Trading Graphs/KO_Candlestick_Chart.png"));
    }

    #[test]
    fn test_price_range_pads_extremes() {
        let (lo, hi) = price_range(&[10.0, 9.0, 11.0], &[12.0, 14.0, 13.0]);
        assert!(lo < 9.0);
        assert!(hi > 14.0);
    }

    #[test]
    fn test_price_range_flat_series() {
        let (lo, hi) = price_range(&[10.0; 4], &[10.0; 4]);
        assert!(lo < 10.0 && hi > 10.0);
    }

    #[test]
    fn test_price_range_empty() {
        assert_eq!(price_range(&[], &[]), (0.0, 1.0));
    }

    #[test]
    fn test_candle_width_shrinks_with_density() {
        assert!(candle_px_width(50, FIG_WIDTH) > candle_px_width(500, FIG_WIDTH));
        // Never collapses to zero, even for very long histories.
        assert_eq!(candle_px_width(100_000, FIG_WIDTH), 1);
    }

    #[test]
    fn test_save_png_writes_and_overwrites() {
        let figure = RenderedFigure {
            title: "test".into(),
            width: 4,
            height: 2,
            pixels: vec![200u8; 4 * 2 * 3],
        };
        let dir = std::env::temp_dir()
            .join("candlegraph-tests")
            .join(format!("run-{}", std::process::id()));
        let path = dir.join("TEST_Candlestick_Chart.png");

        ChartRenderer::save_png(&figure, &path).unwrap();
        let first = std::fs::metadata(&path).unwrap().len();
        assert!(first > 0);

        // A second run must overwrite the same path without error.
        ChartRenderer::save_png(&figure, &path).unwrap();
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
