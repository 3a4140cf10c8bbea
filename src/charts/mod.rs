//! Charts module - static figure rendering and the interactive rendition

mod plotter;
mod renderer;

pub use plotter::{ChartData, ChartPlotter};
pub use renderer::{output_path, ChartRenderer, FigureSet, RenderedFigure};
