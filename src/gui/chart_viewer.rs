//! Chart Viewer Widget
//! Central panel showing the three rendered figures as textures, plus an
//! interactive rendition of the analysis figure.

use egui::{Color32, ColorImage, RichText, ScrollArea, TextureHandle, TextureOptions};

use crate::charts::{ChartData, ChartPlotter};

#[derive(Clone, Copy, PartialEq, Eq)]
enum ViewTab {
    Candlestick,
    MovingAverages,
    FullAnalysis,
    Interactive,
}

/// Figure display area. Textures are uploaded once per generated chart
/// set and redrawn every frame.
pub struct ChartViewer {
    pub chart_data: Option<ChartData>,
    textures: Vec<TextureHandle>,
    selected: ViewTab,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self {
            chart_data: None,
            textures: Vec::new(),
            selected: ViewTab::FullAnalysis,
        }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.chart_data = None;
        self.textures.clear();
    }

    /// Upload the rendered figures as textures and jump to the final one.
    pub fn set_chart_data(&mut self, ctx: &egui::Context, data: ChartData) {
        self.textures = data
            .figures
            .iter()
            .map(|figure| {
                let img = ColorImage::from_rgb(
                    [figure.width as usize, figure.height as usize],
                    &figure.pixels,
                );
                ctx.load_texture(figure.title.clone(), img, TextureOptions::LINEAR)
            })
            .collect();
        self.selected = ViewTab::FullAnalysis;
        self.chart_data = Some(data);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        if self.chart_data.is_none() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.selected, ViewTab::Candlestick, "Candlestick");
            ui.selectable_value(&mut self.selected, ViewTab::MovingAverages, "Moving Averages");
            ui.selectable_value(&mut self.selected, ViewTab::FullAnalysis, "Full Analysis");
            ui.selectable_value(&mut self.selected, ViewTab::Interactive, "Interactive");
        });
        ui.add_space(8.0);

        let Some(data) = &self.chart_data else {
            return;
        };

        match self.selected {
            ViewTab::Candlestick => Self::draw_figure(ui, &self.textures, 0),
            ViewTab::MovingAverages => Self::draw_figure(ui, &self.textures, 1),
            ViewTab::FullAnalysis => {
                Self::saved_path_row(ui, data);
                ui.add_space(4.0);
                Self::draw_figure(ui, &self.textures, 2);
            }
            ViewTab::Interactive => {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ChartPlotter::draw_full_analysis(ui, data);
                    });
            }
        }
    }

    fn draw_figure(ui: &mut egui::Ui, textures: &[TextureHandle], idx: usize) {
        let Some(texture) = textures.get(idx) else {
            return;
        };
        ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            let size = texture.size_vec2();
            let scale = (ui.available_width() / size.x).min(1.5);
            ui.add(egui::Image::new(texture).fit_to_exact_size(size * scale));
        });
    }

    fn saved_path_row(ui: &mut egui::Ui, data: &ChartData) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("Saved to {}", data.saved_path.display()))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
            if ui.small_button("🖼 Open in image viewer").clicked() {
                if let Err(e) = open::that(&data.saved_path) {
                    tracing::warn!(error = %e, "failed to open saved chart");
                }
            }
        });
    }
}
