//! Control Panel Widget
//! Left side panel with the ticker/start-date inputs and the generate action.

use egui::{Color32, RichText};

/// Current contents of the two input fields. Nothing is validated here;
/// the date is parsed strictly downstream.
#[derive(Default, Clone)]
pub struct UserInputs {
    pub ticker: String,
    pub start_date: String,
}

/// Left side control panel with inputs and progress readout.
pub struct ControlPanel {
    pub inputs: UserInputs,
    pub progress: f32,
    pub status: String,
    pub generate_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            inputs: UserInputs::default(),
            progress: 0.0,
            status: "Ready".to_string(),
            generate_enabled: true,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 CandleGraph")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Stock Trading Graph Generator")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Inputs Section =====
        ui.label(RichText::new("🔧 Inputs").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 80.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Ticker:"));
            ui.add(
                egui::TextEdit::singleline(&mut self.inputs.ticker)
                    .hint_text("e.g. KO for Coca-Cola")
                    .desired_width(170.0),
            );
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Start date:"));
            ui.add(
                egui::TextEdit::singleline(&mut self.inputs.start_date)
                    .hint_text("YYYY-MM-DD, e.g. 2020-09-01")
                    .desired_width(170.0),
            );
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Button =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.generate_enabled, |ui| {
                let button = egui::Button::new(RichText::new("▶ Generate Chart").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::GenerateChart;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    GenerateChart,
}
