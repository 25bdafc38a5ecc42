//! Control Panel Widget
//! Left side panel with dataset info, chart toggles and export actions.

use egui::{Color32, RichText};
use std::path::PathBuf;

/// User-facing settings for the current session.
#[derive(Default, Clone)]
pub struct UserSettings {
    pub data_path: PathBuf,
    pub show_scatter: bool,
    pub show_bar: bool,
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub row_count: Option<usize>,
    pub status: String,
    pub is_error: bool,
}

impl ControlPanel {
    pub fn new(settings: UserSettings) -> Self {
        Self {
            settings,
            row_count: None,
            status: "Ready".to_string(),
            is_error: false,
        }
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.is_error = false;
    }

    pub fn set_error(&mut self, status: &str) {
        self.status = format!("Error: {}", status);
        self.is_error = true;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚗 Vehicle Insights")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Listings Dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let file_name = self
                    .settings
                    .data_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| self.settings.data_path.display().to_string());
                ui.label(RichText::new(file_name).size(12.0));

                let rows = self
                    .row_count
                    .map(|n| format!("{} listings", n))
                    .unwrap_or_else(|| "Not loaded".to_string());
                ui.label(RichText::new(rows).size(11.0).color(Color32::GRAY));

                ui.add_space(4.0);
                if ui.small_button("🔄 Reload").clicked() {
                    action = ControlPanelAction::Reload;
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Charts Section =====
        ui.label(RichText::new("📊 Charts").size(14.0).strong());
        ui.add_space(5.0);

        if ui
            .checkbox(&mut self.settings.show_scatter, "Model year scatterplot")
            .changed()
        {
            action = ControlPanelAction::ToggleChanged;
        }
        if ui
            .checkbox(&mut self.settings.show_bar, "Cylinder count bar chart")
            .changed()
        {
            action = ControlPanelAction::ToggleChanged;
        }

        ui.add_space(8.0);
        ui.add_enabled_ui(self.settings.show_scatter, |ui| {
            if ui.button("🎲 Redraw Jitter").clicked() {
                action = ControlPanelAction::Rerender;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.vertical_centered(|ui| {
            let has_data = self.row_count.is_some();
            let has_chart = self.settings.show_scatter || self.settings.show_bar;

            ui.add_enabled_ui(has_data && has_chart, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(has_data, |ui| {
                let button = egui::Button::new(RichText::new("📄 Export JSON").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportJson;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.is_error {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    ToggleChanged,
    Rerender,
    Reload,
    ExportPng,
    ExportJson,
}
