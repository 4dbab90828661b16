//! Settings panel for solar-rooftop GUI

use eframe::egui::{self, Color32, RichText, Ui};
use solar_app::config::Config;
use solar_app::constants::city_names;
use solar_types::PanelType;
use solar_vision::DetectorKind;
use std::path::PathBuf;

const DETECTORS: [DetectorKind; 2] = [DetectorKind::Vegetation, DetectorKind::None];

/// Settings panel
pub struct SettingsPanel {
    /// Edited copy of the configuration
    draft: Config,
    /// Output directory as typed
    output_dir_input: String,
    /// Log directory as typed
    log_dir_input: String,
    /// Whether the draft differs from the saved config
    modified: bool,
    /// (message, is_error)
    status_message: Option<(String, bool)>,
}

impl SettingsPanel {
    pub fn new(config: &Config) -> Self {
        Self {
            draft: config.clone(),
            output_dir_input: config.output_dir.display().to_string(),
            log_dir_input: config.log_dir.display().to_string(),
            modified: false,
            status_message: None,
        }
    }

    fn load_draft(&mut self, config: &Config) {
        *self = Self::new(config);
    }

    pub fn ui(&mut self, ui: &mut Ui, config: &mut Config) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Settings");
            ui.add_space(10.0);

            self.render_defaults(ui);

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(15.0);

            self.render_tariff(ui);

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(15.0);

            self.render_processing(ui);

            ui.add_space(20.0);

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(self.modified, egui::Button::new(RichText::new("Save").size(16.0)))
                    .clicked()
                {
                    self.save_config(config);
                }

                if ui.button("Revert").clicked() {
                    self.load_draft(config);
                }

                if ui.button("Defaults").clicked() {
                    self.load_draft(&Config::default());
                    self.modified = true;
                }

                if self.modified {
                    ui.label(RichText::new("* Unsaved changes").color(Color32::YELLOW));
                }
            });

            if let Some((ref msg, is_error)) = self.status_message {
                ui.add_space(10.0);
                let color = if is_error {
                    Color32::LIGHT_RED
                } else {
                    Color32::LIGHT_GREEN
                };
                ui.label(RichText::new(msg).color(color));
            }

            ui.add_space(20.0);
            ui.separator();
            ui.add_space(15.0);

            ui.label(RichText::new("Current configuration").strong());
            ui.add_space(5.0);
            egui::Frame::new()
                .fill(Color32::from_gray(30))
                .inner_margin(10.0)
                .corner_radius(4.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(config.to_string()).monospace());
                });
        });
    }

    fn render_defaults(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Defaults").strong());
        ui.add_space(5.0);

        let mut changed = false;
        egui::Grid::new("defaults_grid")
            .num_columns(2)
            .spacing([20.0, 6.0])
            .show(ui, |ui| {
                ui.label("City:");
                egui::ComboBox::from_id_salt("default_city")
                    .selected_text(self.draft.default_city.clone())
                    .show_ui(ui, |ui| {
                        for city in city_names() {
                            changed |= ui
                                .selectable_value(&mut self.draft.default_city, city.to_string(), city)
                                .changed();
                        }
                    });
                ui.end_row();

                ui.label("Panel type:");
                ui.horizontal(|ui| {
                    for panel in PanelType::ALL {
                        changed |= ui
                            .selectable_value(&mut self.draft.default_panel_type, panel, panel.name())
                            .changed();
                    }
                });
                ui.end_row();

                ui.label("Obstruction detector:");
                ui.horizontal(|ui| {
                    for detector in DETECTORS {
                        changed |= ui
                            .selectable_value(&mut self.draft.detector, detector, detector.to_string())
                            .changed();
                    }
                });
                ui.end_row();
            });

        self.modified |= changed;
    }

    fn render_tariff(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Tariff").strong());
        ui.add_space(5.0);

        let mut changed = false;
        egui::Grid::new("tariff_grid")
            .num_columns(2)
            .spacing([20.0, 6.0])
            .show(ui, |ui| {
                ui.label("Electricity rate (INR/kWh):");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.draft.electricity_rate)
                            .speed(0.05)
                            .range(0.0..=100.0),
                    )
                    .changed();
                ui.end_row();

                ui.label("Installation cost (INR):");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.draft.installation_cost)
                            .speed(100.0)
                            .range(0.0..=10_000_000.0),
                    )
                    .changed();
                ui.end_row();
            });

        self.modified |= changed;
    }

    fn render_processing(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Processing and output").strong());
        ui.add_space(5.0);

        let mut changed = false;
        egui::Grid::new("processing_grid")
            .num_columns(2)
            .spacing([20.0, 6.0])
            .show(ui, |ui| {
                ui.label("Parallel jobs (0 = auto):");
                changed |= ui
                    .add(egui::DragValue::new(&mut self.draft.jobs).range(0..=64))
                    .changed();
                ui.end_row();

                ui.label("Cache:");
                changed |= ui.checkbox(&mut self.draft.cache_enabled, "enabled").changed();
                ui.end_row();

                ui.label("Output directory:");
                changed |= ui.text_edit_singleline(&mut self.output_dir_input).changed();
                ui.end_row();

                ui.label("Log directory:");
                changed |= ui.text_edit_singleline(&mut self.log_dir_input).changed();
                ui.end_row();

                ui.label("Log file:");
                changed |= ui.checkbox(&mut self.draft.log_to_file, "write solar_analysis.log").changed();
                ui.end_row();
            });

        self.modified |= changed;
    }

    fn save_config(&mut self, config: &mut Config) {
        let output_dir = self.output_dir_input.trim();
        let log_dir = self.log_dir_input.trim();
        if output_dir.is_empty() || log_dir.is_empty() {
            self.status_message = Some(("Directories must not be empty".to_string(), true));
            return;
        }
        self.draft.output_dir = PathBuf::from(output_dir);
        self.draft.log_dir = PathBuf::from(log_dir);

        match self.draft.save() {
            Ok(()) => {
                *config = self.draft.clone();
                self.modified = false;
                self.status_message = Some(("Settings saved".to_string(), false));
            }
            Err(e) => {
                self.status_message = Some((format!("Save failed: {}", e), true));
            }
        }
    }
}
