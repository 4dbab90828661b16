//! Analyze panel for solar-rooftop GUI
//!
//! Provides image selection, city and panel choice, analysis execution,
//! and result display.

use eframe::egui::{self, Color32, RichText, Ui};
use solar_app::app::{analyze_rooftops, AnalysisContext, AnalysisOptions};
use solar_app::config::Config;
use solar_app::constants::city_names;
use solar_app::export::{export_all, ExportedFiles};
use solar_app::report::{build_batch_charts, format_text_report, Charts};
use solar_app::scanner::IMAGE_EXTENSIONS;
use solar_types::PanelType;
use solar_vision::generate_sample_rooftop_image;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Instant;
use tracing::warn;

use crate::charts::{bar_chart, line_chart};

/// Everything shown after a finished run
pub struct RunOutput {
    report: String,
    charts: Option<Charts>,
    exported: Option<ExportedFiles>,
    export_error: Option<String>,
}

/// Status message from analysis thread
pub enum AnalysisStatus {
    /// One more rooftop finished
    Progress { done: usize, total: usize },
    /// Writing report files
    Exporting,
    /// Completed successfully
    Completed(Box<RunOutput>),
    /// Failed with error
    Failed(String),
}

/// Panel for analyzing rooftop images
pub struct AnalyzePanel {
    /// Selected image paths, in upload order
    selected_images: Vec<PathBuf>,
    /// Selected cities, in click order
    selected_cities: Vec<String>,
    /// Selected panel types, in click order
    selected_panels: Vec<PanelType>,
    /// Output of the last run
    output: Option<RunOutput>,
    /// Error message (if any)
    error: Option<String>,
    /// Whether analysis is in progress
    is_analyzing: bool,
    /// Receiver for analysis status from background thread
    status_receiver: Option<Receiver<AnalysisStatus>>,
    /// Current status message
    current_status: Option<String>,
    /// Analysis start time
    start_time: Option<Instant>,
}

impl AnalyzePanel {
    pub fn new(config: &Config) -> Self {
        Self {
            selected_images: Vec::new(),
            selected_cities: vec![config.default_city.clone()],
            selected_panels: vec![config.default_panel_type],
            output: None,
            error: None,
            is_analyzing: false,
            status_receiver: None,
            current_status: None,
            start_time: None,
        }
    }

    /// Render the analyze panel UI
    pub fn ui(&mut self, ui: &mut Ui, config: &Config) {
        // Check for status updates from background thread
        self.poll_status(ui.ctx());

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Solar Rooftop Analysis");
            ui.label(
                RichText::new(
                    "Upload satellite images (PNG/JPG/JPEG). Select one city and panel type \
                     for all images, or one per image.",
                )
                .color(Color32::GRAY),
            );
            ui.add_space(10.0);

            self.render_image_selection(ui, config);

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(10.0);

            self.render_inputs(ui);

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(10.0);

            self.render_analyze_button(ui, config);

            self.render_error(ui);

            ui.add_space(10.0);
            self.render_results(ui);
        });
    }

    fn finish(&mut self) {
        self.is_analyzing = false;
        self.status_receiver = None;
        self.current_status = None;
        self.start_time = None;
    }

    /// Poll for status updates from background analysis thread
    fn poll_status(&mut self, ctx: &egui::Context) {
        let Some(receiver) = self.status_receiver.take() else {
            return;
        };

        loop {
            match receiver.try_recv() {
                Ok(AnalysisStatus::Progress { done, total }) => {
                    self.current_status = Some(format!("Analyzed rooftop {} of {}", done, total));
                }
                Ok(AnalysisStatus::Exporting) => {
                    self.current_status = Some("Writing PDF, CSV, Excel and JSON...".to_string());
                }
                Ok(AnalysisStatus::Completed(output)) => {
                    self.output = Some(*output);
                    self.finish();
                    return;
                }
                Ok(AnalysisStatus::Failed(e)) => {
                    self.error = Some(format!("Error: {}", e));
                    self.finish();
                    return;
                }
                Err(std::sync::mpsc::TryRecvError::Empty) => {
                    // No more messages, request repaint to check again
                    self.status_receiver = Some(receiver);
                    ctx.request_repaint();
                    return;
                }
                Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                    self.error = Some("Analysis thread stopped unexpectedly".to_string());
                    self.finish();
                    return;
                }
            }
        }
    }

    /// Render the image selection section
    fn render_image_selection(&mut self, ui: &mut Ui, config: &Config) {
        let enabled = !self.is_analyzing;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(enabled, egui::Button::new("Select images..."))
                .clicked()
            {
                if let Some(paths) = rfd::FileDialog::new()
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_files()
                {
                    self.selected_images = paths;
                    self.output = None;
                    self.error = None;
                }
            }

            if ui
                .add_enabled(enabled, egui::Button::new("Use sample image"))
                .clicked()
            {
                let path = config.output_dir.join("sample_rooftop.png");
                match generate_sample_rooftop_image(&path) {
                    Ok(()) => {
                        self.selected_images = vec![path];
                        self.output = None;
                        self.error = None;
                    }
                    Err(e) => {
                        warn!(error = %e, "Sample image generation failed");
                        self.error = Some(format!("Could not create sample image: {}", e));
                    }
                }
            }

            if ui
                .add_enabled(enabled && !self.selected_images.is_empty(), egui::Button::new("Clear"))
                .clicked()
            {
                self.selected_images.clear();
            }
        });

        ui.add_space(5.0);
        if self.selected_images.is_empty() {
            ui.label(
                RichText::new("No images selected")
                    .italics()
                    .color(Color32::GRAY),
            );
        } else {
            for (i, path) in self.selected_images.iter().enumerate() {
                ui.label(
                    RichText::new(format!("{}. {}", i + 1, path.display()))
                        .monospace()
                        .color(Color32::LIGHT_BLUE),
                );
            }
        }
    }

    /// City and panel multi-select. Order of selection decides the pairing.
    fn render_inputs(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Cities").strong());
        ui.horizontal_wrapped(|ui| {
            for city in city_names() {
                let position = self.selected_cities.iter().position(|c| c == city);
                let text = match position {
                    Some(i) => format!("{} ({})", city, i + 1),
                    None => city.to_string(),
                };
                if ui.selectable_label(position.is_some(), text).clicked() {
                    match position {
                        Some(i) => {
                            self.selected_cities.remove(i);
                        }
                        None => self.selected_cities.push(city.to_string()),
                    }
                }
            }
        });

        ui.add_space(8.0);
        ui.label(RichText::new("Panel types").strong());
        ui.horizontal(|ui| {
            for panel in PanelType::ALL {
                let position = self.selected_panels.iter().position(|p| *p == panel);
                let text = match position {
                    Some(i) => format!("{} ({})", panel, i + 1),
                    None => panel.to_string(),
                };
                if ui.selectable_label(position.is_some(), text).clicked() {
                    match position {
                        Some(i) => {
                            self.selected_panels.remove(i);
                        }
                        None => self.selected_panels.push(panel),
                    }
                }
            }
        });
    }

    /// Render the analyze button and progress
    fn render_analyze_button(&mut self, ui: &mut Ui, config: &Config) {
        let can_analyze = !self.selected_images.is_empty() && !self.is_analyzing;

        ui.horizontal(|ui| {
            let button_text = if self.is_analyzing {
                "Analyzing..."
            } else {
                "Analyze"
            };
            let button = egui::Button::new(RichText::new(button_text).size(16.0));

            if ui.add_enabled(can_analyze, button).clicked() {
                self.start_analysis(ui.ctx(), config);
            }

            if self.is_analyzing {
                ui.spinner();
            }
        });

        if self.is_analyzing {
            ui.add_space(8.0);
            egui::Frame::new()
                .fill(Color32::from_gray(30))
                .inner_margin(10.0)
                .corner_radius(4.0)
                .show(ui, |ui| {
                    if let Some(start) = self.start_time {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("Elapsed:").strong());
                            ui.label(format!("{:.1} s", start.elapsed().as_secs_f32()));
                        });
                    }
                    if let Some(ref status) = self.current_status {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("Status:").strong());
                            ui.label(RichText::new(status).color(Color32::LIGHT_BLUE));
                        });
                    }
                });
        }
    }

    /// Start analysis in a background thread
    fn start_analysis(&mut self, ctx: &egui::Context, config: &Config) {
        self.is_analyzing = true;
        self.error = None;
        self.output = None;
        self.start_time = Some(Instant::now());
        self.current_status = Some("Preparing...".to_string());

        let (sender, receiver): (Sender<AnalysisStatus>, Receiver<AnalysisStatus>) = channel();
        self.status_receiver = Some(receiver);

        // Clone data for thread
        let images = self.selected_images.clone();
        let cities = self.selected_cities.clone();
        let panels = self.selected_panels.clone();
        let config = config.clone();
        let ctx = ctx.clone();

        thread::spawn(move || {
            let status = match run_analysis(&config, &images, &cities, &panels, &sender, &ctx) {
                Ok(output) => AnalysisStatus::Completed(Box::new(output)),
                Err(e) => AnalysisStatus::Failed(e),
            };
            let _ = sender.send(status);
            ctx.request_repaint();
        });
    }

    fn render_error(&self, ui: &mut Ui) {
        if let Some(ref error) = self.error {
            ui.add_space(8.0);
            ui.label(RichText::new(error).color(Color32::from_rgb(255, 100, 100)));
            ui.label(
                RichText::new("Ensure valid images and matching inputs.")
                    .color(Color32::GRAY)
                    .small(),
            );
        }
    }

    fn render_results(&self, ui: &mut Ui) {
        let Some(ref output) = self.output else {
            return;
        };

        if let Some(ref charts) = output.charts {
            ui.horizontal_wrapped(|ui| {
                ui.vertical(|ui| bar_chart(ui, &charts.bar));
                ui.add_space(16.0);
                ui.vertical(|ui| line_chart(ui, &charts.line));
            });
            ui.add_space(10.0);
        }

        ui.label(RichText::new("Exports").strong());
        match (&output.exported, &output.export_error) {
            (Some(files), _) => {
                for (format, path) in files.iter() {
                    ui.horizontal(|ui| {
                        ui.label(format!("{}:", format.to_string().to_uppercase()));
                        ui.label(RichText::new(path.display().to_string()).monospace());
                    });
                }
            }
            (None, Some(e)) => {
                ui.label(RichText::new(format!("Export failed: {}", e)).color(Color32::YELLOW));
            }
            (None, None) => {}
        }

        ui.add_space(10.0);
        ui.label(RichText::new("Results").strong());
        egui::Frame::new()
            .fill(Color32::from_gray(30))
            .inner_margin(10.0)
            .corner_radius(4.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&output.report).monospace());
            });
    }
}

/// Run the pipeline and write exports; runs on the worker thread
fn run_analysis(
    config: &Config,
    images: &[PathBuf],
    cities: &[String],
    panels: &[PanelType],
    sender: &Sender<AnalysisStatus>,
    ctx: &egui::Context,
) -> Result<RunOutput, String> {
    let context = AnalysisContext::from_config(config, &AnalysisOptions::new())
        .map_err(|e| e.to_string())?;

    let progress_sender = sender.clone();
    let progress_ctx = ctx.clone();
    let progress = move |done: usize, total: usize| {
        let _ = progress_sender.send(AnalysisStatus::Progress { done, total });
        progress_ctx.request_repaint();
    };

    let batch = analyze_rooftops(images, cities, panels, &context, Some(&progress))
        .map_err(|e| e.to_string())?;

    let _ = sender.send(AnalysisStatus::Exporting);
    let (exported, export_error) = match export_all(&batch, &config.output_dir) {
        Ok(files) => (Some(files), None),
        Err(e) => (None, Some(e.to_string())),
    };

    Ok(RunOutput {
        report: format_text_report(&batch),
        charts: build_batch_charts(&batch),
        exported,
        export_error,
    })
}
