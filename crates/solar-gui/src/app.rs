//! Main application structure with tab navigation

use eframe::egui;
use solar_app::config::Config;

use crate::analyze_panel::AnalyzePanel;
use crate::settings_panel::SettingsPanel;

/// Application tab selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Analyze,
    Settings,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Analyze => "Analyze",
            Tab::Settings => "Settings",
        }
    }
}

/// Main application state
pub struct SolarApp {
    /// Currently selected tab
    current_tab: Tab,
    /// Analyze panel state
    analyze_panel: AnalyzePanel,
    /// Settings panel state
    settings_panel: SettingsPanel,
    /// Application configuration
    config: Config,
}

impl SolarApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        // The bundled fonts lack the rupee sign; add a system fallback
        let mut fonts = egui::FontDefinitions::default();
        if let Some(font_data) = Self::load_system_font() {
            fonts.font_data.insert(
                "fallback".to_owned(),
                egui::FontData::from_owned(font_data).into(),
            );
            for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                fonts
                    .families
                    .entry(family)
                    .or_default()
                    .push("fallback".to_owned());
            }
        }
        cc.egui_ctx.set_fonts(fonts);

        let mut style = (*cc.egui_ctx.style()).clone();
        style.interaction.tooltip_delay = 0.5;
        style.animation_time = 0.1;
        cc.egui_ctx.set_style(style);

        let analyze_panel = AnalyzePanel::new(&config);
        let settings_panel = SettingsPanel::new(&config);

        Self {
            current_tab: Tab::default(),
            analyze_panel,
            settings_panel,
            config,
        }
    }

    fn load_system_font() -> Option<Vec<u8>> {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
            "C:/Windows/Fonts/segoeui.ttf",
            "C:/Windows/Fonts/arial.ttf",
        ];

        font_paths.iter().find_map(|path| std::fs::read(path).ok())
    }

    /// Render the tab bar
    fn render_tab_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;

            for tab in [Tab::Analyze, Tab::Settings] {
                let selected = self.current_tab == tab;
                if ui.selectable_label(selected, tab.label()).clicked() {
                    self.current_tab = tab;
                }
                ui.add_space(8.0);
            }
        });
    }
}

impl eframe::App for SolarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_tab_bar(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.current_tab {
            Tab::Analyze => {
                self.analyze_panel.ui(ui, &self.config);
            }
            Tab::Settings => {
                self.settings_panel.ui(ui, &mut self.config);
            }
        });
    }
}
