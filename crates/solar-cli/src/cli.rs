//! CLI definition using clap

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use solar_types::{ExportFormat, OutputFormat, PanelType};
use solar_vision::DetectorKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "solar-rooftop")]
#[command(version)]
#[command(about = "Rooftop solar potential, ROI and recommendations from satellite images")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Inputs shared by `analyze` and `batch`
#[derive(clap::Args, Clone)]
pub struct RunArgs {
    /// City for all images, or one per image (repeatable)
    #[arg(long = "city", short = 'c')]
    pub cities: Vec<String>,

    /// Panel type for all images, or one per image (repeatable)
    #[arg(long = "panel", short = 'p', value_enum)]
    pub panels: Vec<PanelType>,

    /// Skip cache lookup (overrides config)
    #[arg(long)]
    pub no_cache: bool,

    /// Do not write report files
    #[arg(long)]
    pub no_export: bool,

    /// Directory for report files. Uses config value if not specified.
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Number of parallel analyses. 0 = auto (CPU count).
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Date for the irradiance estimate (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one or more rooftop images
    Analyze {
        /// Image files (png, jpg, jpeg)
        #[arg(required = true)]
        images: Vec<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Analyze every image in a folder
    Batch {
        /// Path to folder containing images
        folder: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Re-export a saved JSON results file
    Export {
        /// Path to JSON results file
        results: PathBuf,

        /// Target format
        #[arg(long, value_enum, default_value = "pdf")]
        to: ExportFormat,

        /// Output file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default city
        #[arg(long)]
        set_city: Option<String>,

        /// Set default panel type
        #[arg(long, value_enum)]
        set_panel: Option<PanelType>,

        /// Set obstruction detector (vegetation, none)
        #[arg(long)]
        set_detector: Option<DetectorKind>,

        /// Set default number of parallel analyses (0 = auto)
        #[arg(long)]
        set_jobs: Option<usize>,

        /// Enable/disable cache
        #[arg(long)]
        set_cache: Option<bool>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set electricity rate (INR/kWh)
        #[arg(long)]
        set_rate: Option<f64>,

        /// Set fixed installation cost (INR)
        #[arg(long)]
        set_installation_cost: Option<f64>,

        /// Set report directory
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// Set log directory
        #[arg(long)]
        set_log_dir: Option<PathBuf>,

        /// Enable/disable the log file
        #[arg(long)]
        set_log_file: Option<bool>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Manage cache
    Cache {
        /// Clear all cache
        #[arg(long)]
        clear: bool,

        /// Show cache statistics
        #[arg(long)]
        stats: bool,
    },

    /// List supported cities
    Cities,

    /// List panel types with efficiency and prices
    Panels,

    /// Write a synthetic rooftop image for trying the tool
    Sample {
        /// Output PNG path
        #[arg(default_value = "sample_rooftop.png")]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repeated_city_and_panel() {
        let cli = Cli::try_parse_from([
            "solar-rooftop",
            "analyze",
            "a.png",
            "b.png",
            "-c",
            "Mumbai",
            "--city",
            "Pune",
            "-p",
            "bifacial",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze { images, run } => {
                assert_eq!(images.len(), 2);
                assert_eq!(run.cities, vec!["Mumbai".to_string(), "Pune".to_string()]);
                assert_eq!(run.panels, vec![PanelType::Bifacial]);
                assert!(!run.no_export);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_export_target() {
        let cli = Cli::try_parse_from(["solar-rooftop", "-f", "json", "export", "r.json", "--to", "excel"])
            .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Export { to, .. } => assert_eq!(to, ExportFormat::Excel),
            _ => panic!("expected export"),
        }
    }
}
