//! Command handlers

use crate::cli::{Cli, Commands, RunArgs};
use crate::output::{print_batch, print_cities, print_exports, print_panels};
use indicatif::{ProgressBar, ProgressStyle};
use solar_app::app::{
    analyze_rooftops, AnalysisContext, AnalysisOptions, AnalysisServiceError, ProgressCallback,
};
use solar_app::config::Config;
use solar_app::export::{export_all, export_results};
use solar_app::logging::init_logging;
use solar_app::scanner::scan_directory;
use solar_types::{CacheError, Error, ExportFormat, OutputFormat, PanelType, Result};
use solar_vision::{generate_sample_rooftop_image, Cache, DetectorKind};
use std::path::PathBuf;
use tracing::debug;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let config = Config::load()?;

    let log_dir = config.log_to_file.then(|| config.log_dir.clone());
    let log_file = init_logging(log_dir.as_deref(), cli.verbose);
    if let Some(path) = log_file {
        debug!(path = %path.display(), "Logging to file");
    }

    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Analyze { images, run } => {
            cmd_analyze(&cli, &config, images.clone(), run, output_format)
        }

        Commands::Batch { folder, run } => {
            let images = scan_directory(folder)?;
            if images.is_empty() {
                return Err(Error::FileNotFound(format!(
                    "No images found in {}",
                    folder.display()
                )));
            }
            cmd_analyze(&cli, &config, images, run, output_format)
        }

        Commands::Export {
            results,
            to,
            output,
        } => cmd_export(results.clone(), *to, output.clone()),

        Commands::Config {
            show,
            set_city,
            set_panel,
            set_detector,
            set_jobs,
            set_cache,
            set_output,
            set_rate,
            set_installation_cost,
            set_output_dir,
            set_log_dir,
            set_log_file,
            reset,
        } => cmd_config(ConfigUpdate {
            show: *show,
            city: set_city.clone(),
            panel: *set_panel,
            detector: *set_detector,
            jobs: *set_jobs,
            cache: *set_cache,
            output: *set_output,
            rate: *set_rate,
            installation_cost: *set_installation_cost,
            output_dir: set_output_dir.clone(),
            log_dir: set_log_dir.clone(),
            log_file: *set_log_file,
            reset: *reset,
        }),

        Commands::Cache { clear, stats } => cmd_cache(&config, *clear, *stats),

        Commands::Cities => print_cities(output_format),

        Commands::Panels => print_panels(output_format),

        Commands::Sample { path } => cmd_sample(path.clone()),
    }
}

fn service_error(err: AnalysisServiceError) -> Error {
    match err {
        AnalysisServiceError::NoImages
        | AnalysisServiceError::NoValidImages
        | AnalysisServiceError::InputMismatch { .. } => Error::InvalidInput(err.to_string()),
        other => Error::AnalysisFailed(other.to_string()),
    }
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(e) => debug!(error = %e, "Falling back to default progress style"),
    }
    pb
}

fn cmd_analyze(
    cli: &Cli,
    config: &Config,
    images: Vec<PathBuf>,
    run: &RunArgs,
    output_format: OutputFormat,
) -> Result<()> {
    let mut options = AnalysisOptions::new().with_cache(!run.no_cache);
    if let Some(jobs) = run.jobs {
        options = options.with_jobs(jobs);
    }
    if let Some(date) = run.date {
        options = options.with_date(date);
    }

    let context = AnalysisContext::from_config(config, &options).map_err(service_error)?;

    if cli.verbose {
        eprintln!(
            "Analyzing {} image(s) with {} parallel jobs (detector: {}, cache: {})",
            images.len(),
            context.jobs(),
            context.detector_name(),
            if !run.no_cache && config.cache_enabled { "on" } else { "off" }
        );
    }

    let pb = (images.len() > 1).then(|| progress_bar(images.len()));
    let callback = pb.clone().map(|pb| {
        move |done: usize, _total: usize| {
            pb.set_position(done as u64);
        }
    });

    let batch = analyze_rooftops(
        &images,
        &run.cities,
        &run.panels,
        &context,
        callback.as_ref().map(|c| c as &ProgressCallback<'_>),
    );
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let batch = batch.map_err(service_error)?;

    print_batch(output_format, &batch)?;

    if !run.no_export {
        let output_dir = run
            .output_dir
            .clone()
            .unwrap_or_else(|| config.output_dir.clone());
        let files = export_all(&batch, &output_dir)?;
        print_exports(output_format, &files);
    }

    Ok(())
}

fn cmd_export(results_path: PathBuf, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let written = export_results(&results_path, format, output.as_deref())?;
    println!("Exported to: {}", written.display());
    Ok(())
}

/// Values given to `config`
struct ConfigUpdate {
    show: bool,
    city: Option<String>,
    panel: Option<PanelType>,
    detector: Option<DetectorKind>,
    jobs: Option<usize>,
    cache: Option<bool>,
    output: Option<OutputFormat>,
    rate: Option<f64>,
    installation_cost: Option<f64>,
    output_dir: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    log_file: Option<bool>,
    reset: bool,
}

fn cmd_config(update: ConfigUpdate) -> Result<()> {
    if update.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(city) = update.city {
        config.default_city = city.trim().to_string();
        modified = true;
    }

    if let Some(panel) = update.panel {
        config.default_panel_type = panel;
        modified = true;
    }

    if let Some(detector) = update.detector {
        config.detector = detector;
        modified = true;
    }

    if let Some(jobs) = update.jobs {
        config.jobs = jobs;
        modified = true;
    }

    if let Some(cache_enabled) = update.cache {
        config.cache_enabled = cache_enabled;
        modified = true;
    }

    if let Some(output_format) = update.output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(rate) = update.rate {
        config.electricity_rate = rate;
        modified = true;
    }

    if let Some(cost) = update.installation_cost {
        config.installation_cost = cost;
        modified = true;
    }

    if let Some(dir) = update.output_dir {
        config.output_dir = dir;
        modified = true;
    }

    if let Some(dir) = update.log_dir {
        config.log_dir = dir;
        modified = true;
    }

    if let Some(enabled) = update.log_file {
        config.log_to_file = enabled;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if update.show || !modified {
        println!("{}", config);
    }

    Ok(())
}

fn cmd_cache(config: &Config, clear: bool, stats: bool) -> Result<()> {
    if !config.cache_enabled {
        return Err(Error::Cache(CacheError::IoError(
            "Cache is disabled. Enable with: solar-rooftop config --set-cache true".to_string(),
        )));
    }

    let cache = Cache::new(config.cache_dir()?)?;

    if clear {
        let count = cache.clear()?;
        println!("Cleared {} cached entries", count);
    }

    if stats || !clear {
        let stats = cache.stats()?;
        println!("{}", stats.display());
    }

    Ok(())
}

fn cmd_sample(path: PathBuf) -> Result<()> {
    generate_sample_rooftop_image(&path)?;
    println!("Sample rooftop image written to: {}", path.display());
    println!("Try: solar-rooftop analyze {}", path.display());
    Ok(())
}
