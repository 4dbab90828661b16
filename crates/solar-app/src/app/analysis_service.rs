//! Analysis Service - batch rooftop analysis
//!
//! Orchestrates the workflow for a set of uploaded images:
//! 1. Validate the inputs and drop unusable images
//! 2. Pair every image with a city and a panel type
//! 3. Detect rooftop features (cached by image content)
//! 4. Estimate irradiance, yield and ROI
//! 5. Generate recommendations
//!
//! Rooftops are processed on a rayon pool; results keep input order.

use crate::config::Config;
use crate::constants::{resolve_city, PanelCatalog};
use crate::scanner::filter_valid_images;
use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use solar_domain::model::Tariff;
use solar_domain::service::{calculate_solar_potential, estimate_roi, generate_recommendations};
use solar_types::{BatchResults, Error, PanelType, RooftopAnalysis, RooftopRecord, RooftopResult};
use solar_vision::{analyze_rooftop_image, Cache, IrradianceService, ObstructionDetector};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that stop a whole batch
#[derive(Debug, Error)]
pub enum AnalysisServiceError {
    #[error("No images uploaded. Please upload at least one rooftop image.")]
    NoImages,

    #[error("No valid image files found. Supported formats: png, jpg, jpeg (max 10 MB).")]
    NoValidImages,

    #[error(
        "Input mismatch: {images} images, {cities} cities, {panels} panel types. \
         Give one city and panel type for all images or one per image."
    )]
    InputMismatch {
        images: usize,
        cities: usize,
        panels: usize,
    },

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<Error> for AnalysisServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::AnalysisFailed(msg) => AnalysisServiceError::AnalysisFailed(msg),
            Error::Cache(e) => AnalysisServiceError::CacheError(e.to_string()),
            Error::Config(e) => AnalysisServiceError::ConfigError(e.to_string()),
            _ => AnalysisServiceError::AnalysisFailed(err.to_string()),
        }
    }
}

/// Called with (finished, total) after each rooftop
pub type ProgressCallback<'a> = dyn Fn(usize, usize) + Send + Sync + 'a;

/// Options for analysis
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Whether to use the record cache
    pub use_cache: bool,

    /// Worker threads; overrides the configured value
    pub jobs: Option<usize>,

    /// Date used for irradiance; today when unset
    pub date: Option<NaiveDate>,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self {
            use_cache: true,
            ..Default::default()
        }
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Everything a rooftop needs besides its own inputs
pub struct AnalysisContext {
    detector: Box<dyn ObstructionDetector>,
    irradiance: IrradianceService,
    catalog: PanelCatalog,
    cache: Option<Cache>,
    tariff: Tariff,
    default_city: String,
    default_panel: PanelType,
    jobs: usize,
    date: NaiveDate,
}

impl AnalysisContext {
    /// Context with stock tables, no record cache and automatic thread count
    pub fn new(detector: Box<dyn ObstructionDetector>) -> Self {
        Self {
            detector,
            irradiance: IrradianceService::default(),
            catalog: PanelCatalog::default(),
            cache: None,
            tariff: Tariff::default(),
            default_city: crate::constants::DEFAULT_CITY.to_string(),
            default_panel: PanelType::default(),
            jobs: num_cpus::get(),
            date: Utc::now().date_naive(),
        }
    }

    pub fn from_config(
        config: &Config,
        options: &AnalysisOptions,
    ) -> Result<Self, AnalysisServiceError> {
        let cache = if options.use_cache && config.cache_enabled {
            Some(Cache::new(config.cache_dir()?)?)
        } else {
            None
        };

        let mut context = Self::new(config.detector.build())
            .with_tariff(config.tariff())
            .with_defaults(config.default_city.clone(), config.default_panel_type)
            .with_jobs(options.jobs.unwrap_or_else(|| config.job_count()));
        context.cache = cache;
        if let Some(date) = options.date {
            context = context.with_date(date);
        }
        Ok(context)
    }

    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_tariff(mut self, tariff: Tariff) -> Self {
        self.tariff = tariff;
        self
    }

    pub fn with_defaults(mut self, city: String, panel: PanelType) -> Self {
        self.default_city = city;
        self.default_panel = panel;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }
}

/// One image with the city and panel type it is evaluated for
#[derive(Debug, Clone, PartialEq)]
pub struct RooftopJob {
    pub image_path: PathBuf,
    pub city: String,
    pub panel_type: PanelType,
}

/// Stretch a per-image list: empty uses the default, one entry applies to
/// every image, otherwise there must be exactly one per image.
fn broadcast<T: Clone>(values: &[T], default: T, count: usize) -> Option<Vec<T>> {
    match values.len() {
        0 => Some(vec![default; count]),
        1 => Some(vec![values[0].clone(); count]),
        n if n == count => Some(values.to_vec()),
        _ => None,
    }
}

/// Validate inputs and pair every usable image with a city and panel type
pub fn plan_jobs(
    images: &[PathBuf],
    cities: &[String],
    panels: &[PanelType],
    context: &AnalysisContext,
) -> Result<Vec<RooftopJob>, AnalysisServiceError> {
    if images.is_empty() {
        return Err(AnalysisServiceError::NoImages);
    }

    let valid = filter_valid_images(images);
    if valid.is_empty() {
        return Err(AnalysisServiceError::NoValidImages);
    }

    let cities: Vec<String> = cities
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    let mismatch = || AnalysisServiceError::InputMismatch {
        images: valid.len(),
        cities: cities.len(),
        panels: panels.len(),
    };
    let city_list =
        broadcast(&cities, context.default_city.clone(), valid.len()).ok_or_else(mismatch)?;
    let panel_list = broadcast(panels, context.default_panel, valid.len()).ok_or_else(mismatch)?;

    Ok(valid
        .into_iter()
        .zip(city_list)
        .zip(panel_list)
        .map(|((image_path, city), panel_type)| RooftopJob {
            image_path,
            city,
            panel_type,
        })
        .collect())
}

fn detect_features(image_path: &Path, context: &AnalysisContext) -> solar_types::Result<RooftopRecord> {
    let detector = context.detector.name();

    if let Some(cache) = &context.cache {
        match cache.get(image_path, detector) {
            Ok(Some(record)) => {
                info!(image = %image_path.display(), "Using cached rooftop record");
                return Ok(record);
            }
            Ok(None) => {}
            Err(e) => warn!(image = %image_path.display(), error = %e, "Ignoring cache entry"),
        }
    }

    let record = analyze_rooftop_image(image_path, context.detector.as_ref())?;

    if let Some(cache) = &context.cache {
        if let Err(e) = cache.set(image_path, detector, &record) {
            warn!(image = %image_path.display(), error = %e, "Failed to cache rooftop record");
        }
    }
    Ok(record)
}

fn analyze_job(
    job: &RooftopJob,
    context: &AnalysisContext,
) -> solar_types::Result<(RooftopAnalysis, Vec<String>)> {
    let city = resolve_city(&job.city)?;

    let record = detect_features(&job.image_path, context)?;
    let panel = context.catalog.fetch(job.panel_type);
    let sun_hours = city.peak_sun_hours;
    let irradiance = context.irradiance.fetch(city.latitude, city.longitude, context.date);

    let potential = calculate_solar_potential(record.area_m2, record.orientation, &panel, sun_hours)
        .map_err(|e| Error::AnalysisFailed(format!("Solar potential: {}", e)))?;
    let roi = estimate_roi(potential.annual_energy_kwh, &panel, sun_hours, &context.tariff)
        .map_err(|e| Error::AnalysisFailed(format!("ROI estimate: {}", e)))?;
    let recommendations = generate_recommendations(&record, job.panel_type, panel.efficiency);

    let analysis = RooftopAnalysis {
        city: city.name.to_string(),
        area_m2: record.area_m2,
        orientation: record.orientation,
        obstructions: record.obstructions_label(),
        surface_type: record.surface_type,
        suitability: record.suitability,
        panel_type: job.panel_type,
        irradiance,
        annual_energy_kwh: potential.annual_energy_kwh,
        monthly_energy_kwh: potential.monthly_energy_kwh,
        system_size_kw: roi.system_size_kw,
        total_cost_inr: roi.total_cost_inr,
        annual_savings_inr: roi.annual_savings_inr,
        monthly_savings_inr: roi.monthly_savings_inr,
        payback_period_years: roi.payback_period_years,
    };
    Ok((analysis, recommendations))
}

fn failure_message(err: &Error) -> String {
    match err {
        Error::AnalysisFailed(reason) => format!("Analysis failed: {}", reason),
        other => format!("Analysis failed: {}", other),
    }
}

/// Analyze one rooftop. Failures are folded into the result.
///
/// `index` is zero-based; the result carries `index + 1`.
pub fn process_rooftop(index: usize, job: &RooftopJob, context: &AnalysisContext) -> RooftopResult {
    let rooftop_id = index + 1;
    let image_path = job.image_path.display().to_string();
    let start = Instant::now();

    match analyze_job(job, context) {
        Ok((analysis, recommendations)) => {
            info!(
                rooftop = rooftop_id,
                city = %job.city,
                panel = %job.panel_type,
                elapsed_s = start.elapsed().as_secs_f64(),
                "Rooftop analyzed"
            );
            RooftopResult::success(rooftop_id, image_path, analysis, recommendations)
        }
        Err(e) => {
            error!(rooftop = rooftop_id, image = %image_path, error = %e, "Rooftop analysis failed");
            RooftopResult::failure(rooftop_id, image_path, failure_message(&e))
        }
    }
}

/// Main entry point: analyze a set of rooftop images
///
/// # Arguments
/// * `images` - Uploaded image paths
/// * `cities` - Empty, one city for all images, or one per image
/// * `panels` - Empty, one panel type for all images, or one per image
/// * `context` - Detector, caches, tariff and defaults
/// * `progress` - Optional callback invoked once per finished rooftop
pub fn analyze_rooftops(
    images: &[PathBuf],
    cities: &[String],
    panels: &[PanelType],
    context: &AnalysisContext,
    progress: Option<&ProgressCallback<'_>>,
) -> Result<BatchResults, AnalysisServiceError> {
    let started_at = Utc::now();
    let start = Instant::now();

    let jobs = plan_jobs(images, cities, panels, context)?;
    let total = jobs.len();
    info!(
        rooftops = total,
        skipped = images.len() - total,
        workers = context.jobs,
        detector = context.detector_name(),
        "Starting batch analysis"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(context.jobs)
        .build()
        .map_err(|e| AnalysisServiceError::AnalysisFailed(format!("Worker pool: {}", e)))?;

    let finished = AtomicUsize::new(0);
    let results: Vec<RooftopResult> = pool.install(|| {
        jobs.par_iter()
            .enumerate()
            .map(|(index, job)| {
                let result = process_rooftop(index, job, context);
                let done = finished.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(callback) = progress {
                    callback(done, total);
                }
                result
            })
            .collect()
    });

    let batch = BatchResults::new(results, started_at);
    info!(
        successful = batch.successful,
        failed = batch.failed,
        elapsed_s = start.elapsed().as_secs_f64(),
        "Batch analysis completed"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use solar_vision::NullDetector;
    use std::sync::Mutex;
    use tempfile::{tempdir, TempDir};

    fn context() -> AnalysisContext {
        AnalysisContext::new(Box::new(NullDetector))
            .with_jobs(2)
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap())
    }

    fn images(count: usize) -> (TempDir, Vec<PathBuf>) {
        let dir = tempdir().unwrap();
        let paths = (0..count)
            .map(|i| {
                let path = dir.path().join(format!("roof_{}.png", i));
                RgbImage::new(16, 16).save(&path).unwrap();
                path
            })
            .collect();
        (dir, paths)
    }

    #[test]
    fn test_broadcast_rules() {
        assert_eq!(broadcast::<u8>(&[], 7, 3), Some(vec![7, 7, 7]));
        assert_eq!(broadcast(&[1], 7, 3), Some(vec![1, 1, 1]));
        assert_eq!(broadcast(&[1, 2, 3], 7, 3), Some(vec![1, 2, 3]));
        assert_eq!(broadcast(&[1, 2], 7, 3), None);
        assert_eq!(broadcast(&[1, 2, 3, 4], 7, 3), None);
    }

    #[test]
    fn test_no_images() {
        let err = analyze_rooftops(&[], &[], &[], &context(), None).unwrap_err();
        assert!(matches!(err, AnalysisServiceError::NoImages));
        assert!(err.to_string().starts_with("No images uploaded"));
    }

    #[test]
    fn test_no_valid_images() {
        let dir = tempdir().unwrap();
        let text = dir.path().join("roof.txt");
        std::fs::write(&text, b"not an image").unwrap();

        let err = analyze_rooftops(&[text], &[], &[], &context(), None).unwrap_err();
        assert!(matches!(err, AnalysisServiceError::NoValidImages));
    }

    #[test]
    fn test_input_mismatch() {
        let (_dir, paths) = images(2);
        let cities = vec!["Mumbai".to_string(), "Pune".to_string(), "Jaipur".to_string()];
        let err = plan_jobs(&paths, &cities, &[], &context()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisServiceError::InputMismatch { images: 2, cities: 3, panels: 0 }
        ));
    }

    #[test]
    fn test_single_city_applies_to_all() {
        let (_dir, paths) = images(3);
        let jobs = plan_jobs(&paths, &["Chennai".to_string()], &[], &context()).unwrap();
        assert_eq!(jobs.len(), 3);
        assert!(jobs.iter().all(|j| j.city == "Chennai"));
        assert!(jobs.iter().all(|j| j.panel_type == PanelType::Monocrystalline));
    }

    #[test]
    fn test_unknown_city_fails_only_that_rooftop() {
        let (_dir, paths) = images(2);
        let cities = vec!["Mumbai".to_string(), "Atlantis".to_string()];
        let batch = analyze_rooftops(&paths, &cities, &[], &context(), None).unwrap();

        assert_eq!(batch.total_processed, 2);
        assert_eq!(batch.successful, 1);
        assert_eq!(batch.failed, 1);

        let failed = &batch.results[1];
        assert_eq!(failed.rooftop_id, 2);
        assert!(failed.error.as_deref().unwrap().starts_with("Analysis failed:"));
        assert_eq!(
            failed.recommendations,
            vec!["Check image quality or input data and retry.".to_string()]
        );
    }

    #[test]
    fn test_results_keep_input_order() {
        let (_dir, paths) = images(6);
        let panels = vec![
            PanelType::Monocrystalline,
            PanelType::Bifacial,
            PanelType::Perovskite,
            PanelType::Monocrystalline,
            PanelType::Bifacial,
            PanelType::Perovskite,
        ];
        let batch = analyze_rooftops(&paths, &[], &panels, &context(), None).unwrap();

        for (i, result) in batch.results.iter().enumerate() {
            assert_eq!(result.rooftop_id, i + 1);
            assert_eq!(result.image_path, paths[i].display().to_string());
            let analysis = result.analysis.as_ref().unwrap();
            assert_eq!(analysis.panel_type, panels[i]);
            assert_eq!(analysis.city, "New Delhi");
        }
    }

    #[test]
    fn test_progress_called_per_rooftop() {
        let (_dir, paths) = images(4);
        let seen = Mutex::new(Vec::new());
        let callback = |done: usize, total: usize| seen.lock().unwrap().push((done, total));

        analyze_rooftops(&paths, &[], &[], &context(), Some(&callback)).unwrap();

        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[test]
    fn test_city_stored_with_canonical_name() {
        let (_dir, paths) = images(1);
        let batch =
            analyze_rooftops(&paths, &["  jaipur ".to_string()], &[], &context(), None).unwrap();
        let analysis = batch.first_success().unwrap();
        assert_eq!(analysis.city, "Jaipur");
        assert_eq!(analysis.irradiance, context().irradiance.fetch(26.9124, 75.7873, context().date));
    }

    #[test]
    fn test_failure_message_has_single_prefix() {
        let domain = Error::AnalysisFailed("Solar potential: area must be positive".to_string());
        assert_eq!(
            failure_message(&domain),
            "Analysis failed: Solar potential: area must be positive"
        );

        let missing = Error::FileNotFound("roof.png".to_string());
        assert_eq!(failure_message(&missing), "Analysis failed: File not found: roof.png");
    }

    #[test]
    fn test_unreadable_image_fails_rooftop() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, b"not a png").unwrap();
        let job = RooftopJob {
            image_path: broken,
            city: "Pune".to_string(),
            panel_type: PanelType::Perovskite,
        };

        let result = process_rooftop(0, &job, &context());
        assert_eq!(result.rooftop_id, 1);
        let error = result.error.unwrap();
        assert!(error.starts_with("Analysis failed: Image processing error"));
        assert_eq!(error.matches("Analysis failed").count(), 1);
    }

    #[test]
    fn test_capped_energy_and_payback() {
        let (_dir, paths) = images(1);
        let batch = analyze_rooftops(&paths, &[], &[], &context(), None).unwrap();
        let analysis = batch.first_success().unwrap();

        // 100 m² × 0.247 × 5.2 × 365 is above the limit
        assert_eq!(analysis.annual_energy_kwh, 10_000.0);
        assert_eq!(analysis.annual_savings_inr, 78_000.0);
        assert_eq!(analysis.suitability, 8);
        assert_eq!(analysis.obstructions, "none");
        assert!(analysis.payback_period_years.unwrap() >= 3.0);
    }

    #[test]
    fn test_cache_reused() {
        let (dir, paths) = images(1);
        let cache = Cache::new(dir.path().join("cache")).unwrap();
        let ctx = context().with_cache(cache);

        analyze_rooftops(&paths, &[], &[], &ctx, None).unwrap();
        let stats = Cache::new(dir.path().join("cache")).unwrap().stats().unwrap();
        assert_eq!(stats.entry_count, 1);

        let again = analyze_rooftops(&paths, &[], &[], &ctx, None).unwrap();
        assert_eq!(again.successful, 1);
    }
}
