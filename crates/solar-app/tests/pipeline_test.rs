//! End-to-end pipeline tests on the generated sample rooftop

use chrono::NaiveDate;
use solar_app::app::{analyze_rooftops, AnalysisContext, AnalysisServiceError};
use solar_app::export::{export_all, export_results, load_results};
use solar_app::report::{build_batch_charts, format_text_report};
use solar_types::{ExportFormat, PanelType};
use solar_vision::{generate_sample_rooftop_image, Cache, DetectorKind};
use std::path::PathBuf;
use tempfile::tempdir;

fn context() -> AnalysisContext {
    AnalysisContext::new(DetectorKind::Vegetation.build())
        .with_jobs(2)
        .with_date(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap())
}

#[test]
fn test_sample_rooftop_end_to_end() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("sample_rooftop.png");
    generate_sample_rooftop_image(&image).unwrap();

    let batch = analyze_rooftops(
        &[image.clone()],
        &["Jaipur".to_string()],
        &[PanelType::Bifacial],
        &context(),
        None,
    )
    .unwrap();

    assert_eq!(batch.total_processed, 1);
    assert_eq!(batch.successful, 1);
    let analysis = batch.first_success().unwrap();
    assert_eq!(analysis.obstructions, "tree");
    assert_eq!(analysis.suitability, 7);
    assert_eq!(analysis.panel_type, PanelType::Bifacial);
    assert_eq!(analysis.monthly_energy_kwh.len(), 12);
    assert!(analysis.irradiance.ghi > 0.0);

    let report = format_text_report(&batch);
    assert!(report.contains("**Rooftop 1 Analysis**"));
    assert!(report.contains("- Obstructions: tree"));
    assert!(report.contains("Highly suitable"));

    let charts = build_batch_charts(&batch).unwrap();
    assert_eq!(charts.line.series[0].values, analysis.monthly_energy_kwh);
}

#[test]
fn test_exports_written_and_reloadable() {
    let dir = tempdir().unwrap();
    let images: Vec<PathBuf> = (0..2)
        .map(|i| {
            let path = dir.path().join(format!("roof_{}.png", i));
            generate_sample_rooftop_image(&path).unwrap();
            path
        })
        .collect();

    let batch = analyze_rooftops(&images, &[], &[], &context(), None).unwrap();
    let out_dir = dir.path().join("outputs");
    let files = export_all(&batch, &out_dir).unwrap();

    for (format, path) in files.iter() {
        assert!(path.is_absolute(), "{} path not absolute", format);
        assert!(path.exists(), "{} not written", format);
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("solar_analysis.{}", format.extension())
        );
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }

    let reloaded = load_results(&files.json).unwrap();
    assert_eq!(reloaded.results, batch.results);

    let csv_path = export_results(
        &files.json,
        ExportFormat::Csv,
        Some(&dir.path().join("again").join("rooftops.csv")),
    )
    .unwrap();
    let content = std::fs::read_to_string(csv_path).unwrap();
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_invalid_uploads_rejected() {
    let dir = tempdir().unwrap();
    let text = dir.path().join("roof.jpg");
    std::fs::write(&text, b"definitely not a jpeg").unwrap();

    let err = analyze_rooftops(&[text], &[], &[], &context(), None).unwrap_err();
    assert!(matches!(err, AnalysisServiceError::NoValidImages));
}

#[test]
fn test_cached_record_matches_fresh() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("sample.png");
    generate_sample_rooftop_image(&image).unwrap();

    let fresh = analyze_rooftops(&[image.clone()], &[], &[], &context(), None).unwrap();

    let cache = Cache::new(dir.path().join("cache")).unwrap();
    let cached_ctx = context().with_cache(cache);
    analyze_rooftops(&[image.clone()], &[], &[], &cached_ctx, None).unwrap();
    let from_cache = analyze_rooftops(&[image], &[], &[], &cached_ctx, None).unwrap();

    assert_eq!(
        fresh.first_success().unwrap(),
        from_cache.first_success().unwrap()
    );
}
