//! Export of analysis results to PDF, CSV, Excel and JSON

pub mod csv;
pub mod excel;
pub mod json;
pub mod pdf;

pub use self::csv::export_to_csv;
pub use excel::export_to_excel;
pub use json::{export_to_json, load_results};
pub use pdf::export_to_pdf;

use solar_types::{BatchResults, ExportFormat, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

/// Base name of every export file
pub const EXPORT_STEM: &str = "solar_analysis";

/// Absolute paths of the files written by `export_all`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFiles {
    pub pdf: PathBuf,
    pub csv: PathBuf,
    pub excel: PathBuf,
    pub json: PathBuf,
}

impl ExportedFiles {
    pub fn iter(&self) -> impl Iterator<Item = (ExportFormat, &Path)> {
        [
            (ExportFormat::Pdf, self.pdf.as_path()),
            (ExportFormat::Csv, self.csv.as_path()),
            (ExportFormat::Excel, self.excel.as_path()),
            (ExportFormat::Json, self.json.as_path()),
        ]
        .into_iter()
    }
}

/// `solar_analysis.<ext>`
pub fn default_file_name(format: ExportFormat) -> String {
    format!("{}.{}", EXPORT_STEM, format.extension())
}

/// Write results in one format
pub fn export_as(results: &BatchResults, format: ExportFormat, output_path: &Path) -> Result<()> {
    let start = Instant::now();
    let outcome = match format {
        ExportFormat::Pdf => export_to_pdf(results, output_path),
        ExportFormat::Csv => export_to_csv(results, output_path),
        ExportFormat::Excel => export_to_excel(results, output_path),
        ExportFormat::Json => export_to_json(results, output_path),
    };

    match &outcome {
        Ok(()) => info!(
            format = %format,
            path = %output_path.display(),
            elapsed_s = start.elapsed().as_secs_f64(),
            "Exported results"
        ),
        Err(e) => error!(format = %format, path = %output_path.display(), error = %e, "Export failed"),
    }
    outcome
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::fs::canonicalize(path)?)
}

/// Write all four export files into `output_dir`
pub fn export_all(results: &BatchResults, output_dir: &Path) -> Result<ExportedFiles> {
    std::fs::create_dir_all(output_dir)?;

    let write = |format: ExportFormat| -> Result<PathBuf> {
        let path = output_dir.join(default_file_name(format));
        export_as(results, format, &path)?;
        absolute(&path)
    };

    Ok(ExportedFiles {
        pdf: write(ExportFormat::Pdf)?,
        csv: write(ExportFormat::Csv)?,
        excel: write(ExportFormat::Excel)?,
        json: write(ExportFormat::Json)?,
    })
}

/// Re-export a saved JSON batch in another format
///
/// Writes next to the input as `solar_analysis.<ext>` unless `output_path`
/// is given. Returns the absolute path written.
pub fn export_results(
    input_path: &Path,
    format: ExportFormat,
    output_path: Option<&Path>,
) -> Result<PathBuf> {
    let results = load_results(input_path)?;

    let target = match output_path {
        Some(path) => path.to_path_buf(),
        None => input_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(default_file_name(format)),
    };
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    export_as(&results, format, &target)?;
    absolute(&target)
}
