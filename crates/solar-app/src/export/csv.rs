//! CSV export: one row per rooftop

use solar_types::{BatchResults, Error, ExportFormat, Result, RooftopResult};
use std::io::Write;
use std::path::Path;

use crate::report::join_values;

pub const CSV_HEADERS: [&str; 21] = [
    "rooftop_id",
    "image_path",
    "city",
    "area_m2",
    "orientation",
    "obstructions",
    "surface_type",
    "suitability",
    "panel_type",
    "ghi_w_m2",
    "dni_w_m2",
    "dhi_w_m2",
    "annual_energy_kwh",
    "monthly_energy_kwh",
    "system_size_kw",
    "total_cost_inr",
    "annual_savings_inr",
    "monthly_savings_inr",
    "payback_period_years",
    "error",
    "recommendations",
];

fn csv_err(e: csv::Error) -> Error {
    Error::export(ExportFormat::Csv, e)
}

fn row(result: &RooftopResult) -> Vec<String> {
    let mut row = vec![result.rooftop_id.to_string(), result.image_path.clone()];
    match &result.analysis {
        Some(a) => row.extend([
            a.city.clone(),
            a.area_m2.to_string(),
            a.orientation.to_string(),
            a.obstructions.clone(),
            a.surface_type.to_string(),
            a.suitability.to_string(),
            a.panel_type.to_string(),
            a.irradiance.ghi.to_string(),
            a.irradiance.dni.to_string(),
            a.irradiance.dhi.to_string(),
            a.annual_energy_kwh.to_string(),
            join_values(&a.monthly_energy_kwh),
            a.system_size_kw.to_string(),
            a.total_cost_inr.to_string(),
            a.annual_savings_inr.to_string(),
            join_values(&a.monthly_savings_inr),
            a.payback_period_years
                .map(|y| y.to_string())
                .unwrap_or_default(),
        ]),
        None => row.extend(std::iter::repeat(String::new()).take(17)),
    }
    row.push(result.error.clone().unwrap_or_default());
    row.push(result.recommendations.join("; "));
    row
}

/// Write results as CSV to any writer
pub fn write_csv<W: Write>(results: &BatchResults, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS).map_err(csv_err)?;
    for result in &results.results {
        wtr.write_record(row(result)).map_err(csv_err)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export batch results to a CSV file
pub fn export_to_csv(results: &BatchResults, output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_csv(results, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_failed_rows_keep_column_count() {
        let results = vec![RooftopResult::failure(1, "a.png".to_string(), "boom".to_string())];
        let batch = BatchResults::new(results, Utc::now());

        let mut buffer = Vec::new();
        write_csv(&batch, &mut buffer).unwrap();

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), CSV_HEADERS.len());

        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.len(), CSV_HEADERS.len());
        assert_eq!(&record[0], "1");
        assert_eq!(&record[19], "boom");
        assert_eq!(&record[20], "Check image quality or input data and retry.");
    }
}
