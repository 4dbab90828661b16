//! Excel export functionality

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use solar_types::{BatchResults, Error, ExportFormat, Result};
use std::path::Path;

fn excel_err(e: XlsxError) -> Error {
    Error::export(ExportFormat::Excel, e)
}

fn monthly_cell(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{:.1}", v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Export batch results to Excel file
pub fn export_to_excel(results: &BatchResults, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    // Add summary sheet
    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, results)?;

    // Add details sheet
    let details_sheet = workbook.add_worksheet();
    write_details_sheet(details_sheet, results)?;

    // Save workbook
    workbook.save(output_path).map_err(excel_err)?;

    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, results: &BatchResults) -> Result<()> {
    sheet.set_name("Summary").map_err(excel_err)?;

    // Header format
    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "Solar Rooftop Analysis Report", &header_format)
        .map_err(excel_err)?;

    let rows: [(&str, String); 2] = [
        ("Run ID:", results.run_id.to_string()),
        ("Analysis Date:", results.started_at.to_rfc3339()),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let row = 2 + i as u32;
        sheet.write_string(row, 0, *label).map_err(excel_err)?;
        sheet.write_string(row, 1, value).map_err(excel_err)?;
    }

    let counts = [
        ("Total Rooftops:", results.total_processed),
        ("Successful:", results.successful),
        ("Failed:", results.failed),
    ];
    for (i, (label, count)) in counts.iter().enumerate() {
        let row = 4 + i as u32;
        sheet.write_string(row, 0, *label).map_err(excel_err)?;
        sheet
            .write_number(row, 1, *count as f64)
            .map_err(excel_err)?;
    }

    // Totals over successful rooftops
    sheet
        .write_string_with_format(8, 0, "Totals", &header_format)
        .map_err(excel_err)?;

    let analyses: Vec<_> = results
        .results
        .iter()
        .filter_map(|r| r.analysis.as_ref())
        .collect();
    let totals = [
        (
            "Annual Energy (kWh):",
            analyses.iter().map(|a| a.annual_energy_kwh).sum::<f64>(),
        ),
        (
            "System Size (kW):",
            analyses.iter().map(|a| a.system_size_kw).sum::<f64>(),
        ),
        (
            "Total Cost (INR):",
            analyses.iter().map(|a| a.total_cost_inr).sum::<f64>(),
        ),
        (
            "Annual Savings (INR):",
            analyses.iter().map(|a| a.annual_savings_inr).sum::<f64>(),
        ),
    ];
    for (i, (label, value)) in totals.iter().enumerate() {
        let row = 9 + i as u32;
        sheet.write_string(row, 0, *label).map_err(excel_err)?;
        sheet.write_number(row, 1, *value).map_err(excel_err)?;
    }

    sheet.set_column_width(0, 24).map_err(excel_err)?;
    sheet.set_column_width(1, 40).map_err(excel_err)?;

    Ok(())
}

fn write_details_sheet(sheet: &mut Worksheet, results: &BatchResults) -> Result<()> {
    sheet.set_name("Details").map_err(excel_err)?;

    // Header format
    let header_format = Format::new().set_bold();

    let headers = [
        "Rooftop",
        "File",
        "City",
        "Area (m²)",
        "Orientation",
        "Obstructions",
        "Surface Type",
        "Suitability",
        "Panel Type",
        "GHI (W/m²)",
        "Annual Energy (kWh)",
        "Monthly Energy (kWh)",
        "System Size (kW)",
        "Total Cost (INR)",
        "Annual Savings (INR)",
        "Monthly Savings (INR)",
        "Payback (years)",
        "Error",
        "Recommendations",
    ];

    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel_err)?;
    }

    // Write data
    for (row_idx, result) in results.results.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet
            .write_number(row, 0, result.rooftop_id as f64)
            .map_err(excel_err)?;

        let filename = Path::new(&result.image_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&result.image_path);
        sheet.write_string(row, 1, filename).map_err(excel_err)?;

        if let Some(a) = &result.analysis {
            sheet.write_string(row, 2, &a.city).map_err(excel_err)?;
            sheet.write_number(row, 3, a.area_m2).map_err(excel_err)?;
            sheet
                .write_string(row, 4, a.orientation.label())
                .map_err(excel_err)?;
            sheet
                .write_string(row, 5, &a.obstructions)
                .map_err(excel_err)?;
            sheet
                .write_string(row, 6, a.surface_type.label())
                .map_err(excel_err)?;
            sheet
                .write_number(row, 7, a.suitability as f64)
                .map_err(excel_err)?;
            sheet
                .write_string(row, 8, a.panel_type.name())
                .map_err(excel_err)?;
            sheet
                .write_number(row, 9, a.irradiance.ghi)
                .map_err(excel_err)?;
            sheet
                .write_number(row, 10, a.annual_energy_kwh)
                .map_err(excel_err)?;
            sheet
                .write_string(row, 11, monthly_cell(&a.monthly_energy_kwh))
                .map_err(excel_err)?;
            sheet
                .write_number(row, 12, a.system_size_kw)
                .map_err(excel_err)?;
            sheet
                .write_number(row, 13, a.total_cost_inr)
                .map_err(excel_err)?;
            sheet
                .write_number(row, 14, a.annual_savings_inr)
                .map_err(excel_err)?;
            sheet
                .write_string(row, 15, monthly_cell(&a.monthly_savings_inr))
                .map_err(excel_err)?;
            if let Some(years) = a.payback_period_years {
                sheet.write_number(row, 16, years).map_err(excel_err)?;
            }
        }

        if let Some(error) = &result.error {
            sheet.write_string(row, 17, error).map_err(excel_err)?;
        }

        sheet
            .write_string(row, 18, result.recommendations.join("; "))
            .map_err(excel_err)?;
    }

    // Set column widths
    sheet.set_column_width(1, 24).map_err(excel_err)?;
    sheet.set_column_width(11, 40).map_err(excel_err)?;
    sheet.set_column_width(15, 40).map_err(excel_err)?;
    sheet.set_column_width(18, 80).map_err(excel_err)?;

    Ok(())
}
