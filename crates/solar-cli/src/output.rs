//! Output formatting module

use serde_json::json;
use solar_app::constants::{get_panel_spec, CITIES};
use solar_app::export::ExportedFiles;
use solar_app::report::format_text_report;
use solar_types::{BatchResults, OutputFormat, PanelType, Result};

pub fn print_batch(output_format: OutputFormat, batch: &BatchResults) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(batch)?;
        println!("{}", content);
        return Ok(());
    }

    println!("{}", format_text_report(batch));

    println!("\nBatch Analysis Complete");
    println!("=======================");
    println!("Total:      {}", batch.total_processed);
    println!("Successful: {}", batch.successful);
    println!("Failed:     {}", batch.failed);
    println!(
        "Duration:   {:.1}s",
        (batch.completed_at - batch.started_at).num_milliseconds() as f64 / 1000.0
    );
    Ok(())
}

/// List written report files. Goes to stderr in JSON mode so stdout stays parseable.
pub fn print_exports(output_format: OutputFormat, files: &ExportedFiles) {
    let lines: Vec<String> = files
        .iter()
        .map(|(format, path)| format!("  {:<6} {}", format.to_string(), path.display()))
        .collect();

    if output_format == OutputFormat::Json {
        eprintln!("Exported:\n{}", lines.join("\n"));
    } else {
        println!("\nExported:\n{}", lines.join("\n"));
    }
}

pub fn print_cities(output_format: OutputFormat) -> Result<()> {
    if output_format == OutputFormat::Json {
        let cities: Vec<_> = CITIES
            .iter()
            .map(|c| {
                json!({
                    "name": c.name,
                    "latitude": c.latitude,
                    "longitude": c.longitude,
                    "peak_sun_hours": c.peak_sun_hours,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&cities)?);
        return Ok(());
    }

    println!("{:<12} {:>9} {:>10} {:>15}", "City", "Latitude", "Longitude", "Peak sun hours");
    println!("{}", "-".repeat(49));
    for c in &CITIES {
        println!(
            "{:<12} {:>9.4} {:>10.4} {:>15.1}",
            c.name, c.latitude, c.longitude, c.peak_sun_hours
        );
    }
    Ok(())
}

pub fn print_panels(output_format: OutputFormat) -> Result<()> {
    if output_format == OutputFormat::Json {
        let panels: Vec<_> = PanelType::ALL
            .iter()
            .map(|p| {
                let spec = get_panel_spec(*p);
                json!({
                    "panel_type": p.name(),
                    "efficiency": spec.efficiency,
                    "cost_per_watt_inr": spec.cost_per_watt,
                    "subsidy_per_kw_inr": spec.subsidy_per_kw,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&panels)?);
        return Ok(());
    }

    println!(
        "{:<16} {:>11} {:>12} {:>15}",
        "Panel", "Efficiency", "INR/W", "Subsidy INR/kW"
    );
    println!("{}", "-".repeat(57));
    for p in PanelType::ALL {
        let spec = get_panel_spec(p);
        println!(
            "{:<16} {:>10.2}% {:>12.2} {:>15.0}",
            p.name(),
            spec.efficiency * 100.0,
            spec.cost_per_watt,
            spec.subsidy_per_kw
        );
    }
    Ok(())
}
