//! JSON export and reload

use serde::Deserialize;
use solar_types::{BatchResults, Error, ExportFormat, Result, RooftopResult};
use std::path::Path;

/// Export batch results as pretty JSON
pub fn export_to_json(results: &BatchResults, output_path: &Path) -> Result<()> {
    let content =
        serde_json::to_string_pretty(results).map_err(|e| Error::export(ExportFormat::Json, e))?;
    std::fs::write(output_path, content)?;
    Ok(())
}

/// Either a full batch or a bare list of results
#[derive(Deserialize)]
#[serde(untagged)]
enum SavedResults {
    Batch(BatchResults),
    Results(Vec<RooftopResult>),
}

/// Load results written by `export_to_json` (or a bare result array)
pub fn load_results(path: &Path) -> Result<BatchResults> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let saved: SavedResults = serde_json::from_str(&content).map_err(|e| {
        Error::InvalidInput(format!(
            "{} is not a saved analysis: {}",
            path.display(),
            e
        ))
    })?;

    Ok(match saved {
        SavedResults::Batch(batch) => batch,
        SavedResults::Results(results) => BatchResults::new(results, chrono::Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    #[test]
    fn test_load_saved_batch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("solar_analysis.json");
        let results = vec![RooftopResult::failure(1, "a.png".to_string(), "boom".to_string())];
        let batch = BatchResults::new(results, Utc::now());

        export_to_json(&batch, &path).unwrap();
        let loaded = load_results(&path).unwrap();
        assert_eq!(loaded.run_id, batch.run_id);
        assert_eq!(loaded.results, batch.results);
    }

    #[test]
    fn test_load_bare_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(
            &path,
            r#"[{"rooftop_id": 1, "image_path": "a.png", "error": "x", "recommendations": []}]"#,
        )
        .unwrap();

        let loaded = load_results(&path).unwrap();
        assert_eq!(loaded.total_processed, 1);
        assert_eq!(loaded.failed, 1);
    }

    #[test]
    fn test_load_rejects_other_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_city": "Pune"}"#).unwrap();
        assert!(matches!(load_results(&path), Err(Error::InvalidInput(_))));
    }
}
