//! Core data types shared by every layer

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Solar panel material
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelType {
    #[default]
    Monocrystalline,
    Bifacial,
    Perovskite,
}

impl PanelType {
    pub const ALL: [PanelType; 3] = [
        PanelType::Monocrystalline,
        PanelType::Bifacial,
        PanelType::Perovskite,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PanelType::Monocrystalline => "monocrystalline",
            PanelType::Bifacial => "bifacial",
            PanelType::Perovskite => "perovskite",
        }
    }
}

impl std::fmt::Display for PanelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PanelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        PanelType::ALL
            .into_iter()
            .find(|p| p.name() == needle)
            .ok_or_else(|| {
                let names: Vec<&str> = PanelType::ALL.iter().map(|p| p.name()).collect();
                format!("Unknown panel type '{}'. Use {}", s.trim(), names.join(", "))
            })
    }
}

/// Compass direction the usable roof plane faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    South,
    North,
    East,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::South,
        Orientation::North,
        Orientation::East,
        Orientation::West,
    ];

    /// Yield multiplier relative to a south-facing roof
    pub fn factor(&self) -> f64 {
        match self {
            Orientation::South => 1.0,
            Orientation::North => 0.65,
            Orientation::East | Orientation::West => 0.80,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Orientation::South => "south",
            Orientation::North => "north",
            Orientation::East => "east",
            Orientation::West => "west",
        }
    }

    /// Capitalized label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Orientation::South => "South",
            Orientation::North => "North",
            Orientation::East => "East",
            Orientation::West => "West",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Orientation::ALL
            .into_iter()
            .find(|o| o.name() == needle)
            .ok_or_else(|| {
                let names: Vec<&str> = Orientation::ALL.iter().map(|o| o.name()).collect();
                format!("Invalid orientation. Use {}", names.join(", "))
            })
    }
}

/// Roof surface shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceType {
    Flat,
    Sloped,
    Curved,
}

impl SurfaceType {
    /// Offset applied to the suitability score
    pub fn suitability_adjustment(&self) -> i32 {
        match self {
            SurfaceType::Flat => 0,
            SurfaceType::Sloped => -1,
            SurfaceType::Curved => -2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SurfaceType::Flat => "Flat",
            SurfaceType::Sloped => "Sloped",
            SurfaceType::Curved => "Curved",
        }
    }
}

impl std::fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Estimated attributes of one uploaded rooftop image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RooftopRecord {
    pub area_m2: f64,
    pub orientation: Orientation,
    /// Distinct obstruction labels, sorted
    #[serde(default)]
    pub obstructions: Vec<String>,
    /// 1..=10
    pub suitability: u8,
    pub surface_type: SurfaceType,
}

impl RooftopRecord {
    /// `none` or the comma separated obstruction list
    pub fn obstructions_label(&self) -> String {
        if self.obstructions.is_empty() {
            "none".to_string()
        } else {
            self.obstructions.join(", ")
        }
    }
}

/// Clear-sky irradiance components in W/m²
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Irradiance {
    pub ghi: f64,
    pub dni: f64,
    pub dhi: f64,
}

impl Irradiance {
    /// Value used when the clear-sky model cannot produce a result
    pub const FALLBACK: Irradiance = Irradiance {
        ghi: 600.0,
        dni: 500.0,
        dhi: 100.0,
    };
}

/// Annual and monthly yield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarPotential {
    pub annual_energy_kwh: f64,
    pub monthly_energy_kwh: Vec<f64>,
}

/// Cost and payback figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiEstimate {
    pub system_size_kw: f64,
    pub total_cost_inr: f64,
    pub annual_savings_inr: f64,
    pub monthly_savings_inr: Vec<f64>,
    /// None when the system never pays back
    pub payback_period_years: Option<f64>,
}

/// Full analysis of a rooftop that went through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RooftopAnalysis {
    pub city: String,
    pub area_m2: f64,
    pub orientation: Orientation,
    pub obstructions: String,
    pub surface_type: SurfaceType,
    pub suitability: u8,
    pub panel_type: PanelType,
    pub irradiance: Irradiance,
    pub annual_energy_kwh: f64,
    pub monthly_energy_kwh: Vec<f64>,
    pub system_size_kw: f64,
    pub total_cost_inr: f64,
    pub annual_savings_inr: f64,
    pub monthly_savings_inr: Vec<f64>,
    pub payback_period_years: Option<f64>,
}

/// Outcome for one rooftop of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RooftopResult {
    /// 1-based position in the input list
    pub rooftop_id: usize,
    pub image_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<RooftopAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl RooftopResult {
    pub fn success(
        rooftop_id: usize,
        image_path: String,
        analysis: RooftopAnalysis,
        recommendations: Vec<String>,
    ) -> Self {
        Self {
            rooftop_id,
            image_path,
            analysis: Some(analysis),
            error: None,
            recommendations,
        }
    }

    pub fn failure(rooftop_id: usize, image_path: String, error: String) -> Self {
        Self {
            rooftop_id,
            image_path,
            analysis: None,
            error: Some(error),
            recommendations: vec!["Check image quality or input data and retry.".to_string()],
        }
    }

    pub fn is_success(&self) -> bool {
        self.analysis.is_some()
    }
}

/// Batch analysis results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    pub run_id: uuid::Uuid,
    pub results: Vec<RooftopResult>,
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl BatchResults {
    pub fn new(results: Vec<RooftopResult>, started_at: DateTime<Utc>) -> Self {
        let successful = results.iter().filter(|r| r.is_success()).count();
        Self {
            run_id: uuid::Uuid::new_v4(),
            total_processed: results.len(),
            failed: results.len() - successful,
            successful,
            results,
            started_at,
            completed_at: Utc::now(),
        }
    }

    /// First rooftop that produced an analysis
    pub fn first_success(&self) -> Option<&RooftopAnalysis> {
        self.results.iter().find_map(|r| r.analysis.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_type_from_str() {
        assert_eq!("Bifacial".parse::<PanelType>(), Ok(PanelType::Bifacial));
        assert_eq!(" perovskite ".parse::<PanelType>(), Ok(PanelType::Perovskite));
        assert!("thin-film".parse::<PanelType>().is_err());
    }

    #[test]
    fn test_orientation_factor() {
        assert_eq!(Orientation::South.factor(), 1.0);
        assert_eq!(Orientation::North.factor(), 0.65);
        assert_eq!(Orientation::East.factor(), Orientation::West.factor());
        assert_eq!("EAST".parse::<Orientation>(), Ok(Orientation::East));
        assert!("up".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_obstructions_label() {
        let mut record = RooftopRecord {
            area_m2: 100.0,
            orientation: Orientation::South,
            obstructions: Vec::new(),
            suitability: 8,
            surface_type: SurfaceType::Flat,
        };
        assert_eq!(record.obstructions_label(), "none");

        record.obstructions = vec!["chimney".to_string(), "tree".to_string()];
        assert_eq!(record.obstructions_label(), "chimney, tree");
    }

    #[test]
    fn test_failure_result_has_retry_hint() {
        let result = RooftopResult::failure(2, "a.png".to_string(), "boom".to_string());
        assert!(!result.is_success());
        assert_eq!(result.recommendations.len(), 1);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("analysis").is_none());
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn test_batch_counts() {
        let results = vec![
            RooftopResult::failure(1, "a.png".to_string(), "x".to_string()),
            RooftopResult::failure(2, "b.png".to_string(), "y".to_string()),
        ];
        let batch = BatchResults::new(results, Utc::now());
        assert_eq!(batch.total_processed, 2);
        assert_eq!(batch.successful, 0);
        assert_eq!(batch.failed, 2);
        assert!(batch.first_success().is_none());
    }
}
