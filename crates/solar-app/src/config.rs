//! Configuration management for solar-rooftop
//!
//! Config stored at: ~/.config/solar-rooftop/config.json

use serde::{Deserialize, Serialize};
use solar_domain::model::Tariff;
use solar_types::{ConfigError, OutputFormat, PanelType, Result};
use solar_vision::DetectorKind;
use std::path::{Path, PathBuf};

use crate::constants::{get_city, DEFAULT_CITY};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable caching of rooftop records
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Cache directory override
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Where report files are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Where solar_analysis.log is written
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Also log to a file in `log_dir`
    #[serde(default = "default_true")]
    pub log_to_file: bool,

    /// City used when none is given
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Panel type used when none is given
    #[serde(default)]
    pub default_panel_type: PanelType,

    /// Obstruction detector (vegetation, none)
    #[serde(default)]
    pub detector: DetectorKind,

    /// Worker threads for batch analysis. 0 = CPU count.
    #[serde(default)]
    pub jobs: usize,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// INR per kWh
    #[serde(default = "default_electricity_rate")]
    pub electricity_rate: f64,

    /// Fixed INR cost per installation
    #[serde(default = "default_installation_cost")]
    pub installation_cost: f64,
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

fn default_electricity_rate() -> f64 {
    Tariff::default().electricity_rate
}

fn default_installation_cost() -> f64 {
    Tariff::default().installation_cost
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_dir: None,
            output_dir: default_output_dir(),
            log_dir: default_log_dir(),
            log_to_file: true,
            default_city: default_city(),
            default_panel_type: PanelType::default(),
            detector: DetectorKind::default(),
            jobs: 0,
            output_format: OutputFormat::default(),
            electricity_rate: default_electricity_rate(),
            installation_cost: default_installation_cost(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("solar-rooftop");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }

        let cache_dir = dirs::cache_dir()
            .ok_or(ConfigError::NotFound)?
            .join("solar-rooftop");
        Ok(cache_dir)
    }

    /// Effective worker count
    pub fn job_count(&self) -> usize {
        match self.jobs {
            0 => num_cpus::get(),
            n => n,
        }
    }

    pub fn tariff(&self) -> Tariff {
        Tariff {
            installation_cost: self.installation_cost,
            electricity_rate: self.electricity_rate,
        }
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if get_city(&self.default_city).is_none() {
            return Err(ConfigError::InvalidValue(format!(
                "default_city '{}' is not a supported city",
                self.default_city
            ))
            .into());
        }
        if !self.electricity_rate.is_finite() || self.electricity_rate < 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "electricity_rate must be >= 0 (got {})",
                self.electricity_rate
            ))
            .into());
        }
        if !self.installation_cost.is_finite() || self.installation_cost < 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "installation_cost must be >= 0 (got {})",
                self.installation_cost
            ))
            .into());
        }
        Ok(())
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solar Rooftop Configuration")?;
        writeln!(f, "===========================")?;
        writeln!(f)?;
        writeln!(f, "Default city:      {}", self.default_city)?;
        writeln!(f, "Default panel:     {}", self.default_panel_type)?;
        writeln!(f, "Detector:          {}", self.detector)?;
        writeln!(f, "Jobs:              {} (effective {})", self.jobs, self.job_count())?;
        writeln!(f, "Electricity rate:  {:.2} INR/kWh", self.electricity_rate)?;
        writeln!(f, "Installation cost: {:.2} INR", self.installation_cost)?;
        writeln!(f, "Cache enabled:     {}", self.cache_enabled)?;
        writeln!(
            f,
            "Cache dir:         {}",
            self.cache_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output dir:        {}", self.output_dir.display())?;
        writeln!(
            f,
            "Log file:          {}",
            if self.log_to_file {
                self.log_dir.join("solar_analysis.log").display().to_string()
            } else {
                "(console only)".to_string()
            }
        )?;
        writeln!(f, "Output format:     {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:       {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.default_city, "New Delhi");
        assert_eq!(config.default_panel_type, PanelType::Monocrystalline);
        assert!(config.cache_enabled);
        assert_eq!(config.tariff(), Tariff::default());
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_city": "Pune", "detector": "none"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_city, "Pune");
        assert_eq!(config.detector, DetectorKind::None);
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            default_panel_type: PanelType::Bifacial,
            electricity_rate: 8.5,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_panel_type, PanelType::Bifacial);
        assert_eq!(loaded.electricity_rate, 8.5);
    }

    #[test]
    fn test_rejects_unknown_city() {
        let config = Config {
            default_city: "Atlantis".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_job_count_auto() {
        let config = Config::default();
        assert!(config.job_count() >= 1);
        let config = Config { jobs: 3, ..Config::default() };
        assert_eq!(config.job_count(), 3);
    }
}
