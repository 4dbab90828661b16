//! Obstruction detectors
//!
//! A detector looks at a decoded roof image and reports labelled objects with
//! a confidence in 0.0-1.0. Which labels count as obstructions is decided by
//! the caller (see `rooftop`).

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single labelled detection
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
}

/// Finds objects on a roof image that could shade panels
pub trait ObstructionDetector: Send + Sync {
    /// Short identifier, also used to partition the result cache
    fn name(&self) -> &'static str;

    fn detect(&self, image: &DynamicImage) -> Vec<Detection>;
}

/// Detector that never reports anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDetector;

impl ObstructionDetector for NullDetector {
    fn name(&self) -> &'static str {
        "none"
    }

    fn detect(&self, _image: &DynamicImage) -> Vec<Detection> {
        Vec::new()
    }
}

/// Reports a `tree` when green-dominant pixels cover part of the image.
///
/// Confidence grows with the square root of the covered share, so a canopy
/// covering roughly 0.6% of the frame reaches the 0.3 acceptance threshold.
#[derive(Debug, Clone, Copy)]
pub struct VegetationDetector {
    /// Images larger than this on either side are downscaled first
    pub max_dimension: u32,
    /// How far green must exceed red and blue
    pub green_margin: i16,
}

impl Default for VegetationDetector {
    fn default() -> Self {
        Self {
            max_dimension: 512,
            green_margin: 30,
        }
    }
}

impl VegetationDetector {
    fn is_vegetation(&self, pixel: &Rgb<u8>) -> bool {
        let [r, g, b] = pixel.0;
        let (r, g, b) = (r as i16, g as i16, b as i16);
        g - r > self.green_margin && g - b > self.green_margin
    }

    /// Share of pixels classified as vegetation
    pub fn vegetation_share(&self, image: &DynamicImage) -> f64 {
        let (width, height) = image.dimensions();
        // Nearest keeps pure colours so the share survives downscaling
        let rgb = if width.max(height) > self.max_dimension {
            image
                .resize(self.max_dimension, self.max_dimension, FilterType::Nearest)
                .to_rgb8()
        } else {
            image.to_rgb8()
        };

        let total = rgb.width() as u64 * rgb.height() as u64;
        if total == 0 {
            return 0.0;
        }
        let green = rgb.pixels().filter(|p| self.is_vegetation(p)).count() as u64;
        green as f64 / total as f64
    }
}

impl ObstructionDetector for VegetationDetector {
    fn name(&self) -> &'static str {
        "vegetation"
    }

    fn detect(&self, image: &DynamicImage) -> Vec<Detection> {
        let share = self.vegetation_share(image);
        if share <= 0.0 {
            return Vec::new();
        }
        vec![Detection {
            label: "tree".to_string(),
            confidence: (share.sqrt() * 4.0).min(0.99) as f32,
        }]
    }
}

/// Detector selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    #[default]
    Vegetation,
    None,
}

impl DetectorKind {
    pub fn build(&self) -> Box<dyn ObstructionDetector> {
        match self {
            DetectorKind::Vegetation => Box::new(VegetationDetector::default()),
            DetectorKind::None => Box::new(NullDetector),
        }
    }
}

impl std::fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectorKind::Vegetation => write!(f, "vegetation"),
            DetectorKind::None => write!(f, "none"),
        }
    }
}

impl FromStr for DetectorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vegetation" => Ok(DetectorKind::Vegetation),
            "none" => Ok(DetectorKind::None),
            other => Err(format!("Unknown detector '{}'. Use vegetation, none", other)),
        }
    }
}
