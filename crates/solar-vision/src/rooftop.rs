//! Rooftop record estimation
//!
//! Area, orientation and surface are fixed estimates; only the obstruction
//! list comes from the image.

use solar_domain::service::suitability_from_obstructions;
use solar_types::{Orientation, Result, RooftopRecord, SurfaceType};
use image::DynamicImage;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::detector::ObstructionDetector;

/// Labels that shade a roof
pub const OBSTRUCTION_LABELS: [&str; 3] = ["tree", "building", "chimney"];

/// Detections below this are ignored
pub const MIN_DETECTION_CONFIDENCE: f32 = 0.3;

const ESTIMATED_AREA_M2: f64 = 100.0;
const ESTIMATED_ORIENTATION: Orientation = Orientation::South;
const ESTIMATED_SURFACE: SurfaceType = SurfaceType::Flat;

/// Build the rooftop record for a decoded image
pub fn analyze_rooftop(image: &DynamicImage, detector: &dyn ObstructionDetector) -> RooftopRecord {
    let obstructions: BTreeSet<String> = detector
        .detect(image)
        .into_iter()
        .filter(|d| d.confidence >= MIN_DETECTION_CONFIDENCE)
        .filter(|d| OBSTRUCTION_LABELS.contains(&d.label.as_str()))
        .map(|d| d.label)
        .collect();

    RooftopRecord {
        area_m2: ESTIMATED_AREA_M2,
        orientation: ESTIMATED_ORIENTATION,
        suitability: suitability_from_obstructions(obstructions.len()),
        obstructions: obstructions.into_iter().collect(),
        surface_type: ESTIMATED_SURFACE,
    }
}

/// Decode an image file and build its rooftop record
pub fn analyze_rooftop_image(
    image_path: &Path,
    detector: &dyn ObstructionDetector,
) -> Result<RooftopRecord> {
    let start = Instant::now();
    info!(image = %image_path.display(), detector = detector.name(), "Analyzing image");

    let image = image::open(image_path)?;
    let record = analyze_rooftop(&image, detector);

    info!(
        image = %image_path.display(),
        elapsed_s = start.elapsed().as_secs_f64(),
        obstructions = %record.obstructions_label(),
        suitability = record.suitability,
        "Image analysis completed"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{Detection, NullDetector};
    use image::RgbImage;

    struct FixedDetector(Vec<Detection>);

    impl ObstructionDetector for FixedDetector {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn detect(&self, _image: &DynamicImage) -> Vec<Detection> {
            self.0.clone()
        }
    }

    fn detection(label: &str, confidence: f32) -> Detection {
        Detection {
            label: label.to_string(),
            confidence,
        }
    }

    fn blank() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(8, 8))
    }

    #[test]
    fn test_unobstructed_roof() {
        let record = analyze_rooftop(&blank(), &NullDetector);
        assert_eq!(record.area_m2, 100.0);
        assert_eq!(record.orientation, Orientation::South);
        assert_eq!(record.surface_type, SurfaceType::Flat);
        assert!(record.obstructions.is_empty());
        assert_eq!(record.suitability, 8);
    }

    #[test]
    fn test_filters_labels_and_confidence() {
        let detector = FixedDetector(vec![
            detection("tree", 0.9),
            detection("tree", 0.5),
            detection("chimney", 0.31),
            detection("building", 0.29),
            detection("car", 0.95),
        ]);
        let record = analyze_rooftop(&blank(), &detector);
        assert_eq!(record.obstructions, vec!["chimney".to_string(), "tree".to_string()]);
        assert_eq!(record.suitability, 6);
    }
}
