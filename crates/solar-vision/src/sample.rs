//! Synthetic rooftop image for demos

use image::{ImageFormat, Rgb, RgbImage};
use solar_types::Result;
use std::path::Path;

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;
const GROUND: Rgb<u8> = Rgb([100, 100, 100]);
const ROOF: Rgb<u8> = Rgb([150, 150, 150]);
const OUTLINE: Rgb<u8> = Rgb([0, 0, 0]);
const TREE: Rgb<u8> = Rgb([0, 100, 0]);

/// Roof rectangle as (left, top, right, bottom), inclusive
const ROOF_RECT: (u32, u32, u32, u32) = (200, 200, 1700, 880);
const OUTLINE_WIDTH: u32 = 5;
/// Tree bounding boxes as (left, top, right, bottom)
const TREES: [(u32, u32, u32, u32); 2] = [(300, 300, 400, 400), (1400, 600, 1500, 700)];

fn in_ellipse(x: u32, y: u32, (left, top, right, bottom): (u32, u32, u32, u32)) -> bool {
    let cx = (left + right) as f64 / 2.0;
    let cy = (top + bottom) as f64 / 2.0;
    let rx = (right - left) as f64 / 2.0;
    let ry = (bottom - top) as f64 / 2.0;
    let dx = (x as f64 - cx) / rx;
    let dy = (y as f64 - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

fn pixel(x: u32, y: u32) -> Rgb<u8> {
    if TREES.iter().any(|&tree| in_ellipse(x, y, tree)) {
        return TREE;
    }
    let (left, top, right, bottom) = ROOF_RECT;
    if x < left || x > right || y < top || y > bottom {
        return GROUND;
    }
    let edge = (x - left).min(right - x).min(y - top).min(bottom - y);
    if edge < OUTLINE_WIDTH {
        OUTLINE
    } else {
        ROOF
    }
}

/// Write a 1920x1080 PNG of a gray roof with two trees
pub fn generate_sample_rooftop_image(output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let image = RgbImage::from_fn(WIDTH, HEIGHT, pixel);
    image.save_with_format(output_path, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{ObstructionDetector, VegetationDetector};
    use crate::rooftop::analyze_rooftop_image;
    use tempfile::tempdir;

    #[test]
    fn test_sample_has_one_tree_obstruction() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples").join("sample_rooftop_1.png");
        generate_sample_rooftop_image(&path).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (WIDTH, HEIGHT));

        let detector = VegetationDetector::default();
        assert_eq!(detector.detect(&decoded).len(), 1);

        let record = analyze_rooftop_image(&path, &detector).unwrap();
        assert_eq!(record.obstructions, vec!["tree".to_string()]);
        assert_eq!(record.suitability, 7);
    }
}
