//! Suitability scoring on a 1-10 scale

use solar_types::SurfaceType;

const BASE_SUITABILITY: i32 = 8;

fn clamp_score(score: i32) -> u8 {
    score.clamp(1, 10) as u8
}

/// 8 for an unobstructed roof, one point less per distinct obstruction
pub fn suitability_from_obstructions(obstruction_count: usize) -> u8 {
    let count = i32::try_from(obstruction_count).unwrap_or(i32::MAX);
    clamp_score(BASE_SUITABILITY.saturating_sub(count))
}

/// Score after the surface-shape penalty
pub fn adjusted_suitability(suitability: u8, surface: SurfaceType) -> u8 {
    clamp_score(suitability as i32 + surface.suitability_adjustment())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_obstructions() {
        assert_eq!(suitability_from_obstructions(0), 8);
        assert_eq!(suitability_from_obstructions(1), 7);
        assert_eq!(suitability_from_obstructions(3), 5);
        assert_eq!(suitability_from_obstructions(20), 1);
    }

    #[test]
    fn test_surface_adjustment() {
        assert_eq!(adjusted_suitability(8, SurfaceType::Flat), 8);
        assert_eq!(adjusted_suitability(8, SurfaceType::Sloped), 7);
        assert_eq!(adjusted_suitability(8, SurfaceType::Curved), 6);
        assert_eq!(adjusted_suitability(1, SurfaceType::Curved), 1);
    }
}
