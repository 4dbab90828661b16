//! Installation advice derived from the rooftop record

use solar_types::{Orientation, PanelType, RooftopRecord, SurfaceType};

use super::suitability::adjusted_suitability;

const GENERAL_ADVICE: [&str; 4] = [
    "Secure permits from local discom (e.g., DTL in New Delhi).",
    "Comply with CEA standards (IS/IEC 61730).",
    "Clean panels 2-4 times yearly; use IoT monitoring.",
    "Leverage net metering under PM Surya Ghar Yojana.",
];

/// Build the ordered recommendation list for one rooftop.
///
/// `efficiency` is the panel's conversion fraction and is shown as a
/// percentage in the headline for highly suitable roofs.
pub fn generate_recommendations(
    record: &RooftopRecord,
    panel_type: PanelType,
    efficiency: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();
    let surface = record.surface_type.label().to_lowercase();
    let score = adjusted_suitability(record.suitability, record.surface_type);

    let headline = if score >= 7 {
        format!(
            "Highly suitable ({} rooftop); use {} panels ({:.2}% efficiency).",
            surface,
            panel_type,
            efficiency * 100.0
        )
    } else if score >= 4 {
        format!(
            "Moderately suitable ({} rooftop); {} panels recommended.",
            surface, panel_type
        )
    } else {
        format!(
            "Limited suitability ({} rooftop); consider alternatives.",
            surface
        )
    };
    recommendations.push(headline);

    if !record.obstructions.is_empty() {
        recommendations.push(format!(
            "Mitigate obstructions ({}).",
            record.obstructions_label()
        ));
    }
    if record.orientation != Orientation::South {
        recommendations.push(format!(
            "Adjust tilt (15-30°) for {} orientation.",
            record.orientation.name()
        ));
    }
    match record.surface_type {
        SurfaceType::Sloped => {
            recommendations.push("Ensure structural integrity for sloped installation.".to_string())
        }
        SurfaceType::Curved => {
            recommendations.push("Consider flexible panels for curved surfaces.".to_string())
        }
        SurfaceType::Flat => {}
    }

    recommendations.extend(GENERAL_ADVICE.iter().map(|s| s.to_string()));
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(suitability: u8, surface: SurfaceType, orientation: Orientation) -> RooftopRecord {
        RooftopRecord {
            area_m2: 100.0,
            orientation,
            obstructions: Vec::new(),
            suitability,
            surface_type: surface,
        }
    }

    #[test]
    fn test_clear_flat_south_roof() {
        let recs = generate_recommendations(
            &record(8, SurfaceType::Flat, Orientation::South),
            PanelType::Monocrystalline,
            0.247,
        );
        assert_eq!(
            recs[0],
            "Highly suitable (flat rooftop); use monocrystalline panels (24.70% efficiency)."
        );
        assert_eq!(recs.len(), 1 + GENERAL_ADVICE.len());
        assert_eq!(recs.last().unwrap(), GENERAL_ADVICE[3]);
    }

    #[test]
    fn test_obstructed_east_curved_roof() {
        let mut r = record(6, SurfaceType::Curved, Orientation::East);
        r.obstructions = vec!["building".to_string(), "tree".to_string()];

        let recs = generate_recommendations(&r, PanelType::Bifacial, 0.3211);

        // 6 - 2 = 4 -> moderate
        assert_eq!(
            recs[0],
            "Moderately suitable (curved rooftop); bifacial panels recommended."
        );
        assert_eq!(recs[1], "Mitigate obstructions (building, tree).");
        assert_eq!(recs[2], "Adjust tilt (15-30°) for east orientation.");
        assert_eq!(recs[3], "Consider flexible panels for curved surfaces.");
        assert_eq!(recs.len(), 4 + GENERAL_ADVICE.len());
    }

    #[test]
    fn test_limited_suitability() {
        let recs = generate_recommendations(
            &record(3, SurfaceType::Sloped, Orientation::South),
            PanelType::Perovskite,
            0.26,
        );
        assert_eq!(
            recs[0],
            "Limited suitability (sloped rooftop); consider alternatives."
        );
        assert_eq!(recs[1], "Ensure structural integrity for sloped installation.");
    }
}
