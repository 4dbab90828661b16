//! Annual and monthly yield estimation
//!
//! annual_kwh = area x efficiency x peak_sun_hours x 365 x orientation_factor

use solar_types::{Orientation, SolarPotential};
use tracing::warn;

use crate::model::{PanelSpec, MONTHLY_FACTORS};
use crate::{round2, DomainError};

/// Yields above this are treated as implausible for a residential roof
pub const ANNUAL_ENERGY_LIMIT_KWH: f64 = 15_000.0;

/// Value substituted when the limit is exceeded
pub const ANNUAL_ENERGY_CAP_KWH: f64 = 10_000.0;

pub fn calculate_solar_potential(
    area_m2: f64,
    orientation: Orientation,
    panel: &PanelSpec,
    peak_sun_hours: f64,
) -> Result<SolarPotential, DomainError> {
    if area_m2.is_nan() || area_m2 <= 0.0 {
        return Err(DomainError::NonPositiveArea);
    }
    if peak_sun_hours.is_nan() || peak_sun_hours <= 0.0 {
        return Err(DomainError::NonPositiveSunHours);
    }

    let mut annual = area_m2 * panel.efficiency * peak_sun_hours * 365.0 * orientation.factor();
    if annual > ANNUAL_ENERGY_LIMIT_KWH {
        warn!(
            annual_kwh = annual,
            "Energy too high, capping at {}", ANNUAL_ENERGY_CAP_KWH
        );
        annual = ANNUAL_ENERGY_CAP_KWH;
    }

    let monthly = MONTHLY_FACTORS.iter().map(|f| round2(annual * f)).collect();

    Ok(SolarPotential {
        annual_energy_kwh: round2(annual),
        monthly_energy_kwh: monthly,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono() -> PanelSpec {
        PanelSpec {
            efficiency: 0.247,
            cost_per_watt: 27.0,
            subsidy_per_kw: 14588.0,
        }
    }

    #[test]
    fn test_small_roof_uncapped() {
        // 10 x 0.247 x 5.2 x 365 x 1.0 = 4688.06
        let potential = calculate_solar_potential(10.0, Orientation::South, &mono(), 5.2).unwrap();
        assert!((potential.annual_energy_kwh - 4688.06).abs() < 0.01);
        assert_eq!(potential.monthly_energy_kwh.len(), 12);
    }

    #[test]
    fn test_orientation_scales_yield() {
        let south = calculate_solar_potential(10.0, Orientation::South, &mono(), 5.2).unwrap();
        let north = calculate_solar_potential(10.0, Orientation::North, &mono(), 5.2).unwrap();
        let ratio = north.annual_energy_kwh / south.annual_energy_kwh;
        assert!((ratio - 0.65).abs() < 0.001);
    }

    #[test]
    fn test_large_roof_is_capped() {
        // 100 m² mocked roof gives ~46,881 kWh, well over the limit
        let potential = calculate_solar_potential(100.0, Orientation::South, &mono(), 5.2).unwrap();
        assert_eq!(potential.annual_energy_kwh, ANNUAL_ENERGY_CAP_KWH);
        assert!(potential
            .monthly_energy_kwh
            .iter()
            .all(|e| *e > 0.0 && *e <= 1000.0));
    }

    #[test]
    fn test_value_below_limit_is_not_capped() {
        let spec = PanelSpec {
            efficiency: 1.0,
            ..mono()
        };
        let potential =
            calculate_solar_potential(1.0, Orientation::South, &spec, 14_999.0 / 365.0).unwrap();
        assert!((potential.annual_energy_kwh - 14_999.0).abs() < 0.01);
    }

    #[test]
    fn test_monthly_sums_to_annual() {
        let potential = calculate_solar_potential(10.0, Orientation::East, &mono(), 5.0).unwrap();
        let sum: f64 = potential.monthly_energy_kwh.iter().sum();
        assert!((sum - potential.annual_energy_kwh).abs() < 0.1);
    }

    #[test]
    fn test_rejects_non_positive_area() {
        assert_eq!(
            calculate_solar_potential(0.0, Orientation::South, &mono(), 5.2),
            Err(DomainError::NonPositiveArea)
        );
        assert_eq!(
            calculate_solar_potential(-3.0, Orientation::South, &mono(), 5.2),
            Err(DomainError::NonPositiveArea)
        );
        assert_eq!(
            calculate_solar_potential(f64::NAN, Orientation::South, &mono(), 5.2),
            Err(DomainError::NonPositiveArea)
        );
    }
}
