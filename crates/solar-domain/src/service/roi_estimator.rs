//! Cost, savings and payback estimation

use solar_types::RoiEstimate;
use tracing::warn;

use crate::model::{PanelSpec, Tariff, MONTHLY_FACTORS};
use crate::{round2, DomainError};

/// Above this the derived system size is considered implausible
const MAX_PLAUSIBLE_SIZE_KW: f64 = 7.0;
const MIN_CLAMPED_SIZE_KW: f64 = 0.1;
const MAX_CLAMPED_SIZE_KW: f64 = 5.0;

/// Paybacks shorter than this are replaced with `PAYBACK_FLOOR_YEARS`
const MIN_PLAUSIBLE_PAYBACK_YEARS: f64 = 3.0;
const PAYBACK_FLOOR_YEARS: f64 = 4.0;

pub fn estimate_roi(
    energy_kwh: f64,
    panel: &PanelSpec,
    peak_sun_hours: f64,
    tariff: &Tariff,
) -> Result<RoiEstimate, DomainError> {
    if !energy_kwh.is_finite() {
        return Err(DomainError::InvalidEnergy);
    }
    if peak_sun_hours.is_nan() || peak_sun_hours <= 0.0 {
        return Err(DomainError::NonPositiveSunHours);
    }

    let mut system_size_kw = energy_kwh / (peak_sun_hours * 365.0);
    if system_size_kw <= 0.0 || system_size_kw > MAX_PLAUSIBLE_SIZE_KW {
        warn!(
            system_size_kw,
            "Invalid system size, adjusting to {}-{}", MIN_CLAMPED_SIZE_KW, MAX_CLAMPED_SIZE_KW
        );
        system_size_kw = system_size_kw.clamp(MIN_CLAMPED_SIZE_KW, MAX_CLAMPED_SIZE_KW);
    }

    let total_cost = system_size_kw * 1000.0 * panel.cost_per_watt + tariff.installation_cost
        - panel.subsidy_per_kw * system_size_kw;
    let annual_savings = energy_kwh * tariff.electricity_rate;
    let monthly_savings = MONTHLY_FACTORS
        .iter()
        .map(|f| round2(energy_kwh * f * tariff.electricity_rate))
        .collect();

    let payback = if annual_savings > 0.0 {
        let years = total_cost / annual_savings;
        if years < MIN_PLAUSIBLE_PAYBACK_YEARS {
            warn!(
                payback_years = years,
                "Payback too short, setting to {}", PAYBACK_FLOOR_YEARS
            );
            Some(PAYBACK_FLOOR_YEARS)
        } else {
            Some(round2(years))
        }
    } else {
        None
    };

    Ok(RoiEstimate {
        system_size_kw: round2(system_size_kw),
        total_cost_inr: round2(total_cost),
        annual_savings_inr: round2(annual_savings),
        monthly_savings_inr: monthly_savings,
        payback_period_years: payback,
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
    fn test_new_delhi_monocrystalline() {
        let roi = estimate_roi(9360.0, &mono(), 5.2, &Tariff::default()).unwrap();

        assert!(roi.system_size_kw > 0.0 && roi.system_size_kw <= 5.0);
        assert!(roi.total_cost_inr > 0.0);
        // 9360 x 7.8
        assert!((roi.annual_savings_inr - 73008.0).abs() < 0.01);
        assert_eq!(roi.monthly_savings_inr.len(), 12);
        assert!(roi
            .monthly_savings_inr
            .iter()
            .all(|s| (400.0..=8000.0).contains(s)));
        // raw payback is under a year, raised to the floor
        assert_eq!(roi.payback_period_years, Some(4.0));
    }

    #[test]
    fn test_cost_formula() {
        // 1898 kWh / (5.2 x 365) = 1.0 kW
        let roi = estimate_roi(1898.0, &mono(), 5.2, &Tariff::default()).unwrap();
        assert!((roi.system_size_kw - 1.0).abs() < 0.01);
        // 1.0 x 27000 + 10000 - 14588 = 22412
        assert!((roi.total_cost_inr - 22412.0).abs() < 1.0);
        // 22412 / (1898 x 7.8) = 1.51 -> floor
        assert_eq!(roi.payback_period_years, Some(4.0));
    }

    #[test]
    fn test_long_payback_is_kept() {
        let tariff = Tariff {
            installation_cost: 10_000.0,
            electricity_rate: 1.0,
        };
        let roi = estimate_roi(1898.0, &mono(), 5.2, &tariff).unwrap();
        // 22412 / 1898 = 11.81
        let payback = roi.payback_period_years.unwrap();
        assert!((payback - 11.81).abs() < 0.01);
    }

    #[test]
    fn test_oversized_system_is_clamped() {
        // 20000 / (5.2 x 365) = 10.5 kW > 7
        let roi = estimate_roi(20_000.0, &mono(), 5.2, &Tariff::default()).unwrap();
        assert_eq!(roi.system_size_kw, 5.0);
    }

    #[test]
    fn test_zero_energy_has_no_payback() {
        let roi = estimate_roi(0.0, &mono(), 5.2, &Tariff::default()).unwrap();
        assert_eq!(roi.system_size_kw, 0.1);
        assert_eq!(roi.annual_savings_inr, 0.0);
        assert_eq!(roi.payback_period_years, None);
    }

    #[test]
    fn test_rejects_non_finite_energy() {
        assert_eq!(
            estimate_roi(f64::INFINITY, &mono(), 5.2, &Tariff::default()),
            Err(DomainError::InvalidEnergy)
        );
    }
}
