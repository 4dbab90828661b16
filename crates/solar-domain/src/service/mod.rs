//! Domain services

pub mod energy_calculator;
pub mod recommendations;
pub mod roi_estimator;
pub mod suitability;

pub use energy_calculator::{calculate_solar_potential, ANNUAL_ENERGY_CAP_KWH, ANNUAL_ENERGY_LIMIT_KWH};
pub use recommendations::generate_recommendations;
pub use roi_estimator::estimate_roi;
pub use suitability::{adjusted_suitability, suitability_from_obstructions};
