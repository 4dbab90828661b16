use serde::{Deserialize, Serialize};

/// Share of annual yield produced in each month, January first. Sums to 1.0.
pub const MONTHLY_FACTORS: [f64; 12] = [
    0.08, 0.09, 0.10, 0.09, 0.09, 0.08, 0.07, 0.08, 0.08, 0.09, 0.08, 0.07,
];

/// Installation and grid pricing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    /// Fixed INR cost added to every installation
    pub installation_cost: f64,
    /// INR per kWh saved
    pub electricity_rate: f64,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            installation_cost: 10_000.0,
            electricity_rate: 7.8,
        }
    }
}
