use serde::{Deserialize, Serialize};

/// Performance and price constants for one panel material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    /// Fraction of incident energy converted (0.0-1.0)
    pub efficiency: f64,
    /// INR per watt of capacity
    pub cost_per_watt: f64,
    /// INR of government subsidy per kW installed
    pub subsidy_per_kw: f64,
}
