//! Panel type specifications and the price catalog

use moka::sync::Cache;
use solar_domain::model::PanelSpec;
use solar_types::PanelType;
use std::time::Duration;
use tracing::debug;

const MONO_EFFICIENCY: f64 = 0.247;
const SUBSIDY_PER_KW: f64 = 14_588.0;

/// Static figures for a panel type
pub fn get_panel_spec(panel_type: PanelType) -> PanelSpec {
    match panel_type {
        PanelType::Monocrystalline => PanelSpec {
            efficiency: MONO_EFFICIENCY,
            cost_per_watt: 27.0,
            subsidy_per_kw: SUBSIDY_PER_KW,
        },
        PanelType::Bifacial => PanelSpec {
            efficiency: MONO_EFFICIENCY * 1.3,
            cost_per_watt: 30.0,
            subsidy_per_kw: SUBSIDY_PER_KW,
        },
        PanelType::Perovskite => PanelSpec {
            efficiency: 0.26,
            cost_per_watt: 25.0,
            subsidy_per_kw: SUBSIDY_PER_KW,
        },
    }
}

/// Lookup by name; unknown names get monocrystalline figures
pub fn get_panel_spec_by_name(name: &str) -> PanelSpec {
    let panel_type = name.parse::<PanelType>().unwrap_or_default();
    get_panel_spec(panel_type)
}

/// Panel prices memoised with a TTL, standing in for a live price feed
pub struct PanelCatalog {
    prices: Cache<PanelType, PanelSpec>,
}

impl Default for PanelCatalog {
    fn default() -> Self {
        Self::new(50, Duration::from_secs(24 * 60 * 60))
    }
}

impl PanelCatalog {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        Self {
            prices: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn fetch(&self, panel_type: PanelType) -> PanelSpec {
        self.prices.get_with(panel_type, || {
            debug!(panel = %panel_type, "Loading panel prices");
            get_panel_spec(panel_type)
        })
    }
}
