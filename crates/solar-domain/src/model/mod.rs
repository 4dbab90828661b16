//! Domain model types

pub mod panel;
pub mod tariff;

pub use panel::PanelSpec;
pub use tariff::{Tariff, MONTHLY_FACTORS};
