//! Domain layer - panel and tariff models, energy / ROI / recommendation services

pub mod error;
pub mod model;
pub mod service;

pub use error::DomainError;

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
