//! Domain errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Area must be positive")]
    NonPositiveArea,

    #[error("Peak sun hours must be positive")]
    NonPositiveSunHours,

    #[error("Energy must be a finite number")]
    InvalidEnergy,
}
