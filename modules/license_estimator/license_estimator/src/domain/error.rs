//! Domain errors for the license estimator.

use license_estimator_sdk::EstimateError;
use thiserror::Error;

/// Domain-level errors for estimate computation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Feature selection rejected before pricing
    #[error(transparent)]
    Validation(#[from] EstimateError),

    /// Weighted workload does not fit the integer range
    #[error("{track} workload exceeds the supported range")]
    WorkloadOverflow { track: &'static str },
}

impl DomainError {
    #[must_use]
    pub fn overflow(track: &'static str) -> Self {
        Self::WorkloadOverflow { track }
    }
}

/// Convert domain errors to SDK errors for API boundary.
impl From<DomainError> for EstimateError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(err) => err,
            DomainError::WorkloadOverflow { track } => {
                EstimateError::internal(format!("{track} workload exceeds the supported range"))
            }
        }
    }
}
