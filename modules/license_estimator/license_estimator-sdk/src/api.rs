//! `LicenseEstimatorClient` trait definition.
//!
//! The estimator is a pure, synchronous computation: one call maps a request
//! snapshot to an estimate. Implementations hold no mutable state and can be
//! shared across threads.

use crate::error::EstimateError;
use crate::models::{Estimate, EstimateRequest};

/// Public API trait for the license estimator.
///
/// Obtained from the implementation crate:
/// ```ignore
/// let client: Arc<dyn LicenseEstimatorClient> = Arc::new(LocalClient::new(service));
/// ```
pub trait LicenseEstimatorClient: Send + Sync {
    /// Compute the recommended license lines for a request.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the feature selection is invalid
    /// (nothing selected, an add-on without a core track, or developer seats
    /// without the Application Security add-on). Returns
    /// [`EstimateError::Internal`] when the counts overflow the workload range.
    fn estimate(&self, request: &EstimateRequest) -> Result<Estimate, EstimateError>;

    /// Compute an estimate and render it (or the error) as display text.
    fn render(&self, request: &EstimateRequest) -> String;
}
