//! Domain service for license estimation.
//!
//! Owns the immutable configuration and the allocation policy, and runs the
//! pipeline: validate, normalize, allocate.

use license_estimator_sdk::{Estimate, EstimateRequest};
use tracing::{debug, warn};

use super::allocator::Allocator;
use super::error::DomainError;
use super::normalizer::{self, WorkloadScores};
use super::policy::{AllocationPolicy, policy_for};
use super::validator;
use crate::config::{ConfigError, EstimatorConfig};

/// License estimator service.
///
/// Stateless between calls; safe to share behind an `Arc`.
pub struct Service {
    config: EstimatorConfig,
    policy: Box<dyn AllocationPolicy>,
}

impl Service {
    /// Creates a service using the policy named in `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `config` fails validation.
    pub fn new(config: EstimatorConfig) -> Result<Self, ConfigError> {
        let policy = policy_for(config.policy);
        Self::with_policy(config, policy)
    }

    /// Creates a service with an explicit policy, ignoring `config.policy`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `config` fails validation.
    pub fn with_policy(
        config: EstimatorConfig,
        policy: Box<dyn AllocationPolicy>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, policy })
    }

    #[must_use]
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Workload scores for a request, without validation or allocation.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::WorkloadOverflow`] for out-of-range counts.
    pub fn workload(&self, request: &EstimateRequest) -> Result<WorkloadScores, DomainError> {
        normalizer::normalize(&request.counts, &self.config)
    }

    /// Compute the estimate for a request.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for an invalid feature selection
    /// and [`DomainError::WorkloadOverflow`] for out-of-range counts.
    pub fn estimate(&self, request: &EstimateRequest) -> Result<Estimate, DomainError> {
        let seats = request
            .counts
            .get(&self.config.application_security.seat_kind);

        if let Err(err) =
            validator::validate(&request.features, seats, &self.config.application_security)
        {
            warn!(error = %err, "Rejected feature selection");
            return Err(err.into());
        }

        let scores = self.workload(request)?;
        let allocator = Allocator::new(&self.config, self.policy.as_ref());
        let allocation = allocator.allocate(scores, &request.features, seats)?;
        let estimate = allocation.into_estimate();

        debug!(
            lines = estimate.lines().len(),
            policy = self.policy.name(),
            "Estimate computed"
        );
        Ok(estimate)
    }
}
