//! License allocation.
//!
//! Turns workload scores and a validated feature selection into billable
//! quantities: minimum order quantity on the core tracks, then the add-ons.

use license_estimator_sdk::{
    Estimate, Feature, FeatureSelection, LicenseLine, LicenseTrack, Rationale,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use super::error::DomainError;
use super::normalizer::WorkloadScores;
use super::policy::AllocationPolicy;
use crate::config::EstimatorConfig;

/// Billable quantity per track; zero means no line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Allocation {
    pub posture: u64,
    pub runtime: u64,
    pub application: u64,
    pub cloud_asm: u64,
    pub rationale: Option<Rationale>,
}

impl Allocation {
    /// Positive quantities as ordered license lines.
    ///
    /// An allocation with nothing to bill becomes
    /// [`Estimate::NoLicenseRequired`] and its rationale is dropped.
    #[must_use]
    pub fn into_estimate(self) -> Estimate {
        let lines: Vec<LicenseLine> = [
            (LicenseTrack::Posture, self.posture),
            (LicenseTrack::Runtime, self.runtime),
            (LicenseTrack::ApplicationSecurity, self.application),
            (LicenseTrack::CloudAsm, self.cloud_asm),
        ]
        .into_iter()
        .filter(|(_, quantity)| *quantity > 0)
        .map(|(track, quantity)| LicenseLine { track, quantity })
        .collect();

        if lines.is_empty() {
            Estimate::NoLicenseRequired
        } else {
            Estimate::Licensed {
                rationale: self.rationale,
                lines,
            }
        }
    }
}

/// Allocates license quantities under one configuration and policy.
pub struct Allocator<'a> {
    config: &'a EstimatorConfig,
    policy: &'a dyn AllocationPolicy,
}

impl<'a> Allocator<'a> {
    #[must_use]
    pub fn new(config: &'a EstimatorConfig, policy: &'a dyn AllocationPolicy) -> Self {
        Self { config, policy }
    }

    /// Allocate quantities for a selection that already passed validation.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::WorkloadOverflow`] when the Cloud ASM quantity
    /// does not fit in a `u64`.
    pub fn allocate(
        &self,
        scores: WorkloadScores,
        selection: &FeatureSelection,
        developer_seats: u64,
    ) -> Result<Allocation, DomainError> {
        let mut allocation = self.allocate_core(scores, selection);

        if selection.has_core_track() {
            if selection.contains(Feature::Application) {
                allocation.application =
                    developer_seats.max(self.config.application_security.seat_floor);
            }
            if selection.contains(Feature::CloudAsm) {
                allocation.cloud_asm = self.cloud_asm_quantity(scores)?;
            }
        }

        debug!(
            posture = allocation.posture,
            runtime = allocation.runtime,
            application = allocation.application,
            cloud_asm = allocation.cloud_asm,
            "Allocated licenses"
        );
        Ok(allocation)
    }

    fn allocate_core(&self, scores: WorkloadScores, selection: &FeatureSelection) -> Allocation {
        let posture = selection.contains(Feature::Posture);
        let runtime = selection.contains(Feature::Runtime);
        match (posture, runtime) {
            (true, false) => self.posture_only(scores),
            (_, true) => self.runtime_selected(scores),
            (false, false) => Allocation::default(),
        }
    }

    /// Posture is the only core track, so it bills runtime demand too.
    fn posture_only(&self, scores: WorkloadScores) -> Allocation {
        let moq = self.config.moq;
        let effective = scores.total();
        if effective == 0 {
            return Allocation::default();
        }

        Allocation {
            posture: effective.max(moq),
            rationale: (effective < moq)
                .then_some(Rationale::PostureMinimumApplied { effective, moq }),
            ..Allocation::default()
        }
    }

    fn runtime_selected(&self, scores: WorkloadScores) -> Allocation {
        let moq = self.config.moq;
        if scores.posture >= moq || scores.runtime >= moq {
            return Allocation {
                posture: scores.posture,
                runtime: scores.runtime,
                ..Allocation::default()
            };
        }
        if scores.is_zero() {
            return Allocation::default();
        }

        let split = self.policy.split_minimum(scores, moq, self.config.weights);
        debug!(
            policy = self.policy.name(),
            absorber = ?split.absorber,
            "Minimum order quantity split"
        );
        Allocation {
            posture: split.plan.posture,
            runtime: split.plan.runtime,
            rationale: Some(split.rationale(moq)),
            ..Allocation::default()
        }
    }

    fn cloud_asm_quantity(&self, scores: WorkloadScores) -> Result<u64, DomainError> {
        Decimal::from(scores.total())
            .checked_mul(self.config.cloud_asm.multiplier)
            .and_then(|units| units.ceil().to_u64())
            .ok_or_else(|| DomainError::overflow("cloud ASM"))
    }
}
