//! Allocation policies for demand below the minimum order quantity.
//!
//! When Runtime is selected and neither track reaches the minimum on its own,
//! one track has to carry the minimum commitment. The two candidate plans are
//! fixed; policies only differ in which one they pick.

use license_estimator_sdk::{Rationale, SplitBasis};
use tracing::debug;

use super::normalizer::WorkloadScores;
use crate::config::{PolicyKind, TrackWeights};

/// Core-track quantities of one candidate plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub posture: u64,
    pub runtime: u64,
}

impl Plan {
    /// Posture carries the minimum; runtime bills its own demand.
    #[must_use]
    pub fn posture_absorbs(demand: WorkloadScores, moq: u64) -> Self {
        Self {
            posture: demand.posture.max(moq),
            runtime: demand.runtime,
        }
    }

    /// Runtime carries the minimum; its spare capacity is credited against
    /// posture demand.
    #[must_use]
    pub fn runtime_absorbs(demand: WorkloadScores, moq: u64) -> Self {
        let runtime = demand.runtime.max(moq);
        let excess = runtime - demand.runtime;
        Self {
            posture: demand.posture.saturating_sub(excess),
            runtime,
        }
    }

    /// Weighted cost of the plan.
    #[must_use]
    pub fn cost(self, weights: TrackWeights) -> u128 {
        let posture = u128::from(self.posture) * u128::from(weights.posture);
        let runtime = u128::from(self.runtime) * u128::from(weights.runtime);
        posture.saturating_add(runtime)
    }
}

/// Track that carries the minimum in a chosen split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absorber {
    Posture,
    Runtime,
}

/// Outcome of a policy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub plan: Plan,
    pub absorber: Absorber,
    pub basis: SplitBasis,
}

impl Split {
    #[must_use]
    pub fn on_posture(demand: WorkloadScores, moq: u64, basis: SplitBasis) -> Self {
        Self {
            plan: Plan::posture_absorbs(demand, moq),
            absorber: Absorber::Posture,
            basis,
        }
    }

    #[must_use]
    pub fn on_runtime(demand: WorkloadScores, moq: u64, basis: SplitBasis) -> Self {
        Self {
            plan: Plan::runtime_absorbs(demand, moq),
            absorber: Absorber::Runtime,
            basis,
        }
    }

    #[must_use]
    pub fn rationale(self, moq: u64) -> Rationale {
        let basis = self.basis;
        match self.absorber {
            Absorber::Posture => Rationale::MinimumOnPosture { moq, basis },
            Absorber::Runtime => Rationale::MinimumOnRuntime { moq, basis },
        }
    }
}

/// Chooses which track absorbs the minimum when both are below it.
///
/// Called only with at least one non-zero score and both scores below `moq`.
pub trait AllocationPolicy: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    fn split_minimum(&self, demand: WorkloadScores, moq: u64, weights: TrackWeights) -> Split;
}

/// Pick the cheaper plan; ties go to Posture.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostOptimized;

impl AllocationPolicy for CostOptimized {
    fn name(&self) -> &'static str {
        "cost-optimized"
    }

    fn split_minimum(&self, demand: WorkloadScores, moq: u64, weights: TrackWeights) -> Split {
        let on_posture = Split::on_posture(demand, moq, SplitBasis::CostComparison);
        let on_runtime = Split::on_runtime(demand, moq, SplitBasis::CostComparison);
        let posture_cost = on_posture.plan.cost(weights);
        let runtime_cost = on_runtime.plan.cost(weights);
        debug!(posture_cost, runtime_cost, "Compared plans");

        if posture_cost <= runtime_cost {
            on_posture
        } else {
            on_runtime
        }
    }
}

/// Always load the minimum on Runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeAbsorbs;

impl AllocationPolicy for RuntimeAbsorbs {
    fn name(&self) -> &'static str {
        "runtime-absorbs"
    }

    fn split_minimum(&self, demand: WorkloadScores, moq: u64, _weights: TrackWeights) -> Split {
        Split::on_runtime(demand, moq, SplitBasis::FixedRule)
    }
}

/// Load the minimum on Runtime once its demand covers half the minimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdSplit;

impl AllocationPolicy for ThresholdSplit {
    fn name(&self) -> &'static str {
        "threshold-split"
    }

    fn split_minimum(&self, demand: WorkloadScores, moq: u64, _weights: TrackWeights) -> Split {
        if u128::from(demand.runtime) * 2 >= u128::from(moq) {
            Split::on_runtime(demand, moq, SplitBasis::FixedRule)
        } else {
            Split::on_posture(demand, moq, SplitBasis::FixedRule)
        }
    }
}

/// Policy instance for a configured kind.
#[must_use]
pub fn policy_for(kind: PolicyKind) -> Box<dyn AllocationPolicy> {
    match kind {
        PolicyKind::CostOptimized => Box::new(CostOptimized),
        PolicyKind::RuntimeAbsorbs => Box::new(RuntimeAbsorbs),
        PolicyKind::ThresholdSplit => Box::new(ThresholdSplit),
    }
}
