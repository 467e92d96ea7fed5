//! Workload normalization.
//!
//! Converts raw resource counts into the posture and runtime workload scores.
//! Weighted sums are exact decimals; each aggregate is rounded up once, after
//! every contribution has been added.

use license_estimator_sdk::ResourceCounts;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use super::error::DomainError;
use crate::config::{EstimatorConfig, ScoreTrack};

/// Posture and runtime demand in whole workload units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkloadScores {
    pub posture: u64,
    pub runtime: u64,
}

impl WorkloadScores {
    #[must_use]
    pub fn new(posture: u64, runtime: u64) -> Self {
        Self { posture, runtime }
    }

    /// Combined demand. [`normalize`] guarantees this fits in a `u64`.
    #[must_use]
    pub fn total(self) -> u64 {
        self.posture.saturating_add(self.runtime)
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.posture == 0 && self.runtime == 0
    }
}

#[derive(Default)]
struct TrackSums {
    posture: Decimal,
    runtime: Decimal,
}

impl TrackSums {
    fn add(&mut self, track: ScoreTrack, units: Decimal) -> Result<(), DomainError> {
        let slot = match track {
            ScoreTrack::Posture => &mut self.posture,
            ScoreTrack::Runtime => &mut self.runtime,
        };
        *slot = slot
            .checked_add(units)
            .ok_or_else(|| DomainError::overflow(track.as_str()))?;
        Ok(())
    }
}

/// Compute workload scores for `counts` under `config`.
///
/// # Errors
///
/// Returns [`DomainError::WorkloadOverflow`] when a weighted sum, or the
/// combined score, does not fit in a `u64`.
pub fn normalize(
    counts: &ResourceCounts,
    config: &EstimatorConfig,
) -> Result<WorkloadScores, DomainError> {
    let mut sums = TrackSums::default();

    for (kind, entry) in &config.resources {
        let count = if *kind == config.image_scan.kind {
            billable_image_scans(counts, config)?
        } else {
            Decimal::from(counts.get(kind))
        };
        let units = count
            .checked_mul(entry.ratio)
            .ok_or_else(|| DomainError::overflow(entry.track.as_str()))?;
        sums.add(entry.track, units)?;
    }

    let scores = WorkloadScores {
        posture: round_up(sums.posture, ScoreTrack::Posture)?,
        runtime: round_up(sums.runtime, ScoreTrack::Runtime)?,
    };
    if scores.posture.checked_add(scores.runtime).is_none() {
        return Err(DomainError::overflow("combined"));
    }

    debug!(
        posture_units = %sums.posture,
        runtime_units = %sums.runtime,
        posture = scores.posture,
        runtime = scores.runtime,
        "Normalized workload"
    );
    Ok(scores)
}

/// Deployed workload units that earn free image scans.
fn deployed_workloads(
    counts: &ResourceCounts,
    config: &EstimatorConfig,
) -> Result<Decimal, DomainError> {
    config
        .image_scan
        .deployed_kinds
        .iter()
        .filter_map(|kind| config.ratio(kind).map(|entry| (kind, entry)))
        .try_fold(Decimal::ZERO, |acc, (kind, entry)| {
            Decimal::from(counts.get(kind))
                .checked_mul(entry.ratio)
                .and_then(|units| acc.checked_add(units))
                .ok_or_else(|| DomainError::overflow(entry.track.as_str()))
        })
}

/// Image scans left after the per-workload allowance.
///
/// The allowance only applies when there are both deployed workloads and
/// scans; otherwise every scan is billable.
fn billable_image_scans(
    counts: &ResourceCounts,
    config: &EstimatorConfig,
) -> Result<Decimal, DomainError> {
    let images = Decimal::from(counts.get(&config.image_scan.kind));
    let deployed = deployed_workloads(counts, config)?;
    if deployed <= Decimal::ZERO || images <= Decimal::ZERO {
        return Ok(images);
    }

    let quota = deployed
        .checked_mul(Decimal::from(config.image_scan.free_per_workload))
        .ok_or_else(|| DomainError::overflow("image scan quota"))?;
    Ok((images - quota).max(Decimal::ZERO))
}

fn round_up(units: Decimal, track: ScoreTrack) -> Result<u64, DomainError> {
    units
        .ceil()
        .to_u64()
        .ok_or_else(|| DomainError::overflow(track.as_str()))
}
