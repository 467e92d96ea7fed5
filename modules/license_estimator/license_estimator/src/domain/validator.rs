//! Feature selection validation.
//!
//! Runs before any pricing. Checks are ordered and the first failure wins.

use license_estimator_sdk::{EstimateError, Feature, FeatureSelection};

use crate::config::ApplicationSecurityConfig;

/// Reject invalid feature combinations.
///
/// # Errors
///
/// In order: [`EstimateError::NoFeatures`] when nothing is selected,
/// [`EstimateError::OrphanApplicationAddOn`] and
/// [`EstimateError::OrphanCloudAsmAddOn`] when an add-on has no core track,
/// and [`EstimateError::OrphanDeveloperSeats`] when seats are entered without
/// Application Security (only if `rules.require_add_on_for_seats`).
pub fn validate(
    selection: &FeatureSelection,
    developer_seats: u64,
    rules: &ApplicationSecurityConfig,
) -> Result<(), EstimateError> {
    if selection.is_empty() {
        return Err(EstimateError::NoFeatures);
    }

    let hosted = selection.has_core_track();
    if selection.contains(Feature::Application) && !hosted {
        return Err(EstimateError::OrphanApplicationAddOn);
    }
    if selection.contains(Feature::CloudAsm) && !hosted {
        return Err(EstimateError::OrphanCloudAsmAddOn);
    }

    if rules.require_add_on_for_seats
        && developer_seats > 0
        && !selection.contains(Feature::Application)
    {
        return Err(EstimateError::OrphanDeveloperSeats {
            seats: developer_seats,
        });
    }

    Ok(())
}
