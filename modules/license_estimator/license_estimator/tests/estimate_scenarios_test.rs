//! End-to-end estimates through the local client.
//!
//! Each test builds a service from configuration, wraps it in a
//! [`LocalClient`] and checks the rendered text a user would see.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use license_estimator::config::ResourceRatio;
use license_estimator::{
    EstimateError, EstimateRequest, EstimatorConfig, Feature, FeatureSelection,
    LicenseEstimatorClient, LicenseTrack, LocalClient, PolicyKind, ResourceCounts, ResourceKinds,
    ScoreTrack, Service,
};
use rust_decimal::Decimal;

fn client_with(config: EstimatorConfig) -> LocalClient {
    LocalClient::new(Arc::new(Service::new(config).expect("valid config")))
}

fn client() -> LocalClient {
    client_with(EstimatorConfig::default())
}

fn request(counts: ResourceCounts, features: &[Feature]) -> EstimateRequest {
    EstimateRequest::new(counts, features.iter().copied().collect())
}

#[test]
fn zero_counts_need_no_license() {
    let req = request(ResourceCounts::new(), &[Feature::Posture]);
    assert_eq!(
        client().render(&req),
        "No license required based on your current inputs and feature selection."
    );
}

#[test]
fn posture_below_moq_is_raised_with_note() {
    // 500 buckets × 0.1 = 50 posture units.
    let req = request(
        ResourceCounts::new().with(ResourceKinds::CLOUD_BUCKET, 500),
        &[Feature::Posture],
    );
    assert_eq!(
        client().render(&req),
        "Total Posture workload (50) is lower than MOQ (200), hence MOQ is required to be proposed.\n\
         ---\n\
         Posture Security License Required: 200"
    );
}

#[test]
fn small_runtime_demand_puts_moq_on_posture() {
    let req = request(
        ResourceCounts::new()
            .with(ResourceKinds::CLOUD_BUCKET, 100)
            .with(ResourceKinds::VM_RUNNING, 10),
        &[Feature::Runtime],
    );
    assert_eq!(
        client().render(&req),
        "Total workload is lower than MOQ (200). Cost optimization suggests proposing MOQ on the Posture license.\n\
         ---\n\
         Posture Security License Required: 200\n\
         Runtime Security License Required: 10"
    );
}

#[test]
fn nothing_selected_is_rejected() {
    let req = request(
        ResourceCounts::new().with(ResourceKinds::VM_RUNNING, 40),
        &[],
    );
    assert_eq!(client().estimate(&req), Err(EstimateError::NoFeatures));
    assert_eq!(
        client().render(&req),
        "None of the features are chosen, please try again"
    );
}

#[test]
fn application_without_core_track_is_rejected() {
    let req = request(
        ResourceCounts::new().with(ResourceKinds::DEVELOPER_SEAT, 3),
        &[Feature::Application],
    );
    assert_eq!(
        client().estimate(&req),
        Err(EstimateError::OrphanApplicationAddOn)
    );
}

#[test]
fn application_only_demand_renders_single_line() {
    let req = request(
        ResourceCounts::new().with(ResourceKinds::DEVELOPER_SEAT, 8),
        &[Feature::Posture, Feature::Application],
    );
    assert_eq!(
        client().render(&req),
        "Application Security License Required: 8"
    );
}

#[test]
fn seats_without_application_are_rejected() {
    let req = request(
        ResourceCounts::new()
            .with(ResourceKinds::VM_RUNNING, 500)
            .with(ResourceKinds::DEVELOPER_SEAT, 1),
        &[Feature::Runtime],
    );
    assert_eq!(
        client().render(&req),
        "Application Security is not chosen but developers quantity is more than 0. \
         Please select Application Security or set Developers to 0."
    );
}

#[test]
fn full_selection_lists_every_track_in_order() {
    let req = request(
        ResourceCounts::new()
            .with(ResourceKinds::VM_RUNNING, 180)
            .with(ResourceKinds::SERVERLESS_FUNCTION, 600)
            .with(ResourceKinds::MANAGED_DATABASE, 60)
            .with(ResourceKinds::DEVELOPER_SEAT, 2),
        &[
            Feature::Posture,
            Feature::Runtime,
            Feature::Application,
            Feature::CloudAsm,
        ],
    );
    // runtime 180 + 24 = 204, posture 30; cloud ASM (234 × 0.1) → 24.
    assert_eq!(
        client().render(&req),
        "Posture Security License Required: 30\n\
         Runtime Security License Required: 204\n\
         Application Security License Required: 5\n\
         Cloud ASM License Required: 24"
    );
}

#[test]
fn runtime_absorbs_policy_from_config() {
    let config = EstimatorConfig {
        policy: PolicyKind::RuntimeAbsorbs,
        ..EstimatorConfig::default()
    };
    let req = request(
        ResourceCounts::new()
            .with(ResourceKinds::CLOUD_BUCKET, 1_200)
            .with(ResourceKinds::VM_RUNNING, 30),
        &[Feature::Posture, Feature::Runtime],
    );
    let estimate = client_with(config).estimate(&req).unwrap();
    // Runtime is raised by 170, which more than covers 120 posture units.
    assert_eq!(estimate.quantity(LicenseTrack::Posture), 0);
    assert_eq!(estimate.quantity(LicenseTrack::Runtime), 200);
    assert_eq!(
        estimate.rationale().map(ToString::to_string).as_deref(),
        Some(
            "Total workload is lower than MOQ (200). The configured allocation rule proposes MOQ on the Runtime license."
        )
    );
}

#[test]
fn threshold_split_policy_from_config() {
    let config = EstimatorConfig {
        policy: PolicyKind::ThresholdSplit,
        ..EstimatorConfig::default()
    };
    let client = client_with(config);

    let below = request(
        ResourceCounts::new().with(ResourceKinds::VM_RUNNING, 99),
        &[Feature::Runtime],
    );
    let estimate = client.estimate(&below).unwrap();
    assert_eq!(estimate.quantity(LicenseTrack::Posture), 200);
    assert_eq!(estimate.quantity(LicenseTrack::Runtime), 99);

    let at = request(
        ResourceCounts::new().with(ResourceKinds::VM_RUNNING, 100),
        &[Feature::Runtime],
    );
    let estimate = client.estimate(&at).unwrap();
    assert_eq!(estimate.quantity(LicenseTrack::Posture), 0);
    assert_eq!(estimate.quantity(LicenseTrack::Runtime), 200);
}

#[test]
fn image_scans_on_posture_track() {
    let mut config = EstimatorConfig::default();
    config.resources.insert(
        ResourceKinds::CONTAINER_IMAGE_SCAN.to_owned(),
        ResourceRatio::new(Decimal::new(1, 1), ScoreTrack::Posture),
    );
    let req = request(
        ResourceCounts::new()
            .with(ResourceKinds::VM_RUNNING, 250)
            .with(ResourceKinds::CONTAINER_IMAGE_SCAN, 3_000),
        &[Feature::Posture, Feature::Runtime],
    );
    // 3000 - 2500 free = 500 billable scans → 50 posture units.
    let estimate = client_with(config).estimate(&req).unwrap();
    assert_eq!(estimate.quantity(LicenseTrack::Posture), 50);
    assert_eq!(estimate.quantity(LicenseTrack::Runtime), 250);
}

#[test]
fn moq_override_changes_minimum() {
    let config = EstimatorConfig {
        moq: 50,
        ..EstimatorConfig::default()
    };
    let req = request(
        ResourceCounts::new().with(ResourceKinds::STORAGE_TB, 20),
        &[Feature::Posture],
    );
    assert_eq!(
        client_with(config).render(&req),
        "Total Posture workload (20) is lower than MOQ (50), hence MOQ is required to be proposed.\n\
         ---\n\
         Posture Security License Required: 50"
    );
}

#[test]
fn form_input_is_parsed_leniently() {
    let mut counts = ResourceCounts::new();
    counts.set_lenient(ResourceKinds::VM_RUNNING, " 250 ");
    counts.set_lenient(ResourceKinds::SAAS_USER, "abc");
    counts.set_lenient(ResourceKinds::DEVELOPER_SEAT, "");
    let req = EstimateRequest::new(counts, FeatureSelection::new().with(Feature::Runtime));
    assert_eq!(
        client().render(&req),
        "Runtime Security License Required: 250"
    );
}

#[test]
fn oversized_form_count_saturates_instead_of_vanishing() {
    let mut counts = ResourceCounts::new();
    counts.set_lenient(ResourceKinds::VM_RUNNING, "99999999999999999999999");
    let req = EstimateRequest::new(counts, FeatureSelection::new().with(Feature::Runtime));
    assert_eq!(
        client().render(&req),
        "Runtime Security License Required: 18446744073709551615"
    );
}

#[test]
fn saturated_form_counts_report_overflow() {
    let mut counts = ResourceCounts::new();
    counts.set_lenient(ResourceKinds::VM_RUNNING, "99999999999999999999999");
    counts.set_lenient(ResourceKinds::VM_STOPPED, "99999999999999999999999");
    let req = EstimateRequest::new(counts, FeatureSelection::new().with(Feature::Runtime));

    let err = client().estimate(&req).unwrap_err();
    assert!(!err.is_validation(), "unexpected error: {err}");
    assert_eq!(
        client().render(&req),
        "Internal error: runtime workload exceeds the supported range"
    );
}

#[test]
fn json_request_round_trip_through_client() {
    let req: EstimateRequest = serde_json::from_str(
        r#"{
            "counts": { "vm-stopped": 120, "managed-container": 900 },
            "features": ["runtime", "cloud-asm"]
        }"#,
    )
    .unwrap();
    // runtime 120 + 90 = 210; cloud ASM 21.
    assert_eq!(
        client().render(&req),
        "Runtime Security License Required: 210\nCloud ASM License Required: 21"
    );
}
