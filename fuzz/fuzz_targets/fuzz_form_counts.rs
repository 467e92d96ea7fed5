#![no_main]

use libfuzzer_sys::fuzz_target;
use license_estimator::{
    EstimateRequest, EstimatorConfig, Feature, FeatureSelection, ResourceCounts, ResourceKinds,
    Service,
};

fuzz_target!(|data: &[u8]| {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };

    // One raw form field per line, in input-form order
    let mut counts = ResourceCounts::new();
    for (kind, raw) in ResourceKinds::ALL.iter().zip(text.lines()) {
        counts.set_lenient(*kind, raw);
    }

    let features: FeatureSelection = [
        Feature::Posture,
        Feature::Runtime,
        Feature::Application,
        Feature::CloudAsm,
    ]
    .into_iter()
    .enumerate()
    .filter(|(bit, _)| flags & (1 << bit) != 0)
    .map(|(_, feature)| feature)
    .collect();

    let Ok(service) = Service::new(EstimatorConfig::default()) else {
        return;
    };
    let _ = service.estimate(&EstimateRequest::new(counts, features));
});
