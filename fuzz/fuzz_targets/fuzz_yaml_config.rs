#![no_main]

use figment::Figment;
use figment::providers::{Format, Serialized, Yaml};
use libfuzzer_sys::fuzz_target;
use license_estimator::{
    EstimateRequest, EstimatorConfig, Feature, FeatureSelection, ResourceCounts, ResourceKinds,
    Service,
};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Layer the YAML over defaults the same way file configs are loaded
    let Ok(config) = Figment::from(Serialized::defaults(EstimatorConfig::default()))
        .merge(Yaml::string(s))
        .extract::<EstimatorConfig>()
    else {
        return;
    };
    let Ok(service) = Service::new(config) else {
        return;
    };

    let request = EstimateRequest::new(
        ResourceCounts::new()
            .with(ResourceKinds::VM_RUNNING, 120)
            .with(ResourceKinds::CONTAINER_IMAGE_SCAN, 3_000)
            .with(ResourceKinds::CLOUD_BUCKET, 400),
        FeatureSelection::new()
            .with(Feature::Runtime)
            .with(Feature::CloudAsm),
    );
    let _ = service.estimate(&request);
});
