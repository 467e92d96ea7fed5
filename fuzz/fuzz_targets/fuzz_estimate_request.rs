#![no_main]

use libfuzzer_sys::fuzz_target;
use license_estimator::{EstimateRequest, EstimatorConfig, Service};

fuzz_target!(|data: &[u8]| {
    let Ok(request) = serde_json::from_slice::<EstimateRequest>(data) else {
        return;
    };
    let Ok(service) = Service::new(EstimatorConfig::default()) else {
        return;
    };

    if let Ok(estimate) = service.estimate(&request) {
        let lines = estimate.lines();
        assert!(lines.iter().all(|line| line.quantity > 0));
        assert!(lines.windows(2).all(|pair| pair[0].track < pair[1].track));
    }
});
