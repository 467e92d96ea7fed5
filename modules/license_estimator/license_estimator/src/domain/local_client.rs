//! Local client implementation of the estimator API.

use std::sync::Arc;

use license_estimator_sdk::{
    Estimate, EstimateError, EstimateRequest, Feature, LicenseEstimatorClient,
};

use super::formatter;
use super::service::Service;

/// Local implementation of the license estimator client.
///
/// This adapter wraps the domain service and implements the SDK trait.
#[derive(Clone)]
pub struct LocalClient {
    service: Arc<Service>,
}

impl LocalClient {
    /// Create a new local client wrapping the service.
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

impl LicenseEstimatorClient for LocalClient {
    #[tracing::instrument(skip_all, fields(
        posture = request.features.contains(Feature::Posture),
        runtime = request.features.contains(Feature::Runtime),
        application = request.features.contains(Feature::Application),
        cloud_asm = request.features.contains(Feature::CloudAsm),
    ))]
    fn estimate(&self, request: &EstimateRequest) -> Result<Estimate, EstimateError> {
        self.service.estimate(request).map_err(Into::into)
    }

    fn render(&self, request: &EstimateRequest) -> String {
        formatter::render_result(&self.estimate(request))
    }
}
