//! License Estimator SDK
//!
//! This crate provides the public API for the `license_estimator` module:
//!
//! - [`LicenseEstimatorClient`] - Public API trait for consumers
//! - Request models ([`ResourceCounts`], [`FeatureSelection`], [`EstimateRequest`])
//! - Result models ([`Estimate`], [`LicenseLine`], [`Rationale`])
//! - [`EstimateError`] - Validation and internal errors
//!
//! ## Usage
//!
//! ```ignore
//! use license_estimator_sdk::{EstimateRequest, Feature, LicenseEstimatorClient, ResourceKinds};
//!
//! let mut request = EstimateRequest::default();
//! request.counts.set(ResourceKinds::CLOUD_BUCKET, 500);
//! request.features.insert(Feature::Posture);
//!
//! let estimate = client.estimate(&request)?;
//! ```
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::LicenseEstimatorClient;
pub use error::EstimateError;
pub use models::{
    Estimate, EstimateRequest, Feature, FeatureSelection, LicenseLine, LicenseTrack, Rationale,
    ResourceCounts, ResourceKinds, SplitBasis,
};
