//! License Estimator Module
//!
//! Computes recommended license quantities for the security suite from raw
//! infrastructure counts and a feature selection.
//!
//! ## Architecture
//!
//! - **Normalizer**: weighted resource counts → posture/runtime workload scores
//! - **Validator**: rejects invalid feature combinations before pricing
//! - **Allocator**: minimum order quantity, pluggable split policy, add-ons
//! - **Formatter**: estimate or error → display text
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use license_estimator::{EstimatorConfig, LocalClient, Service};
//!
//! let service = Service::new(EstimatorConfig::load(None)?)?;
//! let client = LocalClient::new(Arc::new(service));
//! println!("{}", client.render(&request));
//! ```
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// Re-export SDK types
pub use license_estimator_sdk::*;

pub mod config;
pub mod domain;


pub use config::{ConfigError, EstimatorConfig, PolicyKind, ScoreTrack};
pub use domain::{LocalClient, Service};
