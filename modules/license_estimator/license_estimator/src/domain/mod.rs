//! Domain layer for the license estimator.

pub mod allocator;
pub mod error;
pub mod formatter;
pub mod local_client;
pub mod normalizer;
pub mod policy;
pub mod service;
pub mod validator;

pub use allocator::{Allocation, Allocator};
pub use error::DomainError;
pub use local_client::LocalClient;
pub use normalizer::WorkloadScores;
pub use policy::{AllocationPolicy, CostOptimized, Plan, RuntimeAbsorbs, ThresholdSplit};
pub use service::Service;
