//! Error types for license estimation.

use thiserror::Error;

/// Errors returned by a license estimate.
///
/// Validation variants carry the exact message shown to the user; they are
/// fatal to the computation and never accompany partial results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    /// No feature was selected at all.
    #[error("None of the features are chosen, please try again")]
    NoFeatures,

    /// Application Security selected without Posture or Runtime.
    #[error(
        "Application Security can only be added as add-ons, on top of Posture Security or Runtime Security"
    )]
    OrphanApplicationAddOn,

    /// Cloud ASM selected without Posture or Runtime.
    #[error(
        "Cloud ASM can only be added as add-ons, on top of Posture Security or Runtime Security"
    )]
    OrphanCloudAsmAddOn,

    /// Developer seats entered while Application Security is not selected.
    #[error(
        "Application Security is not chosen but developers quantity is more than 0. Please select Application Security or set Developers to 0."
    )]
    OrphanDeveloperSeats {
        /// Number of developer seats entered
        seats: u64,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message
        message: String,
    },
}

impl EstimateError {
    /// Create an internal error with a message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error comes from feature validation rather than arithmetic.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Internal { .. })
    }
}
