//! Configuration for the license estimator.
//!
//! The ratio table, minimum order quantity and allocation policy are plain
//! data. A service is built from one immutable [`EstimatorConfig`]; variants
//! of the pricing rules are expressed by overriding entries, not by code.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use license_estimator_sdk::ResourceKinds;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix for environment overrides, e.g. `LICENSE_ESTIMATOR_MOQ=150`.
pub const ENV_PREFIX: &str = "LICENSE_ESTIMATOR_";

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to load estimator configuration: {0}")]
    Load(#[source] Box<figment::Error>),

    #[error("minimum order quantity must be greater than zero")]
    InvalidMoq,

    #[error("cost weight for the {track} track must be greater than zero")]
    InvalidWeight { track: &'static str },

    #[error("conversion ratio for '{kind}' must be positive, got {ratio}")]
    InvalidRatio { kind: String, ratio: Decimal },

    #[error("cloud ASM multiplier must not be negative, got {multiplier}")]
    InvalidMultiplier { multiplier: Decimal },

    #[error(
        "resource '{kind}' is referenced by {role} but has no conversion ratio"
    )]
    UnknownResourceKind { kind: String, role: &'static str },
}

/// Aggregate a resource contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTrack {
    Posture,
    Runtime,
}

impl ScoreTrack {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Posture => "posture",
            Self::Runtime => "runtime",
        }
    }
}

/// Named rule set used when both tracks are below the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Load the minimum on whichever plan has the lower weighted cost.
    #[default]
    CostOptimized,
    /// Always load the minimum on Runtime.
    RuntimeAbsorbs,
    /// Load the minimum on Runtime once its demand reaches half the minimum.
    ThresholdSplit,
}

/// Workload units contributed per resource and the track they land on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceRatio {
    pub ratio: Decimal,
    pub track: ScoreTrack,
}

impl ResourceRatio {
    #[must_use]
    pub fn new(ratio: Decimal, track: ScoreTrack) -> Self {
        Self { ratio, track }
    }
}

/// Per-unit cost of each core track, used to compare allocation plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackWeights {
    pub posture: u64,
    pub runtime: u64,
}

impl Default for TrackWeights {
    fn default() -> Self {
        Self {
            posture: 1,
            runtime: 2,
        }
    }
}

/// Free container-image-scan allowance per deployed workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageScanConfig {
    /// Resource kind holding the image scan count.
    pub kind: String,
    /// Scans included for each deployed workload unit.
    pub free_per_workload: u64,
    /// Kinds counted as deployed workloads, each weighted by its own ratio.
    pub deployed_kinds: Vec<String>,
}

impl Default for ImageScanConfig {
    fn default() -> Self {
        Self {
            kind: ResourceKinds::CONTAINER_IMAGE_SCAN.to_owned(),
            free_per_workload: 10,
            deployed_kinds: vec![
                ResourceKinds::VM_STOPPED.to_owned(),
                ResourceKinds::VM_RUNNING.to_owned(),
                ResourceKinds::MANAGED_CONTAINER.to_owned(),
            ],
        }
    }
}

/// Sizing and validation rules for the Application Security add-on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApplicationSecurityConfig {
    /// Resource kind holding the developer seat count.
    pub seat_kind: String,
    /// Minimum quantity billed whenever the add-on is selected.
    pub seat_floor: u64,
    /// Reject seats entered without the add-on selected.
    pub require_add_on_for_seats: bool,
}

impl Default for ApplicationSecurityConfig {
    fn default() -> Self {
        Self {
            seat_kind: ResourceKinds::DEVELOPER_SEAT.to_owned(),
            seat_floor: 5,
            require_add_on_for_seats: true,
        }
    }
}

/// Sizing for the Cloud ASM add-on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloudAsmConfig {
    /// Add-on units per combined workload unit.
    pub multiplier: Decimal,
}

impl Default for CloudAsmConfig {
    fn default() -> Self {
        Self {
            multiplier: Decimal::new(1, 1),
        }
    }
}

/// License estimator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Minimum billable quantity once a committed track has demand.
    pub moq: u64,
    pub policy: PolicyKind,
    pub weights: TrackWeights,
    /// Conversion ratio table keyed by resource kind.
    pub resources: BTreeMap<String, ResourceRatio>,
    pub image_scan: ImageScanConfig,
    pub application_security: ApplicationSecurityConfig,
    pub cloud_asm: CloudAsmConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            moq: 200,
            policy: PolicyKind::default(),
            weights: TrackWeights::default(),
            resources: default_resources(),
            image_scan: ImageScanConfig::default(),
            application_security: ApplicationSecurityConfig::default(),
            cloud_asm: CloudAsmConfig::default(),
        }
    }
}

fn default_resources() -> BTreeMap<String, ResourceRatio> {
    use ScoreTrack::{Posture, Runtime};

    let one = Decimal::ONE;
    let tenth = Decimal::new(1, 1);
    [
        (ResourceKinds::VM_STOPPED, one, Runtime),
        (ResourceKinds::VM_RUNNING, one, Runtime),
        (ResourceKinds::MANAGED_CONTAINER, tenth, Runtime),
        (ResourceKinds::SERVERLESS_FUNCTION, Decimal::new(4, 2), Runtime),
        (ResourceKinds::CONTAINER_IMAGE_SCAN, tenth, Runtime),
        (ResourceKinds::CLOUD_BUCKET, tenth, Posture),
        (ResourceKinds::MANAGED_DATABASE, Decimal::new(5, 1), Posture),
        (ResourceKinds::STORAGE_TB, one, Posture),
        (ResourceKinds::SAAS_USER, tenth, Posture),
        (ResourceKinds::UNMANAGED_ASSET, Decimal::new(25, 2), Posture),
    ]
    .into_iter()
    .map(|(kind, ratio, track)| (kind.to_owned(), ResourceRatio::new(ratio, track)))
    .collect()
}

impl EstimatorConfig {
    /// Load configuration from defaults, an optional YAML file and
    /// `LICENSE_ESTIMATOR_*` environment variables, in that order of
    /// precedence (later wins). Nested keys use `__` in variable names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] when `path` does not exist,
    /// [`ConfigError::Load`] when a source cannot be parsed, and any
    /// validation error from [`EstimatorConfig::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))?;
        config.validate()?;

        tracing::info!(
            moq = config.moq,
            policy = ?config.policy,
            resources = config.resources.len(),
            "Loaded license estimator configuration"
        );
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: zero MOQ or weight, a
    /// non-positive ratio, a negative Cloud ASM multiplier, or an image-scan
    /// kind that is missing from the ratio table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.moq == 0 {
            return Err(ConfigError::InvalidMoq);
        }
        if self.weights.posture == 0 {
            return Err(ConfigError::InvalidWeight {
                track: ScoreTrack::Posture.as_str(),
            });
        }
        if self.weights.runtime == 0 {
            return Err(ConfigError::InvalidWeight {
                track: ScoreTrack::Runtime.as_str(),
            });
        }
        if let Some((kind, entry)) = self
            .resources
            .iter()
            .find(|(_, entry)| entry.ratio <= Decimal::ZERO)
        {
            return Err(ConfigError::InvalidRatio {
                kind: kind.clone(),
                ratio: entry.ratio,
            });
        }
        if self.cloud_asm.multiplier < Decimal::ZERO {
            return Err(ConfigError::InvalidMultiplier {
                multiplier: self.cloud_asm.multiplier,
            });
        }
        if !self.resources.contains_key(&self.image_scan.kind) {
            return Err(ConfigError::UnknownResourceKind {
                kind: self.image_scan.kind.clone(),
                role: "image_scan.kind",
            });
        }
        if let Some(kind) = self
            .image_scan
            .deployed_kinds
            .iter()
            .find(|kind| !self.resources.contains_key(*kind))
        {
            return Err(ConfigError::UnknownResourceKind {
                kind: kind.clone(),
                role: "image_scan.deployed_kinds",
            });
        }
        Ok(())
    }

    /// Ratio entry for `kind`, if configured.
    #[must_use]
    pub fn ratio(&self, kind: &str) -> Option<&ResourceRatio> {
        self.resources.get(kind)
    }
}
