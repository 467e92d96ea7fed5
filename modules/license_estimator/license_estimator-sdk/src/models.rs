//! Domain models for license estimation.
//!
//! Requests carry serde derives so a presentation layer can hand them over as
//! JSON; estimates are plain values.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifiers of the resource types the default configuration recognizes.
pub struct ResourceKinds;

impl ResourceKinds {
    pub const VM_STOPPED: &'static str = "vm-stopped";
    pub const VM_RUNNING: &'static str = "vm-running";
    pub const MANAGED_CONTAINER: &'static str = "managed-container";
    pub const SERVERLESS_FUNCTION: &'static str = "serverless-function";
    pub const CONTAINER_IMAGE_SCAN: &'static str = "container-image-scan";
    pub const CLOUD_BUCKET: &'static str = "cloud-bucket";
    pub const MANAGED_DATABASE: &'static str = "managed-database";
    pub const STORAGE_TB: &'static str = "storage-tb";
    pub const SAAS_USER: &'static str = "saas-user";
    pub const DEVELOPER_SEAT: &'static str = "developer-seat";
    pub const UNMANAGED_ASSET: &'static str = "unmanaged-asset";

    /// All recognized identifiers, in input-form order.
    pub const ALL: [&'static str; 11] = [
        Self::VM_STOPPED,
        Self::VM_RUNNING,
        Self::MANAGED_CONTAINER,
        Self::SERVERLESS_FUNCTION,
        Self::CONTAINER_IMAGE_SCAN,
        Self::CLOUD_BUCKET,
        Self::MANAGED_DATABASE,
        Self::STORAGE_TB,
        Self::SAAS_USER,
        Self::DEVELOPER_SEAT,
        Self::UNMANAGED_ASSET,
    ];
}

/// Raw per-resource counts entered by the user.
///
/// Absent kinds read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceCounts(BTreeMap<String, u64>);

impl ResourceCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for `kind`, or 0 when it was never set.
    #[must_use]
    pub fn get(&self, kind: &str) -> u64 {
        self.0.get(kind).copied().unwrap_or(0)
    }

    pub fn set(&mut self, kind: impl Into<String>, count: u64) {
        self.0.insert(kind.into(), count);
    }

    /// Set a count from raw form input.
    ///
    /// Leading whitespace and an optional `+` are skipped and the leading run
    /// of ASCII digits is parsed. Empty, non-numeric or negative input is
    /// stored as 0; digits beyond the `u64` range saturate at `u64::MAX`.
    pub fn set_lenient(&mut self, kind: impl Into<String>, raw: &str) {
        self.set(kind, parse_leading_digits(raw));
    }

    /// Builder form of [`ResourceCounts::set`].
    #[must_use]
    pub fn with(mut self, kind: impl Into<String>, count: u64) -> Self {
        self.set(kind, count);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(kind, count)| (kind.as_str(), *count))
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for ResourceCounts {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

fn parse_leading_digits(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if end == 0 {
        return 0;
    }
    // A run of digits too long for u64 saturates instead of reading as empty.
    unsigned[..end].parse().unwrap_or(u64::MAX)
}

/// A selectable product feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    Posture,
    Runtime,
    Application,
    CloudAsm,
}

impl Feature {
    /// Core tracks can be bought on their own; add-ons need a core track.
    #[must_use]
    pub fn is_core(self) -> bool {
        matches!(self, Self::Posture | Self::Runtime)
    }
}

/// The set of features ticked by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSelection(BTreeSet<Feature>);

impl FeatureSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: Feature) {
        self.0.insert(feature);
    }

    /// Builder form of [`FeatureSelection::insert`].
    #[must_use]
    pub fn with(mut self, feature: Feature) -> Self {
        self.insert(feature);
        self
    }

    #[must_use]
    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether Posture or Runtime is selected.
    #[must_use]
    pub fn has_core_track(&self) -> bool {
        self.0.iter().any(|f| f.is_core())
    }
}

impl FromIterator<Feature> for FeatureSelection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Input snapshot for one estimate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimateRequest {
    pub counts: ResourceCounts,
    pub features: FeatureSelection,
}

impl EstimateRequest {
    #[must_use]
    pub fn new(counts: ResourceCounts, features: FeatureSelection) -> Self {
        Self { counts, features }
    }
}

/// A billable license track. Declaration order is output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LicenseTrack {
    Posture,
    Runtime,
    ApplicationSecurity,
    CloudAsm,
}

impl LicenseTrack {
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Posture => "Posture Security",
            Self::Runtime => "Runtime Security",
            Self::ApplicationSecurity => "Application Security",
            Self::CloudAsm => "Cloud ASM",
        }
    }
}

impl fmt::Display for LicenseTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One recommended license quantity. Quantity is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LicenseLine {
    pub track: LicenseTrack,
    pub quantity: u64,
}

impl fmt::Display for LicenseLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} License Required: {}", self.track, self.quantity)
    }
}

/// How the track carrying the minimum was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitBasis {
    /// The cheaper of the two plans under the track weights.
    CostComparison,
    /// A fixed allocation rule, without comparing plan costs.
    FixedRule,
}

/// Note explaining why a quantity exceeds raw demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rationale {
    /// Posture alone was selected and its folded demand is below the minimum.
    PostureMinimumApplied { effective: u64, moq: u64 },
    /// Both tracks were below the minimum and Posture carries it.
    MinimumOnPosture { moq: u64, basis: SplitBasis },
    /// Both tracks were below the minimum and Runtime carries it.
    MinimumOnRuntime { moq: u64, basis: SplitBasis },
}

fn write_split(
    f: &mut fmt::Formatter<'_>,
    moq: u64,
    basis: SplitBasis,
    track: &str,
) -> fmt::Result {
    match basis {
        SplitBasis::CostComparison => write!(
            f,
            "Total workload is lower than MOQ ({moq}). Cost optimization suggests proposing MOQ on the {track} license."
        ),
        SplitBasis::FixedRule => write!(
            f,
            "Total workload is lower than MOQ ({moq}). The configured allocation rule proposes MOQ on the {track} license."
        ),
    }
}

impl fmt::Display for Rationale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::PostureMinimumApplied { effective, moq } => write!(
                f,
                "Total Posture workload ({effective}) is lower than MOQ ({moq}), hence MOQ is required to be proposed."
            ),
            Self::MinimumOnPosture { moq, basis } => write_split(f, moq, basis, "Posture"),
            Self::MinimumOnRuntime { moq, basis } => write_split(f, moq, basis, "Runtime"),
        }
    }
}

/// Outcome of a successful estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Estimate {
    /// At least one positive line, ordered Posture, Runtime, Application, Cloud ASM.
    Licensed {
        rationale: Option<Rationale>,
        lines: Vec<LicenseLine>,
    },
    /// Nothing to bill for these inputs.
    NoLicenseRequired,
}

impl Estimate {
    #[must_use]
    pub fn lines(&self) -> &[LicenseLine] {
        match self {
            Self::Licensed { lines, .. } => lines,
            Self::NoLicenseRequired => &[],
        }
    }

    #[must_use]
    pub fn rationale(&self) -> Option<&Rationale> {
        match self {
            Self::Licensed { rationale, .. } => rationale.as_ref(),
            Self::NoLicenseRequired => None,
        }
    }

    /// Quantity billed on `track`, 0 when it has no line.
    #[must_use]
    pub fn quantity(&self, track: LicenseTrack) -> u64 {
        self.lines()
            .iter()
            .find(|line| line.track == track)
            .map_or(0, |line| line.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_count_reads_zero() {
        let counts = ResourceCounts::new().with(ResourceKinds::VM_RUNNING, 4);
        assert_eq!(counts.get(ResourceKinds::VM_RUNNING), 4);
        assert_eq!(counts.get(ResourceKinds::SAAS_USER), 0);
    }

    #[test]
    fn test_set_lenient_parses_form_input() {
        let cases = [
            ("42", 42),
            ("  17", 17),
            ("+8", 8),
            ("12abc", 12),
            ("3.9", 3),
            ("", 0),
            ("abc", 0),
            ("-5", 0),
            ("99999999999999999999999", u64::MAX),
            ("+18446744073709551616", u64::MAX),
        ];
        for (raw, expected) in cases {
            let mut counts = ResourceCounts::new();
            counts.set_lenient(ResourceKinds::CLOUD_BUCKET, raw);
            assert_eq!(
                counts.get(ResourceKinds::CLOUD_BUCKET),
                expected,
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn test_feature_selection_core_track() {
        let addon_only = FeatureSelection::new().with(Feature::Application);
        assert!(!addon_only.has_core_track());
        assert!(addon_only.with(Feature::Runtime).has_core_track());
    }

    #[test]
    fn test_request_deserializes_from_json() {
        let json = r#"{
            "counts": { "cloud-bucket": 20, "developer-seat": 3 },
            "features": ["posture", "application", "cloud-asm"]
        }"#;
        let request: EstimateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.counts.get(ResourceKinds::CLOUD_BUCKET), 20);
        assert!(request.features.contains(Feature::CloudAsm));
        assert!(!request.features.contains(Feature::Runtime));
    }

    #[test]
    fn test_license_line_display() {
        let line = LicenseLine {
            track: LicenseTrack::Runtime,
            quantity: 210,
        };
        assert_eq!(line.to_string(), "Runtime Security License Required: 210");
    }

    #[test]
    fn test_split_rationale_names_its_basis() {
        let by_cost = Rationale::MinimumOnPosture {
            moq: 200,
            basis: SplitBasis::CostComparison,
        };
        assert_eq!(
            by_cost.to_string(),
            "Total workload is lower than MOQ (200). \
             Cost optimization suggests proposing MOQ on the Posture license."
        );

        let by_rule = Rationale::MinimumOnRuntime {
            moq: 150,
            basis: SplitBasis::FixedRule,
        };
        assert_eq!(
            by_rule.to_string(),
            "Total workload is lower than MOQ (150). \
             The configured allocation rule proposes MOQ on the Runtime license."
        );
    }

    #[test]
    fn test_estimate_quantity_lookup() {
        let estimate = Estimate::Licensed {
            rationale: None,
            lines: vec![LicenseLine {
                track: LicenseTrack::ApplicationSecurity,
                quantity: 8,
            }],
        };
        assert_eq!(estimate.quantity(LicenseTrack::ApplicationSecurity), 8);
        assert_eq!(estimate.quantity(LicenseTrack::Posture), 0);
        assert_eq!(
            Estimate::NoLicenseRequired.quantity(LicenseTrack::Posture),
            0
        );
    }
}
