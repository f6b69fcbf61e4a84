use serde::{Deserialize, Serialize};

use crate::eligibility::{EligibilityConfig, PointsGate};
use crate::scoring::ScoringConfig;

/// Top-level config file.
///
/// Example YAML:
/// ```yaml
/// profile: ~/school/profile.json
/// catalogue: ~/school/degrees.json
/// scoring:
///   subject_limit: 6
///   excluded_subjects: ["Life Orientation"]
/// eligibility:
///   points_gate: raw_sum
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Candidate profile JSON (canonical or legacy shape)
    #[serde(default)]
    pub profile: Option<String>,

    /// Degree catalogue JSON
    #[serde(default)]
    pub catalogue: Option<String>,

    /// Marks tracker JSON (defaults to ~/.config/aps-check/marks.json)
    #[serde(default)]
    pub tracker: Option<String>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub eligibility: Option<EligibilityConfig>,
}

impl Config {
    /// Config written by `aps-check init`
    pub fn starter() -> Self {
        Self {
            profile: None,
            catalogue: None,
            tracker: None,
            scoring: Some(ScoringConfig::default()),
            eligibility: Some(EligibilityConfig {
                points_gate: Some(PointsGate::RawSum),
            }),
        }
    }
}
