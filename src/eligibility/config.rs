use serde::{Deserialize, Serialize};

/// Which number the points gate compares against `Degree::point_requirement`.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PointsGate {
    /// Sum of raw percentages across all subjects
    #[default]
    RawSum,
    /// Banded APS from the scoring configuration
    Aps,
}

/// Eligibility configuration.
///
/// Example YAML:
/// ```yaml
/// eligibility:
///   points_gate: aps
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EligibilityConfig {
    #[serde(default)]
    pub points_gate: Option<PointsGate>,
}

impl EligibilityConfig {
    pub fn effective_points_gate(&self) -> PointsGate {
        self.points_gate.unwrap_or_default()
    }
}
