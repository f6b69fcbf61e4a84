use super::assessment::{assess, requirement_outcome, RequirementOutcome};
use super::config::{EligibilityConfig, PointsGate};
use crate::domain::{Degree, UserAcademicRecord};
use crate::scoring::ScoringConfig;

/// Check whether a candidate meets a degree's point and subject requirements.
///
/// The points gate compares the raw percentage sum, not the APS. Every
/// subject requirement must be met by its subject or its alternative, and a
/// requirement with neither subject present fails.
pub fn is_eligible(record: &UserAcademicRecord, degree: &Degree) -> bool {
    if record.raw_total() < degree.point_requirement as i64 {
        return false;
    }

    degree
        .subject_requirements
        .iter()
        .all(|req| requirement_outcome(record, req) == RequirementOutcome::Met)
}

/// Keep only the degrees the candidate is eligible for, in input order
pub fn filter_eligible_degrees(record: &UserAcademicRecord, degrees: &[Degree]) -> Vec<Degree> {
    degrees
        .iter()
        .filter(|degree| is_eligible(record, degree))
        .cloned()
        .collect()
}

/// Like `filter_eligible_degrees`, but honors the configured points gate
pub fn filter_with_config(
    record: &UserAcademicRecord,
    degrees: &[Degree],
    config: &EligibilityConfig,
    scoring: &ScoringConfig,
) -> Vec<Degree> {
    if config.effective_points_gate() == PointsGate::RawSum {
        return filter_eligible_degrees(record, degrees);
    }

    degrees
        .iter()
        .filter(|degree| assess(record, degree, config, scoring).eligible)
        .cloned()
        .collect()
}
