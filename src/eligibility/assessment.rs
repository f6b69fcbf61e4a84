use super::config::{EligibilityConfig, PointsGate};
use crate::domain::{Degree, SubjectRequirement, UserAcademicRecord};
use crate::scoring::{aps_for_record, ScoringConfig};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequirementOutcome {
    Met,
    Below { best_mark: i32 },
    Missing,
}

/// Match one requirement against the record. Both branches share `min_points`.
pub(crate) fn requirement_outcome(
    record: &UserAcademicRecord,
    requirement: &SubjectRequirement,
) -> RequirementOutcome {
    let primary = record.mark_for(&requirement.subject);
    let alternative = requirement
        .or_subject
        .as_deref()
        .and_then(|alt| record.mark_for(alt));

    match primary.into_iter().chain(alternative).max() {
        None => RequirementOutcome::Missing,
        Some(best) if best >= requirement.min_points => RequirementOutcome::Met,
        Some(best) => RequirementOutcome::Below { best_mark: best },
    }
}

/// Why a degree turned a candidate away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GateFailure {
    PointsBelowRequirement {
        required: i64,
        actual: i64,
    },
    SubjectBelowMinimum {
        subject: String,
        or_subject: Option<String>,
        min_points: i32,
        best_mark: i32,
    },
    SubjectMissing {
        subject: String,
        or_subject: Option<String>,
    },
}

impl GateFailure {
    pub fn summary(&self) -> String {
        match self {
            GateFailure::PointsBelowRequirement { required, actual } => {
                format!("needs {} points, candidate has {}", required, actual)
            }
            GateFailure::SubjectBelowMinimum {
                subject,
                or_subject,
                min_points,
                best_mark,
            } => format!(
                "{} needs {}, best mark is {}",
                subject_label(subject, or_subject.as_deref()),
                min_points,
                best_mark
            ),
            GateFailure::SubjectMissing {
                subject,
                or_subject,
            } => format!(
                "{} not taken",
                subject_label(subject, or_subject.as_deref())
            ),
        }
    }
}

fn subject_label(subject: &str, or_subject: Option<&str>) -> String {
    match or_subject {
        Some(alt) => format!("{} or {}", subject, alt),
        None => subject.to_string(),
    }
}

/// Full eligibility result for one degree, listing every failed gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub degree_id: i64,
    pub eligible: bool,
    pub points_gate: PointsGate,
    pub candidate_points: i64,
    pub failures: Vec<GateFailure>,
}

/// Evaluate both gates without short-circuiting so callers can explain
/// every reason a degree is out of reach.
pub fn assess(
    record: &UserAcademicRecord,
    degree: &Degree,
    config: &EligibilityConfig,
    scoring: &ScoringConfig,
) -> Assessment {
    let points_gate = config.effective_points_gate();
    let candidate_points = match points_gate {
        PointsGate::RawSum => record.raw_total(),
        PointsGate::Aps => aps_for_record(record, scoring).score as i64,
    };

    let mut failures = Vec::new();
    let required = degree.point_requirement as i64;
    if candidate_points < required {
        failures.push(GateFailure::PointsBelowRequirement {
            required,
            actual: candidate_points,
        });
    }

    for req in &degree.subject_requirements {
        match requirement_outcome(record, req) {
            RequirementOutcome::Met => {}
            RequirementOutcome::Below { best_mark } => {
                failures.push(GateFailure::SubjectBelowMinimum {
                    subject: req.subject.clone(),
                    or_subject: req.or_subject.clone(),
                    min_points: req.min_points,
                    best_mark,
                })
            }
            RequirementOutcome::Missing => failures.push(GateFailure::SubjectMissing {
                subject: req.subject.clone(),
                or_subject: req.or_subject.clone(),
            }),
        }
    }

    Assessment {
        degree_id: degree.id,
        eligible: failures.is_empty(),
        points_gate,
        candidate_points,
        failures,
    }
}
