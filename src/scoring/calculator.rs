use super::bands::{points_for_mark, MAX_POINTS_PER_SUBJECT};
use super::config::ScoringConfig;
use crate::domain::UserAcademicRecord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectContribution {
    pub subject: String,
    pub mark: i32,
    pub points: u32,
    pub counted: bool, // false when excluded or past the subject limit
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApsResult {
    pub score: u32,
    pub subject_limit: usize,
    pub subjects: Vec<SubjectContribution>,
}

impl ApsResult {
    /// Best achievable score for this limit (42 for six subjects)
    pub fn max_score(&self) -> u32 {
        u32::try_from(self.subject_limit)
            .unwrap_or(u32::MAX)
            .saturating_mul(MAX_POINTS_PER_SUBJECT)
    }
}

/// Sum the points of the first `subject_limit` marks. Later marks are ignored.
pub fn total_score(marks: &[i32], subject_limit: usize) -> u32 {
    marks
        .iter()
        .take(subject_limit)
        .map(|&mark| points_for_mark(mark))
        .sum()
}

/// Score a record, skipping excluded subjects and reporting every subject.
pub fn aps_for_record(record: &UserAcademicRecord, config: &ScoringConfig) -> ApsResult {
    let subject_limit = config.effective_subject_limit();
    let mut counted_marks = Vec::with_capacity(subject_limit.min(record.subject_marks.len()));
    let mut subjects = Vec::with_capacity(record.subject_marks.len());

    for entry in &record.subject_marks {
        let counted = !config.is_excluded(&entry.subject) && counted_marks.len() < subject_limit;
        if counted {
            counted_marks.push(entry.mark);
        }
        subjects.push(SubjectContribution {
            subject: entry.subject.clone(),
            mark: entry.mark,
            points: points_for_mark(entry.mark),
            counted,
        });
    }

    ApsResult {
        score: total_score(&counted_marks, subject_limit),
        subject_limit,
        subjects,
    }
}
