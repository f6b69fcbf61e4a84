use super::config::{ScoringConfig, MAX_SUBJECT_LIMIT};
use crate::domain::types::{MAX_MARK, MIN_MARK};
use crate::domain::UserAcademicRecord;
use std::collections::HashSet;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(limit) = config.subject_limit {
        if limit == 0 {
            errors.push("scoring.subject_limit: must be at least 1".to_string());
        } else if limit > MAX_SUBJECT_LIMIT {
            errors.push(format!(
                "scoring.subject_limit: {} exceeds the maximum of {}",
                limit, MAX_SUBJECT_LIMIT
            ));
        }
    }

    if let Some(ref excluded) = config.excluded_subjects {
        for (i, subject) in excluded.iter().enumerate() {
            if subject.trim().is_empty() {
                errors.push(format!(
                    "scoring.excluded_subjects[{}]: subject name must not be blank",
                    i
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a candidate record before it reaches the core.
pub fn validate_record(record: &UserAcademicRecord) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, entry) in record.subject_marks.iter().enumerate() {
        if entry.subject.trim().is_empty() {
            errors.push(format!("subjectMarks[{}].subject: must not be blank", i));
        } else if !seen.insert(entry.subject.as_str()) {
            errors.push(format!(
                "subjectMarks[{}].subject: duplicate subject '{}'",
                i, entry.subject
            ));
        }

        if !(MIN_MARK..=MAX_MARK).contains(&entry.mark) {
            errors.push(format!(
                "subjectMarks[{}].mark: {} is outside {}-{}",
                i, entry.mark, MIN_MARK, MAX_MARK
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SubjectMark;

    #[test]
    fn test_valid_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config = ScoringConfig {
            subject_limit: None,
            excluded_subjects: None,
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_zero_subject_limit() {
        let config = ScoringConfig {
            subject_limit: Some(0),
            excluded_subjects: None,
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.subject_limit"));
    }

    #[test]
    fn test_oversized_subject_limit() {
        let config = ScoringConfig {
            subject_limit: Some(usize::MAX),
            excluded_subjects: None,
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("exceeds the maximum of 12"));

        let at_bound = ScoringConfig {
            subject_limit: Some(MAX_SUBJECT_LIMIT),
            excluded_subjects: None,
        };
        assert!(validate_scoring(&at_bound).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            subject_limit: Some(0),
            excluded_subjects: Some(vec!["".to_string(), "  ".to_string()]),
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[2].contains("excluded_subjects[1]"));
    }

    #[test]
    fn test_valid_record() {
        let record = UserAcademicRecord::new(vec![
            SubjectMark::new("Mathematics", 70).unwrap(),
            SubjectMark::new("History", 0).unwrap(),
        ]);
        assert!(validate_record(&record).is_ok());
    }

    #[test]
    fn test_record_out_of_range_and_duplicate() {
        // Built directly so the constructor check is bypassed
        let record = UserAcademicRecord::new(vec![
            SubjectMark { subject: "Mathematics".to_string(), mark: 70 },
            SubjectMark { subject: "Mathematics".to_string(), mark: 120 },
            SubjectMark { subject: " ".to_string(), mark: 50 },
        ]);
        let errors = validate_record(&record).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("duplicate"));
        assert!(errors[1].contains("120"));
        assert!(errors[2].contains("subjectMarks[2].subject"));
    }
}
