use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest and highest percentage a subject mark may hold.
pub const MIN_MARK: i32 = 0;
pub const MAX_MARK: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectMark {
    pub subject: String,
    pub mark: i32, // Percentage, 0-100
}

impl SubjectMark {
    /// Build a mark, rejecting percentages outside 0-100.
    pub fn new(subject: impl Into<String>, mark: i32) -> Result<Self> {
        let subject = subject.into();
        if !(MIN_MARK..=MAX_MARK).contains(&mark) {
            bail!(
                "Mark for '{}' must be between {} and {}, got {}",
                subject,
                MIN_MARK,
                MAX_MARK,
                mark
            );
        }
        Ok(Self { subject, mark })
    }
}

/// A candidate's marks as the core sees them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAcademicRecord {
    #[serde(default)]
    pub subject_marks: Vec<SubjectMark>,
    /// NBT results keyed by test code ("AL", "QL", "MAT"). Not used for eligibility.
    #[serde(default)]
    pub nbt_scores: BTreeMap<String, i32>,
}

impl UserAcademicRecord {
    pub fn new(subject_marks: Vec<SubjectMark>) -> Self {
        Self {
            subject_marks,
            nbt_scores: BTreeMap::new(),
        }
    }

    /// Mark for a subject, if the candidate took it
    pub fn mark_for(&self, subject: &str) -> Option<i32> {
        self.subject_marks
            .iter()
            .find(|m| m.subject == subject)
            .map(|m| m.mark)
    }

    /// Sum of raw percentages across every subject
    pub fn raw_total(&self) -> i64 {
        self.subject_marks.iter().map(|m| m.mark as i64).sum()
    }
}

/// "subject at >= min_points, or or_subject at >= min_points"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRequirement {
    pub subject: String,
    pub min_points: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or_subject: Option<String>,
}

impl SubjectRequirement {
    /// Human-readable form, e.g. "Mathematics or Mathematical Literacy >= 60"
    pub fn describe(&self) -> String {
        match &self.or_subject {
            Some(alt) => format!("{} or {} >= {}", self.subject, alt, self.min_points),
            None => format!("{} >= {}", self.subject, self.min_points),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Degree {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub point_requirement: i32,
    #[serde(default)]
    pub subject_requirements: Vec<SubjectRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Points system the faculty uses, e.g. "APS". Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_calculation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_mark_accepts_bounds() {
        assert_eq!(SubjectMark::new("Mathematics", 0).unwrap().mark, 0);
        assert_eq!(SubjectMark::new("Mathematics", 100).unwrap().mark, 100);
    }

    #[test]
    fn test_subject_mark_rejects_out_of_range() {
        let err = SubjectMark::new("Mathematics", 101).unwrap_err();
        assert!(err.to_string().contains("Mathematics"));
        assert!(SubjectMark::new("History", -1).is_err());
    }

    #[test]
    fn test_mark_for_and_raw_total() {
        let record = UserAcademicRecord::new(vec![
            SubjectMark::new("Mathematics", 72).unwrap(),
            SubjectMark::new("English HL", 65).unwrap(),
        ]);
        assert_eq!(record.mark_for("Mathematics"), Some(72));
        assert_eq!(record.mark_for("History"), None);
        assert_eq!(record.raw_total(), 137);
    }

    #[test]
    fn test_degree_parses_camel_case() {
        let json = r#"{
            "id": 7,
            "name": "BSc Computer Science",
            "pointRequirement": 34,
            "subjectRequirements": [
                { "subject": "Mathematics", "minPoints": 70 },
                { "subject": "English HL", "minPoints": 50, "orSubject": "English FAL" }
            ]
        }"#;
        let degree: Degree = serde_json::from_str(json).unwrap();
        assert_eq!(degree.point_requirement, 34);
        assert_eq!(degree.subject_requirements.len(), 2);
        assert_eq!(
            degree.subject_requirements[1].or_subject.as_deref(),
            Some("English FAL")
        );
        assert!(degree.description.is_none());
    }

    #[test]
    fn test_requirement_describe() {
        let req = SubjectRequirement {
            subject: "Mathematics".to_string(),
            min_points: 60,
            or_subject: Some("Mathematical Literacy".to_string()),
        };
        assert_eq!(req.describe(), "Mathematics or Mathematical Literacy >= 60");
    }
}
