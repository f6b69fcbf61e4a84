use serde::{Deserialize, Serialize};

/// Subjects counted toward the APS when no limit is configured
pub const DEFAULT_SUBJECT_LIMIT: usize = 6;

/// Largest accepted `subject_limit`; no NSC record carries more subjects
pub const MAX_SUBJECT_LIMIT: usize = 12;

/// APS scoring configuration.
///
/// Controls how many subjects count toward the total and which subjects are
/// never counted.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   subject_limit: 6
///   excluded_subjects: ["Life Orientation"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Number of subjects that count, in entry order (default: 6)
    #[serde(default)]
    pub subject_limit: Option<usize>,

    /// Subjects skipped before the limit is applied (case-insensitive)
    #[serde(default)]
    pub excluded_subjects: Option<Vec<String>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            subject_limit: Some(DEFAULT_SUBJECT_LIMIT),
            excluded_subjects: Some(vec!["Life Orientation".to_string()]),
        }
    }
}

impl ScoringConfig {
    pub fn effective_subject_limit(&self) -> usize {
        self.subject_limit.unwrap_or(DEFAULT_SUBJECT_LIMIT)
    }

    pub fn is_excluded(&self, subject: &str) -> bool {
        let subject = subject.trim();
        self.excluded_subjects
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|s| s.trim().eq_ignore_ascii_case(subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.subject_limit, Some(6));
        assert!(config.is_excluded("Life Orientation"));
        assert!(config.is_excluded("life orientation"));
        assert!(!config.is_excluded("Mathematics"));
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = "subject_limit: 5\n";
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.effective_subject_limit(), 5);
        assert!(config.excluded_subjects.is_none());
        assert!(!config.is_excluded("Life Orientation"));
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.subject_limit.is_none());
        assert_eq!(config.effective_subject_limit(), DEFAULT_SUBJECT_LIMIT);
    }

    #[test]
    fn test_excluded_names_are_trimmed() {
        let yaml = "excluded_subjects: [\" Life Orientation \"]\n";
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.is_excluded("Life Orientation"));
        assert!(config.is_excluded("  life orientation"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "subject_limit: 6\nbase_score: 100\n";
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
