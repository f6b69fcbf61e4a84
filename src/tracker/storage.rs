use super::types::{MarksTracker, TRACKER_VERSION};
use crate::persist::write_atomically;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the default tracker file path (~/.config/aps-check/marks.json)
pub fn get_tracker_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("marks.json"))
}

/// Load the marks tracker.
///
/// A missing file is an empty tracker. The file is rejected when its version
/// is unknown or its terms, subjects and marks grid disagree.
pub fn load_tracker(path: &Path) -> Result<MarksTracker> {
    if !path.exists() {
        debug!(path = %path.display(), "No marks file yet");
        return Ok(MarksTracker::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read marks file at {}", path.display()))?;
    let tracker: MarksTracker = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse marks file at {}", path.display()))?;

    if tracker.version != TRACKER_VERSION {
        bail!(
            "Unsupported marks tracker version {} in {} (expected {})",
            tracker.version,
            path.display(),
            TRACKER_VERSION
        );
    }
    if let Err(errors) = tracker.check_consistency() {
        bail!(
            "Marks file at {} is inconsistent: {}",
            path.display(),
            errors.join("; ")
        );
    }

    debug!(
        terms = tracker.terms.len(),
        subjects = tracker.subjects.len(),
        "Loaded marks tracker"
    );
    Ok(tracker)
}

pub fn save_tracker(path: &Path, tracker: &MarksTracker) -> Result<()> {
    let json = serde_json::to_vec_pretty(tracker).context("Failed to serialize marks tracker")?;
    write_atomically(path, &[json.as_slice()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let temp_path = env::temp_dir().join("aps_check_test_marks_missing.json");
        let _ = fs::remove_file(&temp_path);

        let tracker = load_tracker(&temp_path).unwrap();
        assert_eq!(tracker.version, 1);
        assert!(tracker.terms.is_empty());
    }

    #[test]
    fn test_save_and_load_keeps_subject_order() {
        let temp_path = env::temp_dir().join("aps_check_test_marks_roundtrip.json");
        let _ = fs::remove_file(&temp_path);

        let mut tracker = MarksTracker::new();
        let t1 = tracker.add_term(11, 4).unwrap();
        let t2 = tracker.add_term(12, 1).unwrap();
        tracker.set_mark("Mathematics", t1, Some(58)).unwrap();
        tracker.set_mark("Mathematics", t2, Some(63)).unwrap();
        tracker.set_mark("English HL", t2, Some(71)).unwrap();

        save_tracker(&temp_path, &tracker).unwrap();
        let loaded = load_tracker(&temp_path).unwrap();

        assert_eq!(loaded.terms, tracker.terms);
        assert_eq!(loaded.subjects, vec!["Mathematics", "English HL"]);
        let record = loaded.latest_record().unwrap();
        assert_eq!(record.subject_marks[0].subject, "Mathematics");
        assert_eq!(record.raw_total(), 134);

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_unsupported_version() {
        let temp_path = env::temp_dir().join("aps_check_test_marks_version.json");
        fs::write(
            &temp_path,
            r#"{ "version": 2, "terms": [], "marks": {}, "updated_at": "2025-01-01T00:00:00Z" }"#,
        )
        .unwrap();

        let err = load_tracker(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported marks tracker version 2"));

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_marks_for_unknown_term_rejected() {
        let temp_path = env::temp_dir().join("aps_check_test_marks_dangling.json");
        fs::write(
            &temp_path,
            r#"{
                "version": 1,
                "terms": [{ "id": 1, "grade": 12, "term_number": 1, "name": "Gr12 Term 1" }],
                "subjects": ["Mathematics"],
                "marks": { "Mathematics": { "1": 70, "4": 65 } },
                "updated_at": "2025-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();

        let err = load_tracker(&temp_path).unwrap_err();
        assert!(err.to_string().contains("unknown term 4"));

        let _ = fs::remove_file(&temp_path);
    }
}
