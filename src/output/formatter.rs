use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::domain::Degree;
use crate::eligibility::Assessment;
use crate::scoring::ApsResult;
use crate::tracker::MarksTracker;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format an APS breakdown: one line per subject, then the total.
/// Subjects that did not count are marked and dimmed.
pub fn format_aps(result: &ApsResult, use_colors: bool) -> String {
    let name_width = result
        .subjects
        .iter()
        .map(|s| s.subject.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = result
        .subjects
        .iter()
        .map(|s| {
            let line = format!(
                "  {:<width$}  {:>3}%  {} pts",
                s.subject,
                s.mark,
                s.points,
                width = name_width
            );
            match (s.counted, use_colors) {
                (true, _) => line,
                (false, true) => format!("{}", format!("{}  (not counted)", line).dimmed()),
                (false, false) => format!("{}  (not counted)", line),
            }
        })
        .collect();

    let total = format!("APS: {} / {}", result.score, result.max_score());
    if use_colors {
        lines.push(total.bold().to_string());
    } else {
        lines.push(total);
    }
    lines.join("\n")
}

/// Format degrees as a table with columns: Index, Id, Min points, Name
/// Index column: 3 chars (fits "99."), right-aligned
pub fn format_degree_table(degrees: &[Degree], use_colors: bool) -> String {
    if degrees.is_empty() {
        return "No eligible degrees found.".to_string();
    }

    let term_width = get_terminal_width();
    let id_width = degrees
        .iter()
        .map(|d| d.id.to_string().len())
        .max()
        .unwrap_or(1);
    let points_width = 4;
    let separator = "  ";

    degrees
        .iter()
        .enumerate()
        .map(|(idx, degree)| {
            let index_str = format!("{:>2}.", idx + 1);
            let id_str = format!("{:>width$}", degree.id, width = id_width);
            let points_str = format!("{:>width$}", degree.point_requirement, width = points_width);

            let fixed_width = 3 + 1 + id_width + points_width + separator.len() * 2;
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&degree.name, width - fixed_width)
                }
                Some(_) => truncate_name(&degree.name, 20),
                None => degree.name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    id_str.cyan(),
                    separator,
                    points_str.bold(),
                    separator,
                    name
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, id_str, separator, points_str, separator, name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format degrees as tab-separated values for scripting
/// Columns: id, name, point requirement, subject requirements (no headers, no colors)
pub fn format_tsv(degrees: &[Degree]) -> String {
    degrees
        .iter()
        .map(|degree| {
            let requirements = degree
                .subject_requirements
                .iter()
                .map(|r| r.describe())
                .collect::<Vec<_>>()
                .join("; ");
            format!(
                "{}\t{}\t{}\t{}",
                degree.id, degree.name, degree.point_requirement, requirements
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single-degree eligibility check with every failed gate
pub fn format_assessment(degree: &Degree, assessment: &Assessment, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let header = format!("{} (#{})", degree.name, degree.id);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    if let Some(ref description) = degree.description {
        lines.push(format!("  {}", description));
    }

    lines.push(format!(
        "  Minimum points: {} ({})",
        degree.point_requirement,
        degree.point_calculation.as_deref().unwrap_or("APS")
    ));
    lines.push(format!("  Your points: {}", assessment.candidate_points));
    for req in &degree.subject_requirements {
        lines.push(format!("  Requires: {}", req.describe()));
    }

    let verdict = if assessment.eligible {
        "Eligible".to_string()
    } else {
        format!("Not eligible ({} unmet)", assessment.failures.len())
    };
    lines.push(match (assessment.eligible, use_colors) {
        (true, true) => format!("  {}", verdict.green()),
        (false, true) => format!("  {}", verdict.red()),
        (_, false) => format!("  {}", verdict),
    });

    for failure in &assessment.failures {
        lines.push(format!("    - {}", failure.summary()));
    }

    lines.join("\n")
}

/// Format the marks tracker as a grid: one row per subject, one column per term
pub fn format_tracker(tracker: &MarksTracker, use_colors: bool) -> String {
    let terms = tracker.sorted_terms();
    if terms.is_empty() {
        return "No terms recorded. Add one with `aps-check marks add-term <GRADE> <TERM>`."
            .to_string();
    }

    let name_width = tracker
        .subjects
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0)
        .max("Subject".len());

    let mut header = format!("{:<width$}", "Subject", width = name_width);
    for term in &terms {
        header.push_str(&format!("  {:>7}", format!("{}#{}", term.label(), term.id)));
    }

    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for subject in &tracker.subjects {
        let mut row = format!("{:<width$}", subject, width = name_width);
        for term in &terms {
            let cell = tracker
                .mark(subject, term.id)
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string());
            row.push_str(&format!("  {:>7}", cell));
        }
        lines.push(row);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SubjectMark, SubjectRequirement, UserAcademicRecord};
    use crate::eligibility::{assess, EligibilityConfig};
    use crate::scoring::{aps_for_record, ScoringConfig};

    fn sample_degree() -> Degree {
        Degree {
            id: 17,
            name: "BSc Computer Science".to_string(),
            point_requirement: 34,
            subject_requirements: vec![SubjectRequirement {
                subject: "Mathematics".to_string(),
                min_points: 70,
                or_subject: None,
            }],
            description: Some("Three-year degree".to_string()),
            point_calculation: Some("APS".to_string()),
        }
    }

    fn sample_record() -> UserAcademicRecord {
        UserAcademicRecord::new(vec![
            SubjectMark::new("Mathematics", 82).unwrap(),
            SubjectMark::new("Life Orientation", 90).unwrap(),
        ])
    }

    #[test]
    fn test_format_aps() {
        let result = aps_for_record(&sample_record(), &ScoringConfig::default());
        let output = format_aps(&result, false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Mathematics"));
        assert!(lines[0].contains("82%"));
        assert!(lines[0].contains("7 pts"));
        assert!(lines[1].ends_with("(not counted)"));
        assert_eq!(lines[2], "APS: 7 / 42");
    }

    #[test]
    fn test_format_degree_table_empty() {
        assert_eq!(format_degree_table(&[], false), "No eligible degrees found.");
    }

    #[test]
    fn test_format_degree_table_rows() {
        let mut second = sample_degree();
        second.id = 5;
        second.name = "BA Psychology".to_string();
        let output = format_degree_table(&[sample_degree(), second], false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[0].contains("17"));
        assert!(lines[1].starts_with(" 2."));
        assert!(lines[1].contains("BA Psychology"));
    }

    #[test]
    fn test_format_tsv() {
        let output = format_tsv(&[sample_degree()]);
        assert_eq!(output, "17\tBSc Computer Science\t34\tMathematics >= 70");
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_format_assessment_lists_failures() {
        let degree = sample_degree();
        let record = UserAcademicRecord::new(vec![SubjectMark::new("History", 20).unwrap()]);
        let assessment = assess(
            &record,
            &degree,
            &EligibilityConfig::default(),
            &ScoringConfig::default(),
        );
        let output = format_assessment(&degree, &assessment, false);
        assert!(output.starts_with("BSc Computer Science (#17)"));
        assert!(output.contains("Not eligible (2 unmet)"));
        assert!(output.contains("- needs 34 points, candidate has 20"));
        assert!(output.contains("- Mathematics not taken"));
    }

    #[test]
    fn test_format_assessment_eligible() {
        let degree = sample_degree();
        let assessment = assess(
            &sample_record(),
            &degree,
            &EligibilityConfig::default(),
            &ScoringConfig::default(),
        );
        let output = format_assessment(&degree, &assessment, false);
        assert!(output.contains("  Eligible"));
        assert!(!output.contains("    - "));
    }

    #[test]
    fn test_format_tracker() {
        let mut tracker = MarksTracker::new();
        let t1 = tracker.add_term(12, 1).unwrap();
        tracker.add_term(12, 2).unwrap();
        tracker.set_mark("Mathematics", t1, Some(64)).unwrap();

        let output = format_tracker(&tracker, false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("G12T1#1"));
        assert!(lines[0].contains("G12T2#2"));
        assert!(lines[1].contains("64"));
        assert!(lines[1].trim_end().ends_with('-'));
    }

    #[test]
    fn test_format_tracker_empty() {
        assert!(format_tracker(&MarksTracker::new(), false).starts_with("No terms recorded"));
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Short", 20), "Short");
        assert_eq!(truncate_name("Bachelor of Science", 10), "Bachelo...");
        assert_eq!(truncate_name("Bachelor", 3), "Bac");
    }
}
