use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::domain::types::{MAX_MARK, MIN_MARK};
use crate::domain::{SubjectMark, UserAcademicRecord};

pub const TRACKER_VERSION: u32 = 1;
pub const DEFAULT_GRADE: u8 = 12;
const MIN_GRADE: u8 = 8;
const MAX_GRADE: u8 = 12;
const TERMS_PER_YEAR: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: u32,
    pub grade: u8,
    pub term_number: u8,
    pub name: String,
}

impl Term {
    /// Position on the school timeline; consecutive terms differ by 1
    pub fn ordinal(&self) -> u32 {
        term_ordinal(self.grade, self.term_number)
    }

    /// Short label used for chart series, e.g. "G11T3"
    pub fn label(&self) -> String {
        format!("G{}T{}", self.grade, self.term_number)
    }
}

fn term_ordinal(grade: u8, term_number: u8) -> u32 {
    grade as u32 * TERMS_PER_YEAR as u32 + term_number as u32
}

/// Marks per subject across school terms.
///
/// Terms form a contiguous timeline: new terms must sit next to an existing
/// one and only the first or last term can be removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarksTracker {
    pub version: u32,
    #[serde(default)]
    pub terms: Vec<Term>,
    /// Subjects in the order they were first entered
    #[serde(default)]
    pub subjects: Vec<String>,
    /// subject -> term id -> mark (None until entered)
    #[serde(default)]
    pub marks: BTreeMap<String, BTreeMap<u32, Option<i32>>>,
    pub updated_at: DateTime<Utc>,
}

impl Default for MarksTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MarksTracker {
    pub fn new() -> Self {
        Self {
            version: TRACKER_VERSION,
            terms: Vec::new(),
            subjects: Vec::new(),
            marks: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Start a tracker with a single term 1 holding the record's marks
    pub fn seed_from_record(record: &UserAcademicRecord, grade: u8) -> Result<Self> {
        let mut tracker = Self::new();
        let term_id = tracker.add_term(grade, 1)?;
        for entry in &record.subject_marks {
            tracker.set_mark(&entry.subject, term_id, Some(entry.mark))?;
        }
        Ok(tracker)
    }

    pub fn term(&self, id: u32) -> Option<&Term> {
        self.terms.iter().find(|t| t.id == id)
    }

    /// Terms in timeline order
    pub fn sorted_terms(&self) -> Vec<&Term> {
        let mut terms: Vec<&Term> = self.terms.iter().collect();
        terms.sort_by_key(|t| t.ordinal());
        terms
    }

    /// Add a term next to the existing timeline. Returns the new term id.
    pub fn add_term(&mut self, grade: u8, term_number: u8) -> Result<u32> {
        if !(1..=TERMS_PER_YEAR).contains(&term_number) {
            bail!("Term number must be between 1 and {}", TERMS_PER_YEAR);
        }
        if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
            bail!("Grade must be between {} and {}", MIN_GRADE, MAX_GRADE);
        }
        if self
            .terms
            .iter()
            .any(|t| t.grade == grade && t.term_number == term_number)
        {
            bail!("Grade {} term {} already exists", grade, term_number);
        }

        let ordinal = term_ordinal(grade, term_number);
        let adjacent = self.terms.is_empty()
            || self.terms.iter().any(|t| t.ordinal().abs_diff(ordinal) == 1);
        if !adjacent {
            bail!(
                "Grade {} term {} is not next to an existing term; terms must stay contiguous",
                grade,
                term_number
            );
        }

        let id = self.terms.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        self.terms.push(Term {
            id,
            grade,
            term_number,
            name: format!("Gr{} Term {}", grade, term_number),
        });
        for by_term in self.marks.values_mut() {
            by_term.insert(id, None);
        }
        self.updated_at = Utc::now();
        Ok(id)
    }

    /// Remove the first or last term on the timeline along with its marks
    pub fn remove_term(&mut self, id: u32) -> Result<()> {
        let sorted = self.sorted_terms();
        let position = sorted
            .iter()
            .position(|t| t.id == id)
            .with_context(|| format!("No term with id {}", id))?;
        if position != 0 && position != sorted.len() - 1 {
            bail!("Only the first or last term can be removed");
        }

        self.terms.retain(|t| t.id != id);
        for by_term in self.marks.values_mut() {
            by_term.remove(&id);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record a mark, clamped to 0-100. `None` clears it.
    pub fn set_mark(&mut self, subject: &str, term_id: u32, value: Option<i32>) -> Result<()> {
        if self.term(term_id).is_none() {
            bail!("No term with id {}", term_id);
        }
        let subject = subject.trim();
        if subject.is_empty() {
            bail!("Subject name must not be blank");
        }

        if !self.marks.contains_key(subject) {
            let empty = self.terms.iter().map(|t| (t.id, None)).collect();
            self.marks.insert(subject.to_string(), empty);
            self.subjects.push(subject.to_string());
        }
        let by_term = self
            .marks
            .get_mut(subject)
            .with_context(|| format!("No marks row for {}", subject))?;
        by_term.insert(term_id, value.map(|v| v.clamp(MIN_MARK, MAX_MARK)));
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn mark(&self, subject: &str, term_id: u32) -> Option<i32> {
        self.marks.get(subject)?.get(&term_id).copied().flatten()
    }

    /// Chart series for a subject: one (label, mark) per term, missing marks as 0
    pub fn series(&self, subject: &str) -> Vec<(String, i32)> {
        self.sorted_terms()
            .into_iter()
            .map(|t| (t.label(), self.mark(subject, t.id).unwrap_or(0)))
            .collect()
    }

    /// Marks from the latest term with any entry, as a record for scoring
    pub fn latest_record(&self) -> Option<UserAcademicRecord> {
        let term = self
            .sorted_terms()
            .into_iter()
            .rev()
            .find(|t| self.subjects.iter().any(|s| self.mark(s, t.id).is_some()))?;

        let subject_marks = self
            .subjects
            .iter()
            .filter_map(|subject| {
                let mark = self.mark(subject, term.id)?;
                Some(SubjectMark {
                    subject: subject.clone(),
                    mark,
                })
            })
            .collect();
        Some(UserAcademicRecord::new(subject_marks))
    }

    /// Check that terms, subjects and the marks grid agree.
    /// Returns all problems at once (not just the first).
    pub fn check_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let mut term_ids = HashSet::new();
        for term in &self.terms {
            if !term_ids.insert(term.id) {
                errors.push(format!("terms: duplicate term id {}", term.id));
            }
            if !(1..=TERMS_PER_YEAR).contains(&term.term_number)
                || !(MIN_GRADE..=MAX_GRADE).contains(&term.grade)
            {
                errors.push(format!(
                    "terms: term {} has grade {} term {}, outside the school calendar",
                    term.id, term.grade, term.term_number
                ));
            }
        }

        let mut listed = HashSet::new();
        for subject in &self.subjects {
            if !listed.insert(subject.as_str()) {
                errors.push(format!("subjects: '{}' listed more than once", subject));
            } else if !self.marks.contains_key(subject) {
                errors.push(format!("subjects: '{}' has no marks row", subject));
            }
        }

        for (subject, by_term) in &self.marks {
            if !listed.contains(subject.as_str()) {
                errors.push(format!("marks: '{}' is not in the subject list", subject));
            }
            for id in by_term.keys().filter(|id| !term_ids.contains(*id)) {
                errors.push(format!("marks: '{}' refers to unknown term {}", subject, id));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
