use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::domain::{Degree, SubjectMark, SubjectRequirement, UserAcademicRecord};
use crate::scoring::validate_record;

const UNKNOWN_SUBJECT: &str = "Unknown Subject";
const UNKNOWN_DEGREE: &str = "Unknown Degree";
const DEFAULT_POINT_CALCULATION: &str = "APS";

/// Read an integer from a JSON number or a numeric string
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Convert a stored profile into a validated record.
///
/// Accepts the canonical `{ subjectMarks, nbtScores }` shape, or the legacy
/// shape where subjects and marks are keyed `subject1..` / `mark1..`.
pub fn normalize_profile(value: &Value) -> Result<UserAcademicRecord> {
    let obj = value
        .as_object()
        .context("Profile must be a JSON object")?;

    let record = if obj.contains_key("subjectMarks") {
        debug!("Profile uses canonical subjectMarks shape");
        let subject_marks: Vec<SubjectMark> = serde_json::from_value(obj["subjectMarks"].clone())
            .context("Failed to parse subjectMarks")?;
        UserAcademicRecord {
            subject_marks,
            nbt_scores: normalize_nbt(obj.get("nbtScores")),
        }
    } else {
        debug!("Profile uses legacy subjectN/markN shape");
        UserAcademicRecord {
            subject_marks: normalize_legacy_marks(obj)?,
            nbt_scores: normalize_nbt(obj.get("nbtScores")),
        }
    };

    if let Err(errors) = validate_record(&record) {
        bail!("Invalid profile: {}", errors.join("; "));
    }

    Ok(record)
}

fn normalize_legacy_marks(obj: &Map<String, Value>) -> Result<Vec<SubjectMark>> {
    // (slot number, subject name), slots are 1-based
    let mut slots: Vec<(u32, String)> = match obj.get("subjects") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(subjects)) => subjects
            .iter()
            .filter_map(|(key, name)| {
                let slot: u32 = key.strip_prefix("subject")?.parse().ok()?;
                Some((slot, name.as_str()?.trim().to_string()))
            })
            .collect(),
        Some(Value::Array(subjects)) => subjects
            .iter()
            .enumerate()
            .filter_map(|(i, name)| Some((i as u32 + 1, name.as_str()?.trim().to_string())))
            .collect(),
        Some(_) => bail!("Profile field 'subjects' must be an object or an array"),
    };
    slots.sort_by_key(|(slot, _)| *slot);

    let marks = obj.get("marks").and_then(Value::as_object);
    let mut seen = HashSet::new();
    let mut subject_marks = Vec::with_capacity(slots.len());

    for (slot, subject) in slots {
        if subject.is_empty() {
            continue;
        }
        if !seen.insert(subject.clone()) {
            bail!("Subject '{}' appears more than once in profile", subject);
        }

        let key = format!("mark{}", slot);
        let mark = match marks.and_then(|m| m.get(&key)) {
            // Blank marks are saved as "0" by the calculator
            None | Some(Value::Null) => 0,
            Some(Value::String(s)) if s.trim().is_empty() => 0,
            Some(raw) => as_int(raw)
                .with_context(|| format!("Mark '{}' for {} is not a number", key, subject))?,
        };
        let mark = i32::try_from(mark)
            .with_context(|| format!("Mark '{}' for {} is out of range", key, subject))?;

        subject_marks.push(SubjectMark::new(subject, mark)?);
    }

    Ok(subject_marks)
}

fn normalize_nbt(value: Option<&Value>) -> BTreeMap<String, i32> {
    let Some(Value::Object(scores)) = value else {
        return BTreeMap::new();
    };

    scores
        .iter()
        .filter_map(|(key, raw)| {
            let code = key.strip_prefix("nbt").unwrap_or(key).to_string();
            match as_int(raw).and_then(|n| i32::try_from(n).ok()) {
                Some(score) => Some((code, score)),
                None => {
                    debug!("Skipping NBT score '{}' with value {}", key, raw);
                    None
                }
            }
        })
        .collect()
}

/// Convert raw catalogue rows into degrees.
///
/// Rows come straight from the catalogue query: requirement lists may hold
/// all-null rows and numeric fields may be null or strings.
pub fn normalize_catalogue(value: &Value) -> Result<Vec<Degree>> {
    let rows = value
        .as_array()
        .context("Catalogue must be a JSON array of degrees")?;

    let mut seen_ids = HashSet::new();
    let mut degrees = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Catalogue entry {} is not an object", i))?;

        let id = obj
            .get("id")
            .and_then(as_int)
            .with_context(|| format!("Catalogue entry {} has no numeric id", i))?;
        if !seen_ids.insert(id) {
            bail!("Duplicate degree id {} in catalogue", id);
        }

        let point_requirement = threshold(obj.get("pointRequirement"))
            .with_context(|| format!("Degree {}: invalid pointRequirement", id))?
            .unwrap_or(0);

        let mut subject_requirements = Vec::new();
        if let Some(Value::Array(reqs)) = obj.get("subjectRequirements") {
            for (j, req) in reqs.iter().enumerate() {
                let requirement = normalize_requirement(req).with_context(|| {
                    format!("Degree {}: invalid subjectRequirements[{}]", id, j)
                })?;
                subject_requirements.extend(requirement);
            }
        }

        degrees.push(Degree {
            id,
            name: non_empty_str(obj.get("name")).unwrap_or_else(|| UNKNOWN_DEGREE.to_string()),
            point_requirement,
            subject_requirements,
            description: non_empty_str(obj.get("description")),
            point_calculation: Some(
                non_empty_str(obj.get("pointCalculation"))
                    .unwrap_or_else(|| DEFAULT_POINT_CALCULATION.to_string()),
            ),
        });
    }

    debug!("Normalized {} degrees", degrees.len());
    Ok(degrees)
}

/// Read a catalogue threshold. Null, missing or blank gives `None`; anything
/// else must be a whole number that fits in an i32.
fn threshold(value: Option<&Value>) -> Result<Option<i32>> {
    let raw = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(raw) => raw,
    };
    let n = match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .with_context(|| format!("{} is not a whole number", raw))?;
    let n = i32::try_from(n).with_context(|| format!("{} is out of range", n))?;
    Ok(Some(n))
}

fn normalize_requirement(row: &Value) -> Result<Option<SubjectRequirement>> {
    let Some(obj) = row.as_object() else {
        bail!("requirement must be an object");
    };
    let subject = non_empty_str(obj.get("subject"));
    let min_points = threshold(obj.get("minPoints")).context("invalid minPoints")?;

    if subject.is_none() && min_points.is_none() {
        return Ok(None);
    }

    Ok(Some(SubjectRequirement {
        subject: subject.unwrap_or_else(|| UNKNOWN_SUBJECT.to_string()),
        min_points: min_points.unwrap_or(0),
        or_subject: non_empty_str(obj.get("orSubject")),
    }))
}
