use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use super::normalize::{normalize_catalogue, normalize_profile};
use crate::domain::{Degree, UserAcademicRecord};

fn read_json(path: &Path, what: &str) -> Result<Value> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file at {}", what, path.display()))?;

    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}: invalid JSON in {}", what, path.display()))
}

/// Load a candidate profile (canonical or legacy shape) from a JSON file
pub fn load_profile(path: &Path) -> Result<UserAcademicRecord> {
    let value = read_json(path, "profile")?;
    let record = normalize_profile(&value)
        .with_context(|| format!("Invalid profile in {}", path.display()))?;

    debug!(
        path = %path.display(),
        subjects = record.subject_marks.len(),
        "Loaded profile"
    );
    Ok(record)
}

/// Load a degree catalogue (JSON array of degree rows)
pub fn load_catalogue(path: &Path) -> Result<Vec<Degree>> {
    let value = read_json(path, "catalogue")?;
    let degrees = normalize_catalogue(&value)
        .with_context(|| format!("Invalid catalogue in {}", path.display()))?;

    debug!(path = %path.display(), degrees = degrees.len(), "Loaded catalogue");
    Ok(degrees)
}
