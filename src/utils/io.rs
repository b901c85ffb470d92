// src/utils/io.rs - JSON file in/out for facility arrays
use anyhow::{Context, Result};
use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::models::RecordSet;

/// Load the facility array. Only a file that is not a JSON array fails; a
/// single record that does not fit the typed model is carried through as-is.
pub fn read_records(path: &Path) -> Result<RecordSet> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("Failed to read facilities from {}", path.display()))?;
    let values: Vec<Value> = serde_json::from_str(&body)
        .with_context(|| format!("Failed to parse facilities JSON in {}", path.display()))?;
    let records = RecordSet::from_values(values);
    if records.untyped_count() > 0 {
        warn!(
            "{} of {} records in {} will be passed through unchanged",
            records.untyped_count(),
            records.len(),
            path.display()
        );
    }
    Ok(records)
}

/// Pretty-printed with a trailing newline. Parent directories are created.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut body = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    body.push('\n');
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}
