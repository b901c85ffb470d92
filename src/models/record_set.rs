// src/models/record_set.rs
//
// A loaded facilities file. Every record keeps the JSON it was read from; on
// write only the keys whose typed value actually changed are patched into it,
// so untouched records come back exactly as given.

use log::warn;
use serde_json::Value;

use super::Facility;

enum Entry {
    Typed {
        raw: Value,
        baseline: Value,
        index: usize,
    },
    /// Did not fit the typed model; written back verbatim.
    Raw(Value),
}

pub struct RecordSet {
    entries: Vec<Entry>,
    facilities: Vec<Facility>,
}

impl RecordSet {
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut entries = Vec::with_capacity(values.len());
        let mut facilities = Vec::with_capacity(values.len());

        for (position, raw) in values.into_iter().enumerate() {
            let typed = serde_json::from_value::<Facility>(raw.clone()).and_then(|facility| {
                serde_json::to_value(&facility).map(|baseline| (facility, baseline))
            });
            match typed {
                Ok((facility, baseline)) => {
                    entries.push(Entry::Typed {
                        raw,
                        baseline,
                        index: facilities.len(),
                    });
                    facilities.push(facility);
                }
                Err(e) => {
                    let name = raw.get("name").and_then(Value::as_str).unwrap_or("<unnamed>");
                    warn!(
                        "Record {} ('{}') kept as-is, could not be read: {}",
                        position, name, e
                    );
                    entries.push(Entry::Raw(raw));
                }
            }
        }

        Self {
            entries,
            facilities,
        }
    }

    /// Number of records, typed or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records carried through without a typed view.
    pub fn untyped_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Raw(_)))
            .count()
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn facilities_mut(&mut self) -> &mut [Facility] {
        &mut self.facilities
    }

    /// Move the typed records out for a pass that consumes and returns them.
    /// Put them back with [`RecordSet::restore_facilities`].
    pub fn take_facilities(&mut self) -> Vec<Facility> {
        std::mem::take(&mut self.facilities)
    }

    pub fn restore_facilities(&mut self, facilities: Vec<Facility>) -> anyhow::Result<()> {
        let expected = self.entries.len() - self.untyped_count();
        if facilities.len() != expected {
            anyhow::bail!(
                "Expected {} facilities back, got {}",
                expected,
                facilities.len()
            );
        }
        self.facilities = facilities;
        Ok(())
    }

    pub fn into_values(self) -> Vec<Value> {
        let facilities = self.facilities;
        self.entries
            .into_iter()
            .map(|entry| match entry {
                Entry::Raw(raw) => raw,
                Entry::Typed {
                    mut raw,
                    baseline,
                    index,
                } => {
                    let Some(facility) = facilities.get(index) else {
                        return raw;
                    };
                    match serde_json::to_value(facility) {
                        Ok(current) if current != baseline => {
                            apply_changes(&mut raw, &baseline, &current);
                            raw
                        }
                        Ok(_) => raw,
                        Err(e) => {
                            warn!("Could not serialize '{}', keeping original: {}", facility.name, e);
                            raw
                        }
                    }
                }
            })
            .collect()
    }
}

/// Write into `raw` every key that differs between `before` and `after`,
/// descending into objects present on all three sides.
fn apply_changes(raw: &mut Value, before: &Value, after: &Value) {
    match (raw, before, after) {
        (Value::Object(raw_map), Value::Object(before_map), Value::Object(after_map)) => {
            for (key, new) in after_map {
                let old = before_map.get(key);
                if old == Some(new) {
                    continue;
                }
                let nested = matches!(
                    (old, raw_map.get(key)),
                    (Some(old), Some(slot)) if old.is_object() && new.is_object() && slot.is_object()
                );
                match (old, raw_map.get_mut(key)) {
                    (Some(old), Some(slot)) if nested => apply_changes(slot, old, new),
                    _ => {
                        raw_map.insert(key.clone(), new.clone());
                    }
                }
            }
            for key in before_map.keys() {
                if !after_map.contains_key(key) {
                    raw_map.remove(key);
                }
            }
        }
        (raw, _, after) => *raw = after.clone(),
    }
}
