// src/enrichment/gaps.rs - Missing-field breakdown for dry runs
use log::info;
use serde::Serialize;

use crate::models::facility::is_blank;
use crate::models::Facility;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGap {
    pub field: String,
    pub missing: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapReport {
    pub total: usize,
    pub gaps: Vec<FieldGap>,
}

const TOP_LEVEL_FIELDS: [&str; 3] = ["website", "phone", "email"];
const LOCATION_FIELDS: [&str; 4] = ["street_address", "zip_code", "latitude", "longitude"];

pub fn analyze_gaps(facilities: &[Facility]) -> GapReport {
    let total = facilities.len();
    let mut gaps = Vec::with_capacity(TOP_LEVEL_FIELDS.len() + LOCATION_FIELDS.len());

    for field in TOP_LEVEL_FIELDS {
        let missing = facilities
            .iter()
            .filter(|f| is_blank(top_level_value(f, field)))
            .count();
        gaps.push(FieldGap {
            field: field.to_string(),
            missing,
            percent: percent(missing, total),
        });
    }
    for field in LOCATION_FIELDS {
        let missing = facilities
            .iter()
            .filter(|f| !has_location_value(f, field))
            .count();
        gaps.push(FieldGap {
            field: format!("location.{}", field),
            missing,
            percent: percent(missing, total),
        });
    }

    GapReport { total, gaps }
}

fn top_level_value<'a>(facility: &'a Facility, field: &str) -> Option<&'a str> {
    match field {
        "website" => facility.website.as_deref(),
        "phone" => facility.phone.as_deref(),
        "email" => facility.email.as_deref(),
        _ => None,
    }
}

fn has_location_value(facility: &Facility, field: &str) -> bool {
    match field {
        "latitude" => facility.latitude().is_some(),
        "longitude" => facility.longitude().is_some(),
        other => facility
            .location
            .as_ref()
            .and_then(|loc| loc.get_text(other))
            .is_some(),
    }
}

fn percent(missing: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        missing as f64 / total as f64 * 100.0
    }
}

impl GapReport {
    pub fn log_report(&self) {
        info!("Facility gap analysis ({} total)", self.total);
        info!("{}", "=".repeat(44));
        for gap in &self.gaps {
            info!(
                "  {:<26} missing: {:>5}  ({:.1}%)",
                gap.field, gap.missing, gap.percent
            );
        }
    }

    pub fn missing(&self, field: &str) -> Option<usize> {
        self.gaps.iter().find(|g| g.field == field).map(|g| g.missing)
    }
}
