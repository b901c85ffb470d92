// src/cleanup/names.rs - Rewrite location-shaped facility names
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cleanup::labels::{known_type_label, title_case};

static OPERATOR_CITY_STATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)\s*[-–]\s*(.+?),\s*([A-Z]{2})$").expect("valid operator/city regex")
});
static CITY_STATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z\s.]+),\s+([A-Z]{2})$").expect("valid city regex"));

/// `"Watco - Reno, NV"` becomes `"Watco Reno Transload"` for a TRANSLOAD.
/// A bare `"Reno, NV"` is only renamed when the type has a label. `None`
/// means leave the name alone.
pub fn clean_location_name(name: &str, facility_type: Option<&str>) -> Option<String> {
    let label = facility_type.and_then(known_type_label);

    if let Some(caps) = OPERATOR_CITY_STATE.captures(name) {
        let operator = caps[1].trim();
        // "John Arambel Trucking, Inc. - Stockton, CA"
        if operator.contains(',') {
            return None;
        }
        let city = caps[2].trim();
        return Some(match label {
            Some(label) => format!("{} {} {}", operator, city, title_case(label)),
            None => format!("{} {}", operator, city),
        });
    }

    if let Some(caps) = CITY_STATE.captures(name) {
        let city = caps[1].trim();
        if city.to_lowercase().starts_with("port of") {
            return None;
        }
        return label.map(|label| format!("{} {}", city, title_case(label)));
    }

    None
}
