// src/cleanup/states.rs - Infer a missing state from zip, city text, or sibling records
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::models::Facility;

/// USPS 3-digit zip prefix ranges, inclusive.
const ZIP_RANGES: [(u16, u16, &str); 52] = [
    (5, 9, "PR"),
    (10, 27, "MA"),
    (28, 29, "RI"),
    (30, 38, "NH"),
    (39, 49, "ME"),
    (50, 59, "VT"),
    (60, 69, "CT"),
    (70, 89, "NJ"),
    (100, 149, "NY"),
    (150, 196, "PA"),
    (197, 199, "DE"),
    (200, 205, "DC"),
    (206, 219, "MD"),
    (220, 246, "VA"),
    (247, 268, "WV"),
    (270, 289, "NC"),
    (290, 299, "SC"),
    (300, 319, "GA"),
    (320, 349, "FL"),
    (350, 369, "AL"),
    (370, 385, "TN"),
    (386, 397, "MS"),
    (400, 427, "KY"),
    (430, 459, "OH"),
    (460, 479, "IN"),
    (480, 499, "MI"),
    (500, 528, "IA"),
    (530, 549, "WI"),
    (550, 567, "MN"),
    (570, 577, "SD"),
    (580, 588, "ND"),
    (590, 599, "MT"),
    (600, 629, "IL"),
    (630, 658, "MO"),
    (660, 679, "KS"),
    (680, 693, "NE"),
    (700, 714, "LA"),
    (716, 729, "AR"),
    (730, 749, "OK"),
    (750, 799, "TX"),
    (800, 816, "CO"),
    (820, 831, "WY"),
    (832, 838, "ID"),
    (840, 847, "UT"),
    (850, 865, "AZ"),
    (870, 884, "NM"),
    (889, 898, "NV"),
    (900, 966, "CA"),
    (967, 968, "HI"),
    (970, 979, "OR"),
    (980, 994, "WA"),
    (995, 999, "AK"),
];

static CITY_WITH_STATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?),\s*([A-Z]{2})\s*$").expect("valid city/state regex"));

/// State for the first three digits of a zip. Non-digits are ignored.
pub fn state_from_zip(zip_code: &str) -> Option<&'static str> {
    let digits: String = zip_code.chars().filter(|c| c.is_ascii_digit()).collect();
    let prefix: u16 = digits.get(..3)?.parse().ok()?;
    ZIP_RANGES
        .iter()
        .find(|(lo, hi, _)| (*lo..=*hi).contains(&prefix))
        .map(|(_, _, state)| *state)
}

/// Split a `"City, ST"` city field into `(city, state)`.
pub fn state_from_city_field(city: &str) -> Option<(String, String)> {
    let caps = CITY_WITH_STATE.captures(city)?;
    let clean_city = city.split(',').next().unwrap_or("").trim().to_string();
    Some((clean_city, caps[2].to_string()))
}

/// Lowercased city to the state most often paired with it. Only 2-letter
/// states count; ties go to the state seen first.
pub fn build_city_state_map(facilities: &[Facility]) -> HashMap<String, String> {
    let mut counts: HashMap<String, Vec<(String, usize)>> = HashMap::new();
    for facility in facilities {
        let Some(loc) = facility.location.as_ref() else {
            continue;
        };
        let city = loc.city.as_deref().unwrap_or("").trim().to_lowercase();
        let state = loc.state.as_deref().unwrap_or("");
        if city.is_empty() || state.chars().count() != 2 {
            continue;
        }
        let seen = counts.entry(city).or_default();
        match seen.iter_mut().find(|(s, _)| s == state) {
            Some((_, n)) => *n += 1,
            None => seen.push((state.to_string(), 1)),
        }
    }

    counts
        .into_iter()
        .filter_map(|(city, states)| {
            let mut best: Option<&(String, usize)> = None;
            for entry in &states {
                if best.map_or(true, |b| entry.1 > b.1) {
                    best = Some(entry);
                }
            }
            best.map(|(state, _)| (city, state.clone()))
        })
        .collect()
}
