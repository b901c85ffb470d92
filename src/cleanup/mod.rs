// src/cleanup/mod.rs - Offline data cleanup pass over the facility list
pub mod descriptions;
pub mod labels;
pub mod names;
pub mod railroads;
pub mod states;

pub use descriptions::generate_description;
pub use labels::{title_case, type_label};
pub use names::clean_location_name;
pub use railroads::normalize_railroads;
pub use states::{build_city_state_map, state_from_city_field, state_from_zip};

use log::debug;
use std::collections::HashMap;

use crate::models::facility::is_blank;
use crate::models::stats_models::CleanupStats;
use crate::models::Facility;

/// Apply state fill, name cleanup, railroad normalization and description
/// generation to each facility, in that order. The city/state lookup is
/// built once from the input before any record changes.
pub fn run_cleanup(facilities: &mut [Facility]) -> CleanupStats {
    let city_states = build_city_state_map(facilities);
    let mut stats = CleanupStats::default();

    for facility in facilities.iter_mut() {
        fill_state(facility, &city_states, &mut stats);

        if facility.name.contains(',') {
            if let Some(cleaned) =
                clean_location_name(&facility.name, facility.facility_type.as_deref())
            {
                if cleaned != facility.name {
                    debug!("Renamed '{}' -> '{}'", facility.name, cleaned);
                    facility.name = cleaned;
                    stats.names_cleaned += 1;
                }
            }
        }

        normalize_facility_railroads(facility, &mut stats);

        if is_blank(facility.description.as_deref()) {
            facility.description = Some(generate_description(facility));
            stats.descriptions_generated += 1;
        }
    }
    stats
}

fn fill_state(
    facility: &mut Facility,
    city_states: &HashMap<String, String>,
    stats: &mut CleanupStats,
) {
    let Some(loc) = facility.location.as_mut() else {
        return;
    };
    if loc.get_text("state").is_some() {
        return;
    }

    if let Some(state) = loc.get_text("zip_code").and_then(state_from_zip) {
        loc.state = Some(state.to_string());
        stats.states_filled += 1;
        stats.states_filled_from_zip += 1;
        return;
    }

    let Some(city) = loc.get_text("city").map(str::to_string) else {
        return;
    };
    if let Some((clean_city, state)) = state_from_city_field(&city) {
        loc.city = Some(clean_city);
        loc.state = Some(state);
        stats.states_filled += 1;
        stats.states_filled_from_city_field += 1;
        return;
    }
    if let Some(state) = city_states.get(&city.trim().to_lowercase()) {
        loc.state = Some(state.clone());
        stats.states_filled += 1;
        stats.states_filled_from_city_lookup += 1;
    }
}

fn normalize_facility_railroads(facility: &mut Facility, stats: &mut CleanupStats) {
    if facility.railroads.is_empty() {
        return;
    }
    let normalized = normalize_railroads(&facility.railroads);
    let original_names: Vec<&str> = facility.railroads.iter().map(|r| r.name()).collect();
    let new_names: Vec<&str> = normalized.iter().map(|r| r.name()).collect();
    if original_names == new_names {
        return;
    }

    let alias_resolved = original_names
        .iter()
        .any(|name| railroads::is_renamed_alias(name));
    if normalized.len() < facility.railroads.len() {
        stats.railroads_deduped += facility.railroads.len() - normalized.len();
    }
    if alias_resolved {
        stats.railroads_normalized += 1;
    }
    facility.railroads = normalized;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, RailroadService};

    fn facility(name: &str, city: Option<&str>, state: Option<&str>, zip: Option<&str>) -> Facility {
        Facility {
            name: name.into(),
            location: Some(Location {
                city: city.map(str::to_string),
                state: state.map(str::to_string),
                zip_code: zip.map(str::to_string),
                ..Default::default()
            }),
            description: Some("existing".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_state_fill_sources() {
        let mut facilities = vec![
            facility("A", Some("Dallas"), None, Some("75201")),
            facility("B", Some("Guernsey, SK"), None, None),
            facility("C", Some("Reno"), Some("NV"), None),
            facility("D", Some("reno"), None, None),
            facility("E", Some("Nowhere"), None, None),
        ];
        let stats = run_cleanup(&mut facilities);

        assert_eq!(facilities[0].state(), "TX");
        assert_eq!(facilities[1].state(), "SK");
        assert_eq!(facilities[1].city(), "Guernsey");
        assert_eq!(facilities[3].state(), "NV");
        assert_eq!(facilities[4].state(), "");
        assert_eq!(stats.states_filled, 3);
        assert_eq!(stats.states_filled_from_zip, 1);
        assert_eq!(stats.states_filled_from_city_field, 1);
        assert_eq!(stats.states_filled_from_city_lookup, 1);
    }

    #[test]
    fn test_name_then_description_uses_cleaned_name() {
        let mut f = facility("Watco - Reno, NV", Some("Reno"), Some("NV"), None);
        f.facility_type = Some("TRANSLOAD".into());
        f.description = None;
        let mut facilities = vec![f];
        let stats = run_cleanup(&mut facilities);

        assert_eq!(facilities[0].name, "Watco Reno Transload");
        assert_eq!(
            facilities[0].description.as_deref(),
            Some("Watco Reno Transload is a transload facility located in Reno, NV.")
        );
        assert_eq!(stats.names_cleaned, 1);
        assert_eq!(stats.descriptions_generated, 1);
    }

    #[test]
    fn test_railroad_stats() {
        let mut f = facility("Depot", None, Some("TX"), None);
        f.railroads = vec![
            RailroadService::named("Union Pacific"),
            RailroadService::named("UP"),
            RailroadService::named("CSXT"),
        ];
        let mut unchanged = facility("Yard", None, Some("TX"), None);
        unchanged.railroads = vec![RailroadService::named("BNSF")];
        let mut facilities = vec![f, unchanged];
        let stats = run_cleanup(&mut facilities);

        assert_eq!(facilities[0].railroad_names(), vec!["UP", "CSX"]);
        assert_eq!(facilities[1].railroad_names(), vec!["BNSF"]);
        assert_eq!(stats.railroads_deduped, 1);
        assert_eq!(stats.railroads_normalized, 1);
    }

    #[test]
    fn test_existing_description_and_state_kept() {
        let mut facilities = vec![facility("Depot", Some("Dallas"), Some("OK"), Some("75201"))];
        let stats = run_cleanup(&mut facilities);
        assert_eq!(facilities[0].state(), "OK");
        assert_eq!(facilities[0].description.as_deref(), Some("existing"));
        assert_eq!(stats, CleanupStats::default());
    }
}
