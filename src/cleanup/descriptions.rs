// src/cleanup/descriptions.rs - Template description for facilities without one
use crate::cleanup::labels::type_label;
use crate::models::Facility;

pub fn generate_description(facility: &Facility) -> String {
    let name = facility.name.trim();
    let label = type_label(facility.facility_type.as_deref());

    let mut desc = if label.is_empty() {
        format!("{} is a rail-served facility", name)
    } else {
        format!("{} is a {} facility", name, label)
    };

    let loc = facility.location.as_ref();
    let city = loc.and_then(|l| l.get_text("city"));
    let state = loc.and_then(|l| l.get_text("state"));
    match (city, state) {
        (Some(city), Some(state)) => desc.push_str(&format!(" located in {}, {}", city, state)),
        (Some(place), None) | (None, Some(place)) => {
            desc.push_str(&format!(" located in {}", place))
        }
        (None, None) => {}
    }

    let services = facility
        .capabilities
        .as_ref()
        .map(|caps| caps.service_phrases())
        .unwrap_or_default();
    if !services.is_empty() {
        desc.push_str(&format!(", offering {}", services.join(", ")));
    }

    let railroads = facility.railroad_names();
    if let Some((last, rest)) = railroads.split_last() {
        if rest.is_empty() {
            desc.push_str(&format!(". Served by {}", last));
        } else {
            desc.push_str(&format!(". Served by {} and {}", rest.join(", "), last));
        }
    }

    desc.push('.');
    desc
}
