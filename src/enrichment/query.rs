// src/enrichment/query.rs
use crate::models::Facility;

/// `"{name}{type hint}, {city}, {state}"`. The facility type is appended as a
/// hint ("acme transload facility") so niche B2B names don't resolve to an
/// unrelated business with the same name.
pub fn build_query(facility: &Facility) -> String {
    let type_hint = facility
        .facility_type
        .as_deref()
        .map(|t| t.replace('_', " ").to_lowercase())
        .filter(|t| !t.trim().is_empty())
        .map(|t| format!(" {} facility", t))
        .unwrap_or_default();

    format!(
        "{}{}, {}, {}",
        facility.name,
        type_hint,
        facility.city(),
        facility.state()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;

    fn facility(name: &str, facility_type: Option<&str>, city: &str, state: &str) -> Facility {
        Facility {
            name: name.to_string(),
            facility_type: facility_type.map(str::to_string),
            location: Some(Location {
                city: Some(city.to_string()),
                state: Some(state.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_query_with_type_hint() {
        let f = facility("Acme Rail", Some("TEAM_TRACK"), "Dallas", "TX");
        assert_eq!(build_query(&f), "Acme Rail team track facility, Dallas, TX");
    }

    #[test]
    fn test_query_without_type() {
        let f = facility("Acme Rail", None, "Dallas", "TX");
        assert_eq!(build_query(&f), "Acme Rail, Dallas, TX");
    }

    #[test]
    fn test_query_without_location_degrades() {
        let f = Facility {
            name: "Acme Rail".into(),
            ..Default::default()
        };
        assert_eq!(build_query(&f), "Acme Rail, , ");
    }
}
