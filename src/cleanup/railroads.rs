// src/cleanup/railroads.rs - Canonical railroad names, one entry per railroad
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::models::{RailroadRef, RailroadService};

/// Alias to canonical short name. `None` marks the combined entry that is
/// expanded instead of renamed.
pub const RAILROAD_ALIASES: [(&str, Option<&str>); 9] = [
    ("Union Pacific", Some("UP")),
    ("Norfolk Southern", Some("NS")),
    ("BNSF Railway", Some("BNSF")),
    ("CSXT", Some("CSX")),
    ("CSXT via ATN", Some("CSX")),
    ("Paducah & Louisville", Some("PAL")),
    ("Paducah & Louisville Railway", Some("PAL")),
    ("Providence & Worcester", Some("P&W")),
    (MULTI_RAILROAD_ENTRY, None),
];

pub const MULTI_RAILROAD_ENTRY: &str = "CSX/NS/BNSF/CN/UP/CPKC";

fn alias(name: &str) -> Option<Option<&'static str>> {
    RAILROAD_ALIASES
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
}

/// Name after alias resolution, or `None` for a name that maps to nothing.
pub fn canonical_name(name: &str) -> Option<String> {
    match alias(name) {
        Some(Some(canonical)) => Some(canonical.to_string()),
        Some(None) => None,
        None => Some(name.to_string()),
    }
}

/// True when the name is an alias that resolves to a different railroad name.
pub fn is_renamed_alias(name: &str) -> bool {
    matches!(alias(name), Some(Some(_)))
}

/// Resolve aliases, expand the combined entry, drop unnamed entries and keep
/// the first occurrence of each railroad. Schedule fields of kept entries are
/// preserved; the railroad object itself is reduced to its name.
pub fn normalize_railroads(railroads: &[RailroadService]) -> Vec<RailroadService> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(railroads.len());

    for service in railroads {
        let name = service.name();
        if name.is_empty() {
            continue;
        }

        if name == MULTI_RAILROAD_ENTRY {
            for part in name.split('/') {
                let Some(canonical) = canonical_name(part.trim()) else {
                    continue;
                };
                if !canonical.is_empty() && seen.insert(canonical.clone()) {
                    result.push(RailroadService {
                        days_of_week: Some(Value::Null),
                        notes: Some(Value::Null),
                        ..RailroadService::named(canonical)
                    });
                }
            }
            continue;
        }

        let Some(canonical) = canonical_name(name) else {
            continue;
        };
        if seen.insert(canonical.clone()) {
            result.push(RailroadService {
                railroad: Some(RailroadRef {
                    name: canonical,
                    extra: Map::new(),
                }),
                ..service.clone()
            });
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(services: &[RailroadService]) -> Vec<&str> {
        services.iter().map(RailroadService::name).collect()
    }

    #[test]
    fn test_aliases_and_dedupe() {
        let input = vec![
            RailroadService::named("Union Pacific"),
            RailroadService::named("UP"),
            RailroadService::named("CSXT"),
        ];
        assert_eq!(names(&normalize_railroads(&input)), vec!["UP", "CSX"]);
    }

    #[test]
    fn test_combined_entry_expands() {
        let input = vec![
            RailroadService::named("NS"),
            RailroadService::named(MULTI_RAILROAD_ENTRY),
        ];
        let out = normalize_railroads(&input);
        assert_eq!(names(&out), vec!["NS", "CSX", "BNSF", "CN", "UP", "CPKC"]);
        assert_eq!(out[1].days_of_week, Some(Value::Null));
        assert_eq!(out[1].notes, Some(Value::Null));
    }

    #[test]
    fn test_schedule_fields_survive_rename() {
        let mut service = RailroadService::named("Norfolk Southern");
        service.days_of_week = Some(json!(["Mon", "Wed"]));
        service.notes = Some(json!("switch twice weekly"));
        let out = normalize_railroads(&[service]);
        assert_eq!(out[0].name(), "NS");
        assert_eq!(out[0].days_of_week, Some(json!(["Mon", "Wed"])));
        assert_eq!(out[0].notes, Some(json!("switch twice weekly")));
    }

    #[test]
    fn test_unnamed_entries_dropped() {
        let input = vec![RailroadService::default(), RailroadService::named("BNSF")];
        assert_eq!(names(&normalize_railroads(&input)), vec!["BNSF"]);
    }

    #[test]
    fn test_alias_detection() {
        assert!(is_renamed_alias("Union Pacific"));
        assert!(!is_renamed_alias(MULTI_RAILROAD_ENTRY));
        assert!(!is_renamed_alias("UP"));
    }
}
