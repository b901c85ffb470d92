// src/matching/address.rs - Structured address fields from place address components
use crate::models::AddressComponent;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressParts {
    pub street_address: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Map component type tags onto facility location fields. When several
/// components carry the same tag the last one wins. `street_number` and `route`
/// are joined into a single street address.
pub fn extract_address_parts(components: &[AddressComponent]) -> AddressParts {
    let mut street_number: Option<String> = None;
    let mut route: Option<String> = None;
    let mut parts = AddressParts::default();

    for component in components {
        for component_type in &component.types {
            let value = Some(component.long_text.clone());
            match component_type.as_str() {
                "street_number" => street_number = value,
                "route" => route = value,
                "postal_code" => parts.zip_code = value,
                "locality" => parts.city = value,
                "administrative_area_level_1" => parts.state = value,
                "country" => parts.country = value,
                _ => {}
            }
        }
    }

    let street = [street_number, route]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let street = street.trim();
    if !street.is_empty() {
        parts.street_address = Some(street.to_string());
    }
    parts
}
