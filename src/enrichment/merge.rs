// src/enrichment/merge.rs - Additive-only merge of a place candidate into a facility
use chrono::Utc;

use crate::matching::{extract_address_parts, format_phone};
use crate::models::facility::is_blank;
use crate::models::{EnrichmentMetadata, Facility, GoogleReview, Place, PlaceReview};

pub const ENRICHMENT_SOURCE: &str = "google_places";
pub const MAX_REVIEWS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub facility: Facility,
    pub fields_filled: Vec<String>,
}

/// Fill empty facility fields from `place`. Populated fields are never
/// overwritten; the Google provenance fields are the exception and refresh on
/// every accepted match. With `coords_only` only the coordinates (plus place id
/// and enrichment stamp) are written.
pub fn merge_candidate(
    facility: &Facility,
    place: &Place,
    confidence: f64,
    coords_only: bool,
) -> MergeOutcome {
    let mut merged = facility.clone();
    let mut filled: Vec<String> = Vec::new();

    if !coords_only {
        if is_blank(merged.website.as_deref()) {
            if let Some(uri) = place.website_uri.as_deref().filter(|u| !u.is_empty()) {
                merged.website = Some(uri.to_string());
                filled.push("website".to_string());
            }
        }
        if is_blank(merged.phone.as_deref()) {
            if let Some(raw) = place
                .national_phone_number
                .as_deref()
                .filter(|p| !p.is_empty())
            {
                merged.phone = Some(format_phone(raw));
                filled.push("phone".to_string());
            }
        }
    }

    let coords = place.location.as_ref();
    if let Some(lat) = coords.and_then(|c| c.latitude) {
        if merged.latitude().is_none() {
            merged.location_mut().latitude = Some(lat);
            filled.push("latitude".to_string());
        }
    }
    if let Some(lon) = coords.and_then(|c| c.longitude) {
        if merged.longitude().is_none() {
            merged.location_mut().longitude = Some(lon);
            filled.push("longitude".to_string());
        }
    }

    if !coords_only {
        let parts = extract_address_parts(&place.address_components);
        if let Some(street) = parts.street_address {
            let location = merged.location_mut();
            if is_blank(location.street_address.as_deref()) {
                location.street_address = Some(street);
                filled.push("street_address".to_string());
            }
        }
        if let Some(zip) = parts.zip_code.filter(|z| !z.is_empty()) {
            let location = merged.location_mut();
            if is_blank(location.zip_code.as_deref()) {
                location.zip_code = Some(zip);
                filled.push("zip_code".to_string());
            }
        }

        if let Some(rating) = place.rating {
            merged.google_rating = Some(rating);
            filled.push("google_rating".to_string());
        }
        if let Some(count) = place.user_rating_count {
            merged.google_review_count = Some(count);
            filled.push("google_review_count".to_string());
        }
        if !place.reviews.is_empty() {
            merged.google_reviews = Some(build_reviews(&place.reviews));
        }
    }

    if let Some(place_id) = place.id.as_deref().filter(|id| !id.is_empty()) {
        merged.google_place_id = Some(place_id.to_string());
    }

    merged.enrichment = Some(EnrichmentMetadata {
        source: ENRICHMENT_SOURCE.to_string(),
        confidence: round4(confidence),
        timestamp: Some(Utc::now()),
        fields_filled: filled.clone(),
    });

    MergeOutcome {
        facility: merged,
        fields_filled: filled,
    }
}

pub fn build_reviews(reviews: &[PlaceReview]) -> Vec<GoogleReview> {
    reviews
        .iter()
        .take(MAX_REVIEWS)
        .map(|r| GoogleReview {
            author: r
                .author_attribution
                .as_ref()
                .and_then(|a| a.display_name.clone())
                .unwrap_or_default(),
            rating: r.rating,
            text: r.text.as_ref().map(|t| t.text.clone()).unwrap_or_default(),
            time: r.publish_time.clone().unwrap_or_default(),
            relative_time: r
                .relative_publish_time_description
                .clone()
                .unwrap_or_default(),
        })
        .collect()
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::AuthorAttribution;
    use crate::models::{AddressComponent, LatLng, LocalizedText, Location};

    fn full_place() -> Place {
        Place {
            id: Some("ChIJ-acme".into()),
            display_name: Some(LocalizedText {
                text: "Acme".into(),
                language_code: None,
            }),
            formatted_address: Some("123 Main St, Dallas, TX 75201".into()),
            address_components: vec![
                AddressComponent {
                    long_text: "123".into(),
                    short_text: None,
                    types: vec!["street_number".into()],
                },
                AddressComponent {
                    long_text: "Main St".into(),
                    short_text: None,
                    types: vec!["route".into()],
                },
                AddressComponent {
                    long_text: "75201".into(),
                    short_text: None,
                    types: vec!["postal_code".into()],
                },
            ],
            location: Some(LatLng {
                latitude: Some(32.78),
                longitude: Some(-96.80),
            }),
            national_phone_number: Some("(214) 555-0100".into()),
            website_uri: Some("https://acme.com".into()),
            rating: Some(4.2),
            user_rating_count: Some(17),
            reviews: (0..7)
                .map(|i| PlaceReview {
                    rating: Some(5.0),
                    text: Some(LocalizedText {
                        text: format!("review {}", i),
                        language_code: None,
                    }),
                    author_attribution: Some(AuthorAttribution {
                        display_name: Some(format!("author {}", i)),
                    }),
                    publish_time: Some("2024-01-01T00:00:00Z".into()),
                    relative_publish_time_description: Some("a year ago".into()),
                })
                .collect(),
        }
    }

    #[test]
    fn test_fills_every_empty_field() {
        let facility = Facility {
            name: "Acme LLC".into(),
            ..Default::default()
        };
        let outcome = merge_candidate(&facility, &full_place(), 0.91234, false);
        let merged = &outcome.facility;

        assert_eq!(
            outcome.fields_filled,
            vec![
                "website",
                "phone",
                "latitude",
                "longitude",
                "street_address",
                "zip_code",
                "google_rating",
                "google_review_count"
            ]
        );
        assert_eq!(merged.phone.as_deref(), Some("+12145550100"));
        let loc = merged.location.as_ref().unwrap();
        assert_eq!(loc.street_address.as_deref(), Some("123 Main St"));
        assert_eq!(loc.zip_code.as_deref(), Some("75201"));
        assert_eq!(merged.google_reviews.as_ref().unwrap().len(), MAX_REVIEWS);
        assert_eq!(merged.google_place_id.as_deref(), Some("ChIJ-acme"));

        let stamp = merged.enrichment.as_ref().unwrap();
        assert_eq!(stamp.source, "google_places");
        assert_eq!(stamp.confidence, 0.9123);
        assert_eq!(stamp.fields_filled, outcome.fields_filled);
    }

    #[test]
    fn test_never_overwrites_populated_fields() {
        let facility = Facility {
            name: "Acme".into(),
            website: Some("https://existing.example".into()),
            phone: Some("+19995550000".into()),
            location: Some(Location {
                street_address: Some("1 Depot Rd".into()),
                zip_code: Some("75001".into()),
                latitude: Some(10.0),
                longitude: Some(20.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        for confidence in [0.0, 0.5, 1.0] {
            let outcome = merge_candidate(&facility, &full_place(), confidence, false);
            let merged = &outcome.facility;
            assert_eq!(merged.website.as_deref(), Some("https://existing.example"));
            assert_eq!(merged.phone.as_deref(), Some("+19995550000"));
            let loc = merged.location.as_ref().unwrap();
            assert_eq!(loc.street_address.as_deref(), Some("1 Depot Rd"));
            assert_eq!(loc.zip_code.as_deref(), Some("75001"));
            assert_eq!((loc.latitude, loc.longitude), (Some(10.0), Some(20.0)));
            assert_eq!(
                outcome.fields_filled,
                vec!["google_rating", "google_review_count"]
            );
        }
    }

    #[test]
    fn test_provenance_fields_are_refreshed() {
        let facility = Facility {
            name: "Acme".into(),
            google_rating: Some(1.0),
            google_review_count: Some(2),
            ..Default::default()
        };
        let merged = merge_candidate(&facility, &full_place(), 0.9, false).facility;
        assert_eq!(merged.google_rating, Some(4.2));
        assert_eq!(merged.google_review_count, Some(17));
    }

    #[test]
    fn test_coords_only_mode() {
        let facility = Facility {
            name: "Acme".into(),
            ..Default::default()
        };
        let outcome = merge_candidate(&facility, &full_place(), 0.5, true);
        assert_eq!(outcome.fields_filled, vec!["latitude", "longitude"]);
        let merged = &outcome.facility;
        assert!(merged.website.is_none());
        assert!(merged.phone.is_none());
        assert!(merged.google_rating.is_none());
        assert!(merged.google_reviews.is_none());
        assert_eq!(merged.google_place_id.as_deref(), Some("ChIJ-acme"));
        assert!(merged.enrichment.is_some());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let facility = Facility {
            name: "Acme".into(),
            ..Default::default()
        };
        let before = facility.clone();
        let _ = merge_candidate(&facility, &full_place(), 0.9, false);
        assert_eq!(facility, before);
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(1.0), 1.0);
    }
}
