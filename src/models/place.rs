// src/models/place.rs
//
// Subset of the Places API (New) `places:searchText` response that the
// enrichment job reads. Field names follow the API's camelCase.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating_count: Option<u64>,
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressComponent {
    #[serde(default)]
    pub long_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_text: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceReview {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub text: Option<LocalizedText>,
    #[serde(default)]
    pub author_attribution: Option<AuthorAttribution>,
    #[serde(default)]
    pub publish_time: Option<String>,
    #[serde(default)]
    pub relative_publish_time_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorAttribution {
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Place {
    pub fn display_name_text(&self) -> &str {
        self.display_name.as_ref().map_or("", |d| d.text.as_str())
    }

    pub fn formatted_address_text(&self) -> &str {
        self.formatted_address.as_deref().unwrap_or("")
    }
}

impl SearchResponse {
    /// Top-ranked candidate, if the search returned any.
    pub fn best_place(&self) -> Option<&Place> {
        self.places.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "places": [{
                "id": "ChIJ123",
                "displayName": {"text": "Acme Transload", "languageCode": "en"},
                "formattedAddress": "123 Main St, Dallas, TX 75201, USA",
                "addressComponents": [
                    {"longText": "123", "shortText": "123", "types": ["street_number"]},
                    {"longText": "Main Street", "shortText": "Main St", "types": ["route"]}
                ],
                "location": {"latitude": 32.78, "longitude": -96.80},
                "nationalPhoneNumber": "(214) 555-0100",
                "rating": 4.5,
                "userRatingCount": 12
            }]
        }"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        let place = response.best_place().unwrap();
        assert_eq!(place.display_name_text(), "Acme Transload");
        assert_eq!(place.address_components.len(), 2);
        assert_eq!(place.location.as_ref().unwrap().latitude, Some(32.78));
        assert_eq!(place.user_rating_count, Some(12));
        assert!(place.reviews.is_empty());
    }

    #[test]
    fn test_empty_response_has_no_best_place() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.best_place().is_none());
    }
}
