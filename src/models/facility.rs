// src/models/facility.rs
//
// Typed view of one entry in `public/facilities.json`. Keys this crate does not
// interpret are kept in the flattened `extra` maps so a load/save cycle never
// drops data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    /// Category code such as `TRANSLOAD` or `TEAM_TRACK`.
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub facility_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub website: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub phone: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub email: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub railroads: Vec<RailroadService>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,

    // Provenance fields refreshed on every accepted match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_review_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_reviews: Option<Vec<GoogleReview>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_place_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EnrichmentMetadata>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub street_address: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub city: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub state: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub zip_code: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub country: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_f64"
    )]
    pub latitude: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_f64"
    )]
    pub longitude: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `None` means the key was absent; an explicit `null` is `Some(Value::Null)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RailroadService {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_railroad"
    )]
    pub railroad: Option<RailroadRef>,
    #[serde(
        rename = "daysOfWeek",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub days_of_week: Option<Value>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub notes: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RailroadRef {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Free-form capability flags. Only a handful of keys feed the description
/// template, everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(pub Map<String, Value>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleReview {
    pub author: String,
    pub rating: Option<f64>,
    pub text: String,
    pub time: String,
    pub relative_time: String,
}

/// Blocks written by other tools may omit any field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentMetadata {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields_filled: Vec<String>,
}

/// True when the value is absent or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

impl Facility {
    pub fn city(&self) -> &str {
        self.location
            .as_ref()
            .and_then(|loc| loc.city.as_deref())
            .unwrap_or("")
    }

    pub fn state(&self) -> &str {
        self.location
            .as_ref()
            .and_then(|loc| loc.state.as_deref())
            .unwrap_or("")
    }

    pub fn latitude(&self) -> Option<f64> {
        self.location.as_ref().and_then(|loc| loc.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.location.as_ref().and_then(|loc| loc.longitude)
    }

    pub fn location_mut(&mut self) -> &mut Location {
        self.location.get_or_insert_with(Location::default)
    }

    /// Website, phone and both coordinates are all present.
    pub fn has_key_fields(&self) -> bool {
        !is_blank(self.website.as_deref())
            && !is_blank(self.phone.as_deref())
            && self.latitude().is_some()
            && self.longitude().is_some()
    }

    pub fn railroad_names(&self) -> Vec<&str> {
        self.railroads
            .iter()
            .map(RailroadService::name)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

impl Location {
    pub fn get_text(&self, field: &str) -> Option<&str> {
        let value = match field {
            "street_address" => self.street_address.as_deref(),
            "city" => self.city.as_deref(),
            "state" => self.state.as_deref(),
            "zip_code" => self.zip_code.as_deref(),
            "country" => self.country.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

impl RailroadService {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            railroad: Some(RailroadRef {
                name: name.into(),
                extra: Map::new(),
            }),
            days_of_week: None,
            notes: None,
            extra: Map::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.railroad.as_ref().map_or("", |r| r.name.as_str())
    }
}

impl Capabilities {
    /// Service phrases used by the description template, in display order.
    pub fn service_phrases(&self) -> Vec<String> {
        let mut services = Vec::new();
        if let Some(capacity) = self.0.get("track_capacity").and_then(display_truthy) {
            services.push(format!("{} track capacity", capacity));
        }
        let flags = [
            ("indoor_storage", "indoor storage"),
            ("outdoor_storage", "outdoor storage"),
            ("hazmat", "hazmat handling"),
            ("heavy_lift", "heavy lift capability"),
        ];
        for (key, phrase) in flags {
            if self.0.get(key).map_or(false, is_truthy) {
                services.push(phrase.to_string());
            }
        }
        services
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn display_truthy(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite()))
}

fn lenient_f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.unwrap_or(0.0))
}

/// Keeps an explicit `null` distinct from a missing key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Accepts `{"name": "UP"}` or the bare string `"UP"`.
fn lenient_railroad<'de, D>(deserializer: D) -> Result<Option<RailroadRef>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(name)) => Ok(Some(RailroadRef {
            name,
            extra: Map::new(),
        })),
        Some(value @ Value::Object(_)) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
