// src/models/mod.rs
pub mod facility;
pub mod place;
pub mod record_set;
pub mod stats_models;

pub use facility::{
    Capabilities, EnrichmentMetadata, Facility, GoogleReview, Location, RailroadRef,
    RailroadService,
};
pub use place::{AddressComponent, LatLng, LocalizedText, Place, PlaceReview, SearchResponse};
pub use record_set::RecordSet;
