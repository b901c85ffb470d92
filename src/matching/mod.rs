// src/matching/mod.rs
pub mod address;
pub mod confidence;
pub mod name;
pub mod phone;

pub use address::{extract_address_parts, AddressParts};
pub use confidence::{city_matches, match_confidence, name_similarity};
pub use name::normalize_name;
pub use phone::format_phone;
