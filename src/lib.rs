// src/lib.rs
pub mod cache;
pub mod cleanup;
pub mod config;
pub mod enrichment;
pub mod geocoding;
pub mod matching;
pub mod models;
pub mod places;
pub mod utils;
