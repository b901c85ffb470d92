// src/models/stats_models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Audit entry for a candidate that scored below the acceptance threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowConfidenceMatch {
    pub facility: String,
    pub matched: String,
    pub confidence: f64,
}

/// Aggregate counters for one enrichment run. Written as the optional report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentStats {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub total_facilities: usize,
    pub processed: usize,
    pub enriched: usize,
    pub skipped_already_enriched: usize,
    pub skipped_already_complete: usize,
    pub skipped_no_results: usize,
    pub skipped_low_confidence: usize,
    pub lookup_errors: usize,
    pub api_calls_made: usize,
    pub cache_hits: usize,
    pub fields_filled: BTreeMap<String, usize>,
    pub low_confidence_matches: Vec<LowConfidenceMatch>,
    pub interrupted: bool,
}

impl EnrichmentStats {
    pub fn new(total_facilities: usize) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            total_facilities,
            processed: 0,
            enriched: 0,
            skipped_already_enriched: 0,
            skipped_already_complete: 0,
            skipped_no_results: 0,
            skipped_low_confidence: 0,
            lookup_errors: 0,
            api_calls_made: 0,
            cache_hits: 0,
            fields_filled: BTreeMap::new(),
            low_confidence_matches: Vec::new(),
            interrupted: false,
        }
    }

    pub fn record_fields_filled(&mut self, fields: &[String]) {
        for field in fields {
            *self.fields_filled.entry(field.clone()).or_insert(0) += 1;
        }
    }

    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.api_calls_made;
        if lookups == 0 {
            0.0
        } else {
            (self.cache_hits as f64 / lookups as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocodeStats {
    pub total: usize,
    pub missing_coordinates: usize,
    pub geocoded: usize,
    pub cached: usize,
    pub failed: usize,
    pub interrupted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanupStats {
    pub states_filled: usize,
    pub states_filled_from_zip: usize,
    pub states_filled_from_city_field: usize,
    pub states_filled_from_city_lookup: usize,
    pub descriptions_generated: usize,
    pub names_cleaned: usize,
    pub railroads_normalized: usize,
    pub railroads_deduped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fields_filled_accumulates() {
        let mut stats = EnrichmentStats::new(3);
        stats.record_fields_filled(&["website".to_string(), "phone".to_string()]);
        stats.record_fields_filled(&["website".to_string()]);
        assert_eq!(stats.fields_filled.get("website"), Some(&2));
        assert_eq!(stats.fields_filled.get("phone"), Some(&1));
    }

    #[test]
    fn test_cache_hit_rate() {
        let mut stats = EnrichmentStats::new(0);
        assert_eq!(stats.cache_hit_rate(), 0.0);
        stats.cache_hits = 3;
        stats.api_calls_made = 1;
        assert!((stats.cache_hit_rate() - 75.0).abs() < 1e-9);
    }
}
