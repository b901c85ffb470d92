// src/enrichment/orchestrator.rs - Per-record state machine over a facility batch
use indicatif::ProgressBar;
use log::{debug, info, warn};

use crate::enrichment::merge::{merge_candidate, round4};
use crate::enrichment::query::build_query;
use crate::matching::match_confidence;
use crate::models::stats_models::{EnrichmentStats, LowConfidenceMatch};
use crate::models::Facility;
use crate::places::PlaceLookup;
use crate::utils::progress_bars::logging::{BatchJob, BatchLogger};
use crate::utils::progress_bars::progress_config::ProgressConfig;
use crate::utils::CancellationToken;

pub const DEFAULT_THRESHOLD: f64 = 0.80;

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub threshold: f64,
    pub skip_enriched: bool,
    pub coords_only: bool,
    /// Only the first N records go through lookup; the rest pass through.
    pub limit: Option<usize>,
    /// Progress cadence and whether cache hits appear in progress text.
    pub progress: ProgressConfig,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            skip_enriched: false,
            coords_only: false,
            limit: None,
            progress: ProgressConfig::default(),
        }
    }
}

impl EnrichOptions {
    /// Records that go through lookup out of `total`.
    pub fn work_len(&self, total: usize) -> usize {
        self.limit.map_or(total, |n| n.min(total))
    }
}

/// Terminal state of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    SkippedAlreadyEnriched,
    SkippedComplete,
    NoResult,
    LowConfidence,
    Merged,
}

/// Run every facility through skip checks, lookup, scoring and merge. The
/// output always has the same length and order as the input: records past
/// `limit` or after cancellation are appended unchanged.
pub async fn process_facilities<L: PlaceLookup>(
    facilities: Vec<Facility>,
    lookup: &mut L,
    options: &EnrichOptions,
    cancel: &CancellationToken,
    progress: Option<&ProgressBar>,
) -> (Vec<Facility>, EnrichmentStats) {
    let logger = BatchLogger::new(BatchJob::Enrich);
    let total = facilities.len();
    let work_len = options.work_len(total);
    let mut stats = EnrichmentStats::new(total);
    let mut output = Vec::with_capacity(total);

    let mut records = facilities.into_iter();
    for position in 1..=work_len {
        let Some(facility) = records.next() else { break };

        if cancel.is_cancelled() {
            stats.interrupted = true;
            logger.log_interrupted(stats.processed, work_len);
            output.push(facility);
            break;
        }

        let (record, outcome) = enrich_one(facility, lookup, options, &mut stats).await;
        debug!("{} '{}' -> {:?}", logger.tag(), record.name, outcome);
        output.push(record);
        stats.processed += 1;

        if let Some(pb) = progress {
            pb.inc(1);
        }
        if options.progress.should_log(position, work_len) {
            let message = progress_message(&stats, options.progress.show_cache_stats);
            match progress {
                Some(pb) => pb.set_message(message),
                None => logger.log_progress(position, work_len, &message),
            }
        }
    }

    output.extend(records);
    if let Some(pb) = progress {
        pb.finish_with_message(format!("{} enriched", stats.enriched));
    }
    (output, stats)
}

fn progress_message(stats: &EnrichmentStats, show_cache_stats: bool) -> String {
    if show_cache_stats {
        format!("{} enriched, {} cache hits", stats.enriched, stats.cache_hits)
    } else {
        format!("{} enriched", stats.enriched)
    }
}

async fn enrich_one<L: PlaceLookup>(
    facility: Facility,
    lookup: &mut L,
    options: &EnrichOptions,
    stats: &mut EnrichmentStats,
) -> (Facility, RecordOutcome) {
    if options.skip_enriched && facility.enrichment.is_some() {
        stats.skipped_already_enriched += 1;
        return (facility, RecordOutcome::SkippedAlreadyEnriched);
    }
    if facility.has_key_fields() {
        stats.skipped_already_complete += 1;
        return (facility, RecordOutcome::SkippedComplete);
    }

    let query = build_query(&facility);
    let response = match lookup.lookup(&query).await {
        Ok(outcome) => {
            if outcome.from_cache {
                stats.cache_hits += 1;
            } else {
                stats.api_calls_made += 1;
            }
            outcome.response
        }
        Err(e) => {
            warn!("Lookup failed for '{}': {:#}", facility.name, e);
            stats.api_calls_made += 1;
            stats.lookup_errors += 1;
            stats.skipped_no_results += 1;
            return (facility, RecordOutcome::NoResult);
        }
    };

    let Some(place) = response.best_place() else {
        stats.skipped_no_results += 1;
        return (facility, RecordOutcome::NoResult);
    };

    let confidence = match_confidence(
        &facility.name,
        facility.city(),
        place.display_name_text(),
        place.formatted_address_text(),
    );
    if confidence < options.threshold {
        info!(
            "Low confidence {:.2} for '{}' -> '{}'",
            confidence,
            facility.name,
            place.display_name_text()
        );
        stats.skipped_low_confidence += 1;
        stats.low_confidence_matches.push(LowConfidenceMatch {
            facility: facility.name.clone(),
            matched: place.display_name_text().to_string(),
            confidence: round4(confidence),
        });
        return (facility, RecordOutcome::LowConfidence);
    }

    let outcome = merge_candidate(&facility, place, confidence, options.coords_only);
    stats.enriched += 1;
    stats.record_fields_filled(&outcome.fields_filled);
    (outcome.facility, RecordOutcome::Merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryResponseCache;
    use crate::models::{LatLng, LocalizedText, Location, Place, SearchResponse};
    use crate::places::{CachedPlaceLookup, LookupOutcome, PlaceSearch};
    use anyhow::{anyhow, Result};

    /// Live search that answers with a body that is not JSON.
    struct GarbledSearch {
        calls: usize,
    }

    impl PlaceSearch for GarbledSearch {
        async fn search_text(&mut self, _query: &str) -> Result<String> {
            self.calls += 1;
            Ok("<html>upstream error</html>".to_string())
        }
    }

    struct FixedLookup {
        place: Option<Place>,
        from_cache: bool,
        fail: bool,
        calls: usize,
    }

    impl FixedLookup {
        fn returning(place: Option<Place>) -> Self {
            Self {
                place,
                from_cache: false,
                fail: false,
                calls: 0,
            }
        }
    }

    impl PlaceLookup for FixedLookup {
        async fn lookup(&mut self, _query: &str) -> Result<LookupOutcome> {
            self.calls += 1;
            if self.fail {
                return Err(anyhow!("connection reset"));
            }
            Ok(LookupOutcome {
                response: SearchResponse {
                    places: self.place.clone().into_iter().collect(),
                },
                from_cache: self.from_cache,
            })
        }
    }

    fn place(name: &str, address: &str) -> Place {
        Place {
            id: Some("pid".into()),
            display_name: Some(LocalizedText {
                text: name.into(),
                language_code: None,
            }),
            formatted_address: Some(address.into()),
            location: Some(LatLng {
                latitude: Some(32.7),
                longitude: Some(-96.8),
            }),
            website_uri: Some("https://acme.com".into()),
            ..Default::default()
        }
    }

    fn facility(name: &str, city: &str) -> Facility {
        Facility {
            name: name.into(),
            location: Some(Location {
                city: Some(city.into()),
                state: Some("TX".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_merges_confident_match() {
        let mut lookup = FixedLookup::returning(Some(place("Acme", "1 Main St, Dallas, TX")));
        let (out, stats) = process_facilities(
            vec![facility("Acme LLC", "Dallas")],
            &mut lookup,
            &EnrichOptions::default(),
            &CancellationToken::new(),
            None,
        )
        .await;
        assert_eq!(stats.enriched, 1);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.api_calls_made, 1);
        assert_eq!(out[0].website.as_deref(), Some("https://acme.com"));
        assert_eq!(stats.fields_filled.get("latitude"), Some(&1));
    }

    #[tokio::test]
    async fn test_skip_enriched_does_not_look_up() {
        let mut lookup = FixedLookup::returning(Some(place("Acme", "Dallas")));
        let mut record = facility("Acme", "Dallas");
        record.enrichment = Some(crate::models::EnrichmentMetadata {
            source: "google_places".into(),
            confidence: 0.9,
            timestamp: Some(chrono::Utc::now()),
            fields_filled: vec![],
        });
        let options = EnrichOptions {
            skip_enriched: true,
            ..Default::default()
        };
        let (out, stats) = process_facilities(
            vec![record.clone()],
            &mut lookup,
            &options,
            &CancellationToken::new(),
            None,
        )
        .await;
        assert_eq!(out[0], record);
        assert_eq!(stats.skipped_already_enriched, 1);
        assert_eq!(lookup.calls, 0);
    }

    #[tokio::test]
    async fn test_empty_response_is_no_result() {
        let mut lookup = FixedLookup::returning(None);
        lookup.from_cache = true;
        let (_, stats) = process_facilities(
            vec![facility("Acme", "Dallas")],
            &mut lookup,
            &EnrichOptions::default(),
            &CancellationToken::new(),
            None,
        )
        .await;
        assert_eq!(stats.skipped_no_results, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.api_calls_made, 0);
    }

    #[tokio::test]
    async fn test_lookup_error_counts_as_no_result() {
        let mut lookup = FixedLookup::returning(None);
        lookup.fail = true;
        let record = facility("Acme", "Dallas");
        let (out, stats) = process_facilities(
            vec![record.clone()],
            &mut lookup,
            &EnrichOptions::default(),
            &CancellationToken::new(),
            None,
        )
        .await;
        assert_eq!(out[0], record);
        assert_eq!(stats.lookup_errors, 1);
        assert_eq!(stats.skipped_no_results, 1);
        assert_eq!(stats.processed, 1);
    }

    #[tokio::test]
    async fn test_limit_passes_remaining_through() {
        let mut lookup = FixedLookup::returning(None);
        let records: Vec<Facility> = (0..5).map(|i| facility(&format!("F{}", i), "Reno")).collect();
        let options = EnrichOptions {
            limit: Some(2),
            ..Default::default()
        };
        let (out, stats) = process_facilities(
            records.clone(),
            &mut lookup,
            &options,
            &CancellationToken::new(),
            None,
        )
        .await;
        assert_eq!(out, records);
        assert_eq!(options.work_len(records.len()), 2);
        assert_eq!(options.work_len(1), 1);
        assert_eq!(EnrichOptions::default().work_len(5), 5);
        assert_eq!(stats.processed, 2);
        assert_eq!(lookup.calls, 2);
        assert!(!stats.interrupted);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_keeps_all_records() {
        let mut lookup = FixedLookup::returning(None);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let records: Vec<Facility> = (0..3).map(|i| facility(&format!("F{}", i), "Reno")).collect();
        let (out, stats) = process_facilities(
            records.clone(),
            &mut lookup,
            &EnrichOptions::default(),
            &cancel,
            None,
        )
        .await;
        assert_eq!(out, records);
        assert_eq!(stats.processed, 0);
        assert!(stats.interrupted);
        assert_eq!(lookup.calls, 0);
    }

    #[tokio::test]
    async fn test_confidence_equal_to_threshold_is_accepted() {
        let address = "1 Main St, Dallas, TX";
        let mut lookup = FixedLookup::returning(Some(place("Acme Rail", address)));
        let score = match_confidence("Acme", "Dallas", "Acme Rail", address);
        assert!(score < 1.0);
        let options = EnrichOptions {
            threshold: score,
            ..Default::default()
        };
        let (out, stats) = process_facilities(
            vec![facility("Acme", "Dallas")],
            &mut lookup,
            &options,
            &CancellationToken::new(),
            None,
        )
        .await;
        assert_eq!(stats.enriched, 1);
        assert_eq!(stats.skipped_low_confidence, 0);
        let stamp = out[0].enrichment.as_ref().unwrap();
        assert_eq!(stamp.confidence, round4(score));
    }

    #[tokio::test]
    async fn test_coords_only_fills_nothing_else() {
        let mut lookup = FixedLookup::returning(Some(place("Acme", "1 Main St, Dallas, TX")));
        let options = EnrichOptions {
            coords_only: true,
            ..Default::default()
        };
        let (out, stats) = process_facilities(
            vec![facility("Acme", "Dallas")],
            &mut lookup,
            &options,
            &CancellationToken::new(),
            None,
        )
        .await;
        assert_eq!(stats.enriched, 1);
        assert_eq!(out[0].latitude(), Some(32.7));
        assert_eq!(out[0].longitude(), Some(-96.8));
        assert!(out[0].website.is_none());
        assert!(out[0].phone.is_none());
        assert_eq!(stats.fields_filled.get("website"), None);
        assert_eq!(
            out[0].enrichment.as_ref().unwrap().fields_filled,
            vec!["latitude", "longitude"]
        );
    }

    #[tokio::test]
    async fn test_unparseable_live_response_is_a_lookup_error() {
        let mut lookup =
            CachedPlaceLookup::new(MemoryResponseCache::default(), GarbledSearch { calls: 0 });
        let record = facility("Acme", "Dallas");
        let (out, stats) = process_facilities(
            vec![record.clone()],
            &mut lookup,
            &EnrichOptions::default(),
            &CancellationToken::new(),
            None,
        )
        .await;
        assert_eq!(out[0], record);
        assert_eq!(stats.lookup_errors, 1);
        assert_eq!(stats.skipped_no_results, 1);
        assert_eq!(stats.enriched, 0);

        let (cache, search) = lookup.into_parts();
        assert_eq!(search.calls, 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_progress_text_respects_cache_stats_flag() {
        let mut stats = EnrichmentStats::new(10);
        stats.enriched = 3;
        stats.cache_hits = 2;
        assert_eq!(progress_message(&stats, true), "3 enriched, 2 cache hits");
        assert_eq!(progress_message(&stats, false), "3 enriched");
    }
}
