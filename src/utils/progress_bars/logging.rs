// src/utils/progress_bars/logging.rs - Tagged logging helpers for the batch jobs
use log::{info, warn};
use std::time::Instant;

use crate::models::stats_models::{CleanupStats, EnrichmentStats, GeocodeStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchJob {
    Enrich,
    Geocode,
    Cleanup,
}

#[derive(Clone)]
pub struct BatchLogger {
    job_name: &'static str,
    job_emoji: &'static str,
    start_time: Instant,
}

impl BatchLogger {
    pub fn new(job: BatchJob) -> Self {
        let (job_name, job_emoji) = match job {
            BatchJob::Enrich => ("ENRICH", "🧭"),
            BatchJob::Geocode => ("GEOCODE", "🌍"),
            BatchJob::Cleanup => ("CLEANUP", "🧹"),
        };
        Self {
            job_name,
            job_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn tag(&self) -> String {
        format!("[{}] {}", self.job_name, self.job_emoji)
    }

    pub fn log_start(&self, input: &str, dry_run: bool) {
        info!(
            "{} 🚀 Starting {} run on {}{}",
            self.tag(),
            self.job_name.to_lowercase(),
            input,
            if dry_run { " (dry run)" } else { "" }
        );
    }

    pub fn log_data_loaded(&self, count: usize) {
        info!("{} 📊 Loaded {} facility records", self.tag(), count);
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        match details {
            Some(details) => info!(
                "{} 🔄 Phase: {} - {} [+{:.1}s]",
                self.tag(),
                phase,
                details,
                elapsed.as_secs_f32()
            ),
            None => info!(
                "{} 🔄 Phase: {} [+{:.1}s]",
                self.tag(),
                phase,
                elapsed.as_secs_f32()
            ),
        }
    }

    pub fn log_progress(&self, position: usize, total: usize, detail: &str) {
        info!("{} 📦 {}/{} {}", self.tag(), position, total, detail);
    }

    pub fn log_written(&self, count: usize, path: &str) {
        info!("{} 💾 Wrote {} records to {}", self.tag(), count, path);
    }

    pub fn log_interrupted(&self, processed: usize, total: usize) {
        warn!(
            "{} ⏹️  Interrupted after {}/{} records; remaining records kept unchanged",
            self.tag(),
            processed,
            total
        );
    }

    pub fn log_enrichment_summary(&self, stats: &EnrichmentStats) {
        info!(
            "{} 🎉 COMPLETED in {:.2?}: {} processed, {} enriched",
            self.tag(),
            self.start_time.elapsed(),
            stats.processed,
            stats.enriched
        );
        info!(
            "{} ⏭️  Skipped: {} already enriched, {} already complete, {} no results, {} low confidence",
            self.tag(),
            stats.skipped_already_enriched,
            stats.skipped_already_complete,
            stats.skipped_no_results,
            stats.skipped_low_confidence
        );
        info!(
            "{} 💾 API calls: {}, cache hits: {} ({:.1}% hit rate)",
            self.tag(),
            stats.api_calls_made,
            stats.cache_hits,
            stats.cache_hit_rate()
        );
        for (field, count) in &stats.fields_filled {
            info!("{} ✏️  {:<22} {}", self.tag(), field, count);
        }
        if stats.lookup_errors > 0 {
            warn!(
                "{} ⚠️  {} lookups failed and were counted as no result",
                self.tag(),
                stats.lookup_errors
            );
        }
    }

    pub fn log_geocode_summary(&self, stats: &GeocodeStats) {
        info!(
            "{} 🎉 COMPLETED in {:.2?}: {} missing, {} geocoded, {} from cache, {} failed",
            self.tag(),
            self.start_time.elapsed(),
            stats.missing_coordinates,
            stats.geocoded,
            stats.cached,
            stats.failed
        );
    }

    pub fn log_cleanup_summary(&self, stats: &CleanupStats) {
        info!(
            "{} 📍 States filled: {} (zip: {}, city field: {}, city lookup: {})",
            self.tag(),
            stats.states_filled,
            stats.states_filled_from_zip,
            stats.states_filled_from_city_field,
            stats.states_filled_from_city_lookup
        );
        info!(
            "{} 🏷️  Names cleaned: {}, descriptions generated: {}",
            self.tag(),
            stats.names_cleaned,
            stats.descriptions_generated
        );
        info!(
            "{} 🚂 Railroads normalized: {}, duplicates removed: {}",
            self.tag(),
            stats.railroads_normalized,
            stats.railroads_deduped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(BatchLogger::new(BatchJob::Enrich).tag(), "[ENRICH] 🧭");
        assert_eq!(BatchLogger::new(BatchJob::Geocode).tag(), "[GEOCODE] 🌍");
        assert_eq!(BatchLogger::new(BatchJob::Cleanup).tag(), "[CLEANUP] 🧹");
    }
}
