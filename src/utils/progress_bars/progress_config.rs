// src/utils/progress_bars/progress_config.rs

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::env;

/// Configuration for progress tracking in the batch jobs
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Whether to show progress bars at all
    pub enabled: bool,
    /// Refresh rate for progress bars in milliseconds
    pub refresh_rate_ms: u64,
    /// Whether to show cache statistics in progress messages
    pub show_cache_stats: bool,
    /// Records between progress log lines
    pub log_every: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_rate_ms: 100,
            show_cache_stats: true,
            log_every: 100,
        }
    }
}

impl ProgressConfig {
    /// Create progress configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            enabled: lookup("PROGRESS_ENABLED")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enabled),
            refresh_rate_ms: lookup("PROGRESS_REFRESH_RATE_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_rate_ms),
            show_cache_stats: lookup("PROGRESS_SHOW_CACHE_STATS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.show_cache_stats),
            log_every: lookup("PROGRESS_LOG_EVERY")
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.log_every),
        }
    }

    /// Create a progress bar of `len` steps if progress is enabled, None otherwise
    pub fn create_bar(&self, len: u64, prefix: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }
        let refresh_hz = (1000 / self.refresh_rate_ms.max(1)).clamp(1, 60) as u8;
        let pb = ProgressBar::with_draw_target(
            Some(len),
            ProgressDrawTarget::stderr_with_hz(refresh_hz),
        );
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");
        pb.set_style(style);
        pb.set_prefix(prefix.to_string());
        Some(pb)
    }

    /// Whether record `position` (1-based) of `total` gets a progress line
    pub fn should_log(&self, position: usize, total: usize) -> bool {
        is_checkpoint(position, total, self.log_every)
    }
}

/// Every `every`-th position, plus the last one.
pub fn is_checkpoint(position: usize, total: usize, every: usize) -> bool {
    position % every.max(1) == 0 || position == total
}
