// src/main.rs - Enrich facility records from Google Places
use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use enrichment_lib::cache::SqliteResponseCache;
use enrichment_lib::config::{EnrichConfig, API_KEY_VAR};
use enrichment_lib::enrichment::{analyze_gaps, process_facilities, EnrichOptions};
use enrichment_lib::places::{CachedPlaceLookup, GooglePlacesClient};
use enrichment_lib::utils::env::load_env;
use enrichment_lib::utils::io::{read_records, write_json_pretty};
use enrichment_lib::utils::progress_bars::logging::{BatchJob, BatchLogger};
use enrichment_lib::utils::progress_bars::progress_config::ProgressConfig;
use enrichment_lib::utils::CancellationToken;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct EnrichArgs {
    /// Report missing fields without calling the API
    #[arg(long)]
    dry_run: bool,

    /// Only look up the first N facilities
    #[arg(long)]
    limit: Option<usize>,

    /// Minimum match confidence to accept a candidate
    #[arg(long, default_value_t = 0.80)]
    threshold: f64,

    /// Skip facilities that already carry enrichment metadata
    #[arg(long)]
    skip_enriched: bool,

    /// Only fill latitude/longitude
    #[arg(long)]
    coords_only: bool,

    /// Write run statistics to the report path
    #[arg(long)]
    report: bool,

    #[arg(long, default_value = "public/facilities.json")]
    input: PathBuf,

    #[arg(long, default_value = "public/facilities_enriched.json")]
    output: PathBuf,

    #[arg(long, default_value = "scripts/.enrich_cache.db")]
    cache_db: PathBuf,

    #[arg(long, default_value = "scripts/enrichment_report.json")]
    report_path: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let env = load_env();
    env_logger::init();
    env.log();
    let args = EnrichArgs::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("Enrichment failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: EnrichArgs) -> Result<ExitCode> {
    let logger = BatchLogger::new(BatchJob::Enrich);
    logger.log_start(&args.input.display().to_string(), args.dry_run);
    let mut records = read_records(&args.input)?;
    logger.log_data_loaded(records.len());
    let facilities = records.take_facilities();

    let progress_config = ProgressConfig::from_env();
    let options = EnrichOptions {
        threshold: args.threshold,
        skip_enriched: args.skip_enriched,
        coords_only: args.coords_only,
        limit: args.limit,
        progress: progress_config.clone(),
    };
    let work_len = options.work_len(facilities.len());

    if args.dry_run {
        analyze_gaps(&facilities[..work_len]).log_report();
        return Ok(ExitCode::SUCCESS);
    }

    let config = match EnrichConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}. Set {} in the environment or .env", e, API_KEY_VAR);
            return Ok(ExitCode::FAILURE);
        }
    };

    let cache = SqliteResponseCache::open(&args.cache_db, config.cache_ttl_days)?;
    let client = GooglePlacesClient::new(config.api_key.clone(), config.rate_delay, config.http_timeout)?;
    let mut lookup = CachedPlaceLookup::new(cache, client);

    let progress = progress_config.create_bar(work_len as u64, "enrich");

    let cancel = CancellationToken::new();
    cancel.cancel_on_ctrl_c();

    logger.log_phase(
        "Lookup",
        Some(&format!("{} facilities, threshold {:.2}", work_len, args.threshold)),
    );
    let (facilities, stats) = process_facilities(
        facilities,
        &mut lookup,
        &options,
        &cancel,
        progress.as_ref(),
    )
    .await;
    records.restore_facilities(facilities)?;

    let output = records.into_values();
    write_json_pretty(&args.output, &output)
        .with_context(|| format!("Failed to write enriched facilities ({} records)", output.len()))?;
    logger.log_written(output.len(), &args.output.display().to_string());

    if args.report {
        write_json_pretty(&args.report_path, &stats)?;
        info!("Report written to {}", args.report_path.display());
    }

    logger.log_enrichment_summary(&stats);
    info!("Done. {}/{} enriched.", stats.enriched, stats.processed);
    Ok(ExitCode::SUCCESS)
}
